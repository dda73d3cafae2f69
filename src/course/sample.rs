//! Built-in course shown when nothing valid has been uploaded yet

use once_cell::sync::Lazy;

use super::mapper::{CourseMapper, FixedId};
use super::model::Course;
use super::raw::{LearningModule, ModuleDocument, RawCourseDocument, RawQuestion};

/// Id of the built-in course
pub const SAMPLE_COURSE_ID: &str = "sample-course";

static SAMPLE_COURSE: Lazy<Course> = Lazy::new(|| {
    CourseMapper::with_ids(FixedId(SAMPLE_COURSE_ID.to_string()))
        .map(&sample_document(), Some("Getting Started with Syllabus"))
});

/// A fresh copy of the built-in course (no progress applied)
pub fn sample_course() -> Course {
    SAMPLE_COURSE.clone()
}

fn question(text: &str, options: [&str; 4], correct: usize, explanation: &str) -> RawQuestion {
    RawQuestion {
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct,
        explanation: Some(explanation.to_string()),
        related_modules: None,
    }
}

fn sample_document() -> RawCourseDocument {
    RawCourseDocument::Modules(ModuleDocument {
        modules: vec![
            LearningModule {
                module_name: "Uploading Material".into(),
                key_concepts: vec!["PDF processing".into(), "Course structure".into()],
                learning_objectives: vec!["Turn a PDF into a course".into()],
                content_summary: "Upload a PDF with `syllabus upload <file>`. The processing \
                                  service splits it into modules, writes a summary for each and \
                                  generates quiz questions. The result is stored locally and \
                                  becomes your current course."
                    .into(),
                section_quiz: vec![
                    question(
                        "Which file type can be uploaded?",
                        ["Word documents", "PDF files", "Images", "Spreadsheets"],
                        1,
                        "Only PDF files are accepted by the processing service.",
                    ),
                    question(
                        "Where is the processed course kept?",
                        ["In the cloud", "Nowhere", "In local storage", "In the PDF"],
                        2,
                        "The processed document is stored verbatim on this machine.",
                    ),
                ],
            },
            LearningModule {
                module_name: "Tracking Progress".into(),
                key_concepts: vec!["Chapters".into(), "Quizzes".into(), "Progress".into()],
                learning_objectives: vec![
                    "Mark sections as read".into(),
                    "Complete chapter quizzes".into(),
                ],
                content_summary: "Each chapter has reading material and a short quiz. Marking \
                                  a section complete or finishing the chapter quiz raises the \
                                  chapter's progress, and the course total is the average over \
                                  all chapters."
                    .into(),
                section_quiz: vec![question(
                    "What does finishing a chapter quiz do?",
                    [
                        "Nothing",
                        "Resets the chapter",
                        "Sets the chapter to 100%",
                        "Deletes the course",
                    ],
                    2,
                    "Completing the quiz marks the whole chapter as done.",
                )],
            },
        ],
        comprehensive_summary: "A short tour of how courses are created and tracked.".into(),
        final_quiz: vec![RawQuestion {
            related_modules: Some(vec!["Uploading Material".into(), "Tracking Progress".into()]),
            ..question(
                "How is the overall course progress computed?",
                [
                    "Sum of quiz scores",
                    "Average of chapter progress",
                    "Number of uploads",
                    "Time spent reading",
                ],
                1,
                "The course total is the rounded mean of every chapter's progress.",
            )
        }],
    })
}
