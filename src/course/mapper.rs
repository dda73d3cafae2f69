//! Mapping processed documents into courses

use std::time::SystemTime;

use super::error::CourseError;
use super::model::{Chapter, ChapterQuiz, Course, FinalQuizQuestion, QuizQuestion, SubSection};
use super::raw::{LearningModule, ModuleDocument, PageSection, RawCourseDocument, RawQuestion};

/// Title used when the caller does not supply one
pub const DEFAULT_TITLE: &str = "Your Uploaded Course";

/// Maximum number of questions kept per chapter quiz
pub const MAX_CHAPTER_QUESTIONS: usize = 5;

/// Number of characters kept in a chapter description
pub const DESCRIPTION_CHARS: usize = 100;

/// Source of course ids
pub trait IdSource {
    /// Produce the id for a freshly mapped course
    fn course_id(&self) -> String;
}

/// Ids derived from the current time (`course-<unix millis>`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl IdSource for SystemClock {
    fn course_id(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        format!("course-{}", millis)
    }
}

/// Always hands out the same id
#[derive(Debug, Clone)]
pub struct FixedId(pub String);

impl IdSource for FixedId {
    fn course_id(&self) -> String {
        self.0.clone()
    }
}

/// Turns raw processing documents into courses
#[derive(Debug, Clone, Default)]
pub struct CourseMapper<I = SystemClock> {
    ids: I,
}

impl CourseMapper<SystemClock> {
    /// Mapper using the system clock for course ids
    pub fn new() -> Self {
        Self { ids: SystemClock }
    }
}

impl<I: IdSource> CourseMapper<I> {
    /// Mapper using a custom id source
    pub fn with_ids(ids: I) -> Self {
        Self { ids }
    }

    /// Build a course from a raw document.
    ///
    /// Chapters follow document order and get position-derived ids, so mapping
    /// the same document twice only differs in the course id.
    pub fn map(&self, raw: &RawCourseDocument, title: Option<&str>) -> Course {
        let (description, chapters, final_quiz) = match raw {
            RawCourseDocument::Modules(doc) => map_module_document(doc),
            RawCourseDocument::Sections(doc) => (
                doc.final_summary.clone(),
                doc.sections.iter().enumerate().map(|(i, s)| map_section(i, s)).collect(),
                None,
            ),
        };

        Course {
            id: self.ids.course_id(),
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            description,
            chapters,
            total_progress: 0,
            final_quiz,
        }
    }

    /// Decode a JSON document and map it in one step
    pub fn map_json(&self, json: &str, title: Option<&str>) -> Result<Course, CourseError> {
        let raw = RawCourseDocument::from_json(json)?;
        Ok(self.map(&raw, title))
    }
}

fn map_module_document(
    doc: &ModuleDocument,
) -> (String, Vec<Chapter>, Option<Vec<FinalQuizQuestion>>) {
    let chapters = doc.modules.iter().enumerate().map(|(i, m)| map_module(i, m)).collect();

    let final_quiz = doc
        .final_quiz
        .iter()
        .enumerate()
        .map(|(idx, q)| FinalQuizQuestion {
            id: question_id(idx),
            question: q.question.clone(),
            options: q.options.clone(),
            correct_answer: q.correct_answer,
            explanation: q.explanation.clone(),
            related_modules: q.related_modules.clone(),
        })
        .collect();

    (doc.comprehensive_summary.clone(), chapters, Some(final_quiz))
}

fn map_module(index: usize, module: &LearningModule) -> Chapter {
    let number = index + 1;

    Chapter {
        id: format!("chapter-{}", number),
        title: module.module_name.clone(),
        description: clip_description(&module.content_summary),
        subsections: vec![SubSection {
            id: format!("module-{}", number),
            title: module.module_name.clone(),
            content: module.content_summary.clone(),
            completed: false,
            key_concepts: Some(module.key_concepts.clone()),
            learning_objectives: Some(module.learning_objectives.clone()),
        }],
        quiz: ChapterQuiz {
            id: format!("quiz-{}", number),
            questions: map_chapter_questions(&module.section_quiz),
        },
        progress: 0,
    }
}

fn map_section(index: usize, section: &PageSection) -> Chapter {
    let number = index + 1;
    let title = format!("Page {}", section.page);

    Chapter {
        id: format!("chapter-{}", number),
        title: title.clone(),
        description: clip_description(&section.summary),
        subsections: vec![SubSection {
            id: format!("page-{}", section.page),
            title,
            content: section.summary.clone(),
            completed: false,
            key_concepts: None,
            learning_objectives: None,
        }],
        quiz: ChapterQuiz {
            id: format!("quiz-{}", number),
            questions: map_chapter_questions(&section.questions),
        },
        progress: 0,
    }
}

/// Map questions 1:1 in order, then keep the first few
fn map_chapter_questions(raw: &[RawQuestion]) -> Vec<QuizQuestion> {
    raw.iter()
        .enumerate()
        .map(|(idx, q)| QuizQuestion {
            id: question_id(idx),
            question: q.question.clone(),
            options: q.options.clone(),
            correct_answer: q.correct_answer,
            explanation: q.explanation.clone(),
        })
        .take(MAX_CHAPTER_QUESTIONS)
        .collect()
}

fn question_id(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// First [`DESCRIPTION_CHARS`] characters followed by `...`.
///
/// The marker is appended even when nothing was clipped.
pub fn clip_description(summary: &str) -> String {
    let mut clipped: String = summary.chars().take(DESCRIPTION_CHARS).collect();
    clipped.push_str("...");
    clipped
}
