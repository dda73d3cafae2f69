//! Plain-text output for the command line

use std::io::{self, Write};

use crate::course::{Chapter, Course, FinalQuizQuestion, QuizQuestion, SubSection};
use crate::quiz::QuizResult;
use crate::session::CourseSource;

/// Width of text progress bars
const BAR_WIDTH: usize = 20;

/// `[#########-----------]  45%`
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled), percent)
}

/// Course title, total progress, and every chapter with its sections
pub fn outline(out: &mut impl Write, course: &Course, source: CourseSource) -> io::Result<()> {
    writeln!(out, "{}", course.title)?;
    if source == CourseSource::Sample {
        writeln!(out, "(sample course: upload a PDF to create your own)")?;
    }
    writeln!(out, "{}", progress_bar(course.total_progress))?;
    if !course.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", course.description)?;
    }

    for chapter in &course.chapters {
        writeln!(out)?;
        writeln!(out, "{}  {}  {}", chapter.id, chapter.title, progress_bar(chapter.progress))?;
        writeln!(out, "    {}", chapter.description)?;
        for subsection in &chapter.subsections {
            let mark = if subsection.completed { "x" } else { " " };
            writeln!(out, "    [{}] {}  {}", mark, subsection.id, subsection.title)?;
        }
        if !chapter.quiz.questions.is_empty() {
            writeln!(out, "    quiz: {} questions", chapter.quiz.questions.len())?;
        }
    }

    if course.has_final_quiz() {
        writeln!(out)?;
        writeln!(out, "Final quiz available: syllabus final-quiz")?;
    }

    Ok(())
}

/// Full text of a section with its concepts, objectives and neighbors
pub fn section(out: &mut impl Write, chapter: &Chapter, subsection: &SubSection) -> io::Result<()> {
    writeln!(out, "{} / {}", chapter.title, subsection.title)?;
    if subsection.completed {
        writeln!(out, "(completed)")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", subsection.content)?;

    list(out, "Key concepts", subsection.key_concepts.as_deref())?;
    list(out, "Learning objectives", subsection.learning_objectives.as_deref())?;

    writeln!(out)?;
    if let Some(prev) = chapter.previous_subsection(&subsection.id) {
        writeln!(out, "Previous: {} {}", chapter.id, prev)?;
    }
    match chapter.next_subsection(&subsection.id) {
        Some(next) => writeln!(out, "Next: {} {}", chapter.id, next)?,
        None if !chapter.quiz.questions.is_empty() => {
            writeln!(out, "Next: syllabus quiz {}", chapter.id)?
        }
        None => {}
    }

    Ok(())
}

fn list(out: &mut impl Write, heading: &str, items: Option<&[String]>) -> io::Result<()> {
    let Some(items) = items.filter(|items| !items.is_empty()) else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(out, "{}:", heading)?;
    for item in items {
        writeln!(out, "  - {}", item)?;
    }
    Ok(())
}

/// Numbered questions with 1-based options
pub fn questions<'a>(
    out: &mut impl Write,
    questions: impl IntoIterator<Item = (&'a str, &'a [String])>,
) -> io::Result<()> {
    for (n, (question, options)) in questions.into_iter().enumerate() {
        writeln!(out, "{}. {}", n + 1, question)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "   {}) {}", i + 1, option)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Score line
pub fn score(out: &mut impl Write, result: &QuizResult) -> io::Result<()> {
    writeln!(
        out,
        "Score: {}/{} ({}%)",
        result.correct,
        result.total,
        result.rounded()
    )
}

/// One line per question saying whether it was right, plus the explanation
fn review_line(
    out: &mut impl Write,
    n: usize,
    correct_answer: usize,
    answer: Option<usize>,
    explanation: Option<&str>,
) -> io::Result<()> {
    let verdict = match answer {
        Some(a) if a == correct_answer => "correct".to_string(),
        Some(a) => format!("wrong (you picked {}, answer is {})", a + 1, correct_answer + 1),
        None => format!("skipped (answer is {})", correct_answer + 1),
    };
    writeln!(out, "{}. {}", n + 1, verdict)?;
    if let Some(explanation) = explanation {
        writeln!(out, "   {}", explanation)?;
    }
    Ok(())
}

/// Per-question review of a chapter quiz
pub fn chapter_review(
    out: &mut impl Write,
    questions: &[QuizQuestion],
    answers: &[Option<usize>],
) -> io::Result<()> {
    for (n, question) in questions.iter().enumerate() {
        let answer = answers.get(n).copied().flatten();
        review_line(out, n, question.correct_answer, answer, question.explanation.as_deref())?;
    }
    Ok(())
}

/// Per-question review of the final quiz, pointing missed questions at the
/// chapters to revisit
pub fn final_review(
    out: &mut impl Write,
    course: &Course,
    questions: &[FinalQuizQuestion],
    answers: &[Option<usize>],
) -> io::Result<()> {
    for (n, question) in questions.iter().enumerate() {
        let answer = answers.get(n).copied().flatten();
        review_line(out, n, question.correct_answer, answer, question.explanation.as_deref())?;

        if answer != Some(question.correct_answer) {
            for (name, link) in course.related_links(question) {
                writeln!(out, "   Review {}: {}", name, link.read_command())?;
            }
        }
    }
    Ok(())
}

/// Completion statistics
pub fn statistics(out: &mut impl Write, course: &Course) -> io::Result<()> {
    writeln!(out, "{}", course.title)?;
    writeln!(out, "Overall:   {}", progress_bar(course.total_progress))?;
    writeln!(
        out,
        "Chapters:  {} of {} completed",
        course.completed_chapter_count(),
        course.chapters.len()
    )?;
    writeln!(
        out,
        "Sections:  {} of {} completed",
        course.completed_subsection_count(),
        course.subsection_count()
    )?;
    for chapter in &course.chapters {
        writeln!(out, "  {:<12} {}", chapter.id, progress_bar(chapter.progress))?;
    }
    Ok(())
}
