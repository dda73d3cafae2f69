//! Command execution

pub mod command;
pub mod render;

use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::api::ProcessingClient;
use crate::config::Config;
use crate::course::{Chapter, Course};
use crate::progress::ProgressError;
use crate::quiz::QuizAttempt;
use crate::session::CourseSession;
use crate::storage::{FileStore, KeyValueStore};
pub use command::{Command, parse_answers};

/// The main application
pub struct App<S = FileStore> {
    /// Application configuration
    config: Config,

    /// Stored course and progress
    session: CourseSession<S>,
}

impl App<FileStore> {
    /// Create an application backed by the configured data directory
    pub fn new(config: Config) -> Result<Self> {
        let store = FileStore::new(config.resolved_data_dir()?);
        Ok(Self::with_store(config, store))
    }
}

impl<S: KeyValueStore + Clone> App<S> {
    /// Create an application over an arbitrary store
    pub fn with_store(config: Config, store: S) -> Self {
        let session = CourseSession::new(store).with_title(config.default_title.clone());
        Self { config, session }
    }

    /// Run one command, writing its output to `out`
    pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Upload { path, title } => {
                let client =
                    ProcessingClient::new(&self.config.api_base_url, self.config.upload_limit_bytes)?;
                let processed = match client.process_pdf(&path).await {
                    Ok(processed) => processed,
                    Err(e) => {
                        if e.is_bad_input() {
                            writeln!(out, "Check that the file is a readable PDF and try again.")?;
                        } else if e.is_recoverable() {
                            writeln!(out, "The processing service is unavailable; try again later.")?;
                        }
                        return Err(e.into());
                    }
                };
                self.session.replace_document(&processed.body, title.as_deref())?;
                info!(path = ?path, chapters = processed.document.chapter_count(), "upload processed");

                let loaded = self.session.load()?;
                writeln!(out, "Created course with {} chapters.", loaded.course.chapters.len())?;
                writeln!(out)?;
                render::outline(out, &loaded.course, loaded.source)?;
            }
            Command::Show => {
                let loaded = self.session.load()?;
                render::outline(out, &loaded.course, loaded.source)?;
            }
            Command::Read { chapter, section, complete } => {
                let course = if complete {
                    self.session.complete_subsection(&chapter, &section)?
                } else {
                    self.session.load()?.course
                };
                let chapter = find_chapter(&course, &chapter)?;
                let subsection = chapter.subsection(&section).ok_or_else(|| {
                    ProgressError::SubsectionNotFound {
                        chapter_id: chapter.id.clone(),
                        subsection_id: section.clone(),
                    }
                })?;
                render::section(out, chapter, subsection)?;
            }
            Command::Complete { chapter, section } => {
                let course = self.session.complete_subsection(&chapter, &section)?;
                let chapter = find_chapter(&course, &chapter)?;
                writeln!(out, "Marked {} complete.", section)?;
                writeln!(out, "{}: {}", chapter.title, render::progress_bar(chapter.progress))?;
                writeln!(out, "Course: {}", render::progress_bar(course.total_progress))?;
            }
            Command::Quiz { chapter, answers } => {
                let course = self.session.load()?.course;
                let found = find_chapter(&course, &chapter)?;
                let questions = &found.quiz.questions;

                let Some(answers) = answers else {
                    writeln!(out, "{} quiz", found.title)?;
                    writeln!(out)?;
                    render::questions(
                        out,
                        questions.iter().map(|q| (q.question.as_str(), q.options.as_slice())),
                    )?;
                    writeln!(out, "Submit with: syllabus quiz {} --answers 1,2,...", found.id)?;
                    return Ok(());
                };

                let attempt = submitted_attempt(&answers, questions.len())?;
                if attempt.is_empty() {
                    writeln!(out, "This quiz has no questions.")?;
                } else {
                    let result = attempt.result(questions);
                    render::chapter_review(out, questions, attempt.answers())?;
                    writeln!(out)?;
                    render::score(out, &result)?;
                }

                let course = self.session.complete_chapter_quiz(&chapter)?;
                writeln!(out, "Course: {}", render::progress_bar(course.total_progress))?;
            }
            Command::FinalQuiz { answers } => {
                let course = self.session.load()?.course;
                let Some(questions) = course.final_quiz.as_deref().filter(|q| !q.is_empty()) else {
                    writeln!(out, "This course has no final quiz.")?;
                    return Ok(());
                };

                let Some(answers) = answers else {
                    writeln!(out, "Final quiz")?;
                    writeln!(out)?;
                    render::questions(
                        out,
                        questions.iter().map(|q| (q.question.as_str(), q.options.as_slice())),
                    )?;
                    writeln!(out, "Submit with: syllabus final-quiz --answers 1,2,...")?;
                    return Ok(());
                };

                let attempt = submitted_attempt(&answers, questions.len())?;
                let result = attempt.result(questions);
                render::final_review(out, &course, questions, attempt.answers())?;
                writeln!(out)?;
                render::score(out, &result)?;
                if result.is_perfect() {
                    writeln!(out, "Perfect score!")?;
                }
            }
            Command::Progress => {
                let loaded = self.session.load()?;
                render::statistics(out, &loaded.course)?;
            }
            Command::Reset => {
                self.session.reset_progress()?;
                writeln!(out, "Progress cleared.")?;
            }
        }

        Ok(())
    }
}

fn find_chapter<'a>(course: &'a Course, chapter_id: &str) -> Result<&'a Chapter> {
    course
        .chapter(chapter_id)
        .ok_or_else(|| ProgressError::ChapterNotFound { chapter_id: chapter_id.to_string() }.into())
}

/// Play answers given on the command line through a finished attempt.
///
/// Missing trailing answers count as skipped; extra answers are an error.
fn submitted_attempt(input: &str, question_count: usize) -> Result<QuizAttempt> {
    let answers = parse_answers(input).context("Invalid answers")?;
    let mut attempt = QuizAttempt::new(question_count);
    if answers.len() > attempt.len() {
        bail!("Got {} answers for {} questions", answers.len(), attempt.len());
    }
    if answers.len() < attempt.len() {
        warn!(given = answers.len(), question_count, "unanswered questions count as wrong");
    }

    for answer in answers {
        if let Some(option) = answer {
            attempt.answer(option);
        }
        attempt.advance();
    }
    while !attempt.is_finished() {
        attempt.advance();
    }

    Ok(attempt)
}
