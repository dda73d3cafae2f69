//! Commands understood by the application

use std::path::PathBuf;

use clap::Subcommand;

/// Something the learner asked for
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Upload a PDF and turn it into your current course
    Upload {
        /// Path to the PDF file
        path: PathBuf,
        /// Title for the new course
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Show the course outline with progress
    Show,
    /// Read a section
    Read {
        /// Chapter id, e.g. chapter-1
        chapter: String,
        /// Section id, e.g. module-1
        section: String,
        /// Also mark the section as complete
        #[arg(long)]
        complete: bool,
    },
    /// Mark a section as complete
    Complete {
        /// Chapter id, e.g. chapter-1
        chapter: String,
        /// Section id, e.g. module-1
        section: String,
    },
    /// Show or submit a chapter quiz
    Quiz {
        /// Chapter id, e.g. chapter-1
        chapter: String,
        /// Comma-separated option numbers (1-based); leave a slot empty to skip
        #[arg(short, long)]
        answers: Option<String>,
    },
    /// Show or submit the final quiz
    FinalQuiz {
        /// Comma-separated option numbers (1-based); leave a slot empty to skip
        #[arg(short, long)]
        answers: Option<String>,
    },
    /// Show progress statistics
    Progress,
    /// Forget all progress
    Reset,
}

/// Problem with an answers argument
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerParseError {
    /// A slot is not a number
    #[error("Not an option number: '{0}'")]
    NotANumber(String),
    /// Options are numbered from 1
    #[error("Option numbers start at 1")]
    Zero,
}

/// Parse `"2,1,,4"` into 0-based picks, with empty slots as skipped questions.
///
/// `-` also marks a skipped question.
pub fn parse_answers(input: &str) -> Result<Vec<Option<usize>>, AnswerParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(str::trim)
        .map(|slot| match slot {
            "" | "-" => Ok(None),
            _ => {
                let n: usize =
                    slot.parse().map_err(|_| AnswerParseError::NotANumber(slot.to_string()))?;
                n.checked_sub(1).map(Some).ok_or(AnswerParseError::Zero)
            }
        })
        .collect()
}
