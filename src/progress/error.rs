//! Error types for progress updates

use thiserror::Error;

/// Errors raised when a completion targets something that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// No chapter with this id
    #[error("Chapter not found: {chapter_id}")]
    ChapterNotFound {
        /// Requested chapter id
        chapter_id: String,
    },

    /// The chapter exists but has no such subsection
    #[error("Section not found: {subsection_id} in {chapter_id}")]
    SubsectionNotFound {
        /// Chapter that was searched
        chapter_id: String,
        /// Requested subsection id
        subsection_id: String,
    },
}
