//! Learner progress: the stored overlay and the rules for updating it

pub mod error;
pub mod overlay;
pub mod store;
pub mod tracker;

pub use error::ProgressError;
pub use overlay::{ChapterProgress, OverlayError, OverlayPatch, ProgressOverlay};
pub use store::ProgressStore;
pub use tracker::{
    Completion, apply_overlay, complete_chapter_quiz, complete_subsection, course_progress,
    percent,
};
