//! Quiz grading and attempts

pub mod attempt;
pub mod grading;

pub use attempt::{QuizAttempt, Step};
pub use grading::{AnswerKey, QuizResult, score};
