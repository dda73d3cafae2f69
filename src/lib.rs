//! Syllabus - turn PDFs into self-paced courses
//!
//! A PDF is sent to a processing service, which answers with a structured
//! document of modules or pages. Syllabus maps that document into chapters,
//! sections and quizzes, keeps it locally, and tracks how far the learner
//! has come.

pub mod api;
pub mod app;
pub mod config;
pub mod course;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod storage;

pub use app::App;
pub use config::Config;
