//! Course documents and their normalized form

pub mod error;
pub mod mapper;
pub mod model;
pub mod raw;
pub mod sample;

pub use error::CourseError;
pub use mapper::{CourseMapper, FixedId, IdSource, SystemClock};
pub use model::{Chapter, ChapterQuiz, Course, FinalQuizQuestion, QuizQuestion, SubSection};
pub use raw::RawCourseDocument;
pub use sample::sample_course;
