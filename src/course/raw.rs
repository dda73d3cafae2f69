//! Raw documents returned by the PDF processing API
//!
//! The processing service has emitted two document shapes over time. Both are
//! accepted; which one a document is gets decided by its top-level key
//! (`modules` or `sections`), never by trial parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CourseError;

/// A processed course document in either supported shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawCourseDocument {
    /// Module-centric document with key concepts and a final quiz
    Modules(ModuleDocument),
    /// Page-centric document with one summary per page
    Sections(SectionDocument),
}

impl RawCourseDocument {
    /// Decode a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CourseError> {
        let value: Value = serde_json::from_str(json).map_err(CourseError::InvalidJson)?;
        Self::from_value(value)
    }

    /// Decode a document from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, CourseError> {
        let (has_modules, has_sections) = match &value {
            Value::Object(map) => (map.contains_key("modules"), map.contains_key("sections")),
            _ => (false, false),
        };

        match (has_modules, has_sections) {
            (true, false) => serde_json::from_value(value)
                .map(Self::Modules)
                .map_err(CourseError::from_decode),
            (false, true) => serde_json::from_value(value)
                .map(Self::Sections)
                .map_err(CourseError::from_decode),
            _ => Err(CourseError::UnknownShape),
        }
    }

    /// Number of chapters this document will produce
    pub fn chapter_count(&self) -> usize {
        match self {
            Self::Modules(doc) => doc.modules.len(),
            Self::Sections(doc) => doc.sections.len(),
        }
    }
}

/// Module-centric document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDocument {
    pub modules: Vec<LearningModule>,
    #[serde(default)]
    pub comprehensive_summary: String,
    #[serde(default)]
    pub final_quiz: Vec<RawQuestion>,
}

/// One module of a module-centric document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningModule {
    pub module_name: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    pub content_summary: String,
    #[serde(default)]
    pub section_quiz: Vec<RawQuestion>,
}

/// Page-centric document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDocument {
    pub sections: Vec<PageSection>,
    #[serde(default)]
    pub final_summary: String,
    #[serde(default)]
    pub final_quiz: Vec<RawQuestion>,
}

/// One page of a page-centric document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    pub page: u32,
    pub summary: String,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

/// A quiz question as produced by the processing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_modules: Option<Vec<String>>,
}
