//! Error types for decoding and mapping course documents

use thiserror::Error;

/// Errors that can occur while decoding a processed course document
#[derive(Debug, Error)]
pub enum CourseError {
    /// The document is not valid JSON
    #[error("Course document is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The document has neither `modules` nor `sections` (or both)
    #[error("Unrecognized course document: expected exactly one of `modules` or `sections`")]
    UnknownShape,

    /// A required field is absent
    #[error("Course document is missing field `{field}`")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A field is present but has the wrong type
    #[error("Course document has an invalid field: {0}")]
    InvalidField(#[source] serde_json::Error),
}

impl CourseError {
    /// Classify a serde error raised while decoding a known document shape
    pub(crate) fn from_decode(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            return Self::InvalidJson(err);
        }

        match missing_field_name(&err.to_string()) {
            Some(field) => Self::MissingField { field },
            None => Self::InvalidField(err),
        }
    }

    /// Name of the missing field, if that is what went wrong
    pub fn missing_field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } => Some(field),
            _ => None,
        }
    }
}

/// Pull the field name out of serde's "missing field `name`" message.
///
/// serde_json exposes no structured accessor for the field, so this depends on
/// the wording of its message; `nested_missing_field_is_named` guards it.
fn missing_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
