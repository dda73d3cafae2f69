//! Error types for the processing API client

use std::path::PathBuf;

use thiserror::Error;

use crate::course::CourseError;

/// Errors that can occur while uploading a PDF for processing
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file does not exist
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    /// The file is not a PDF
    #[error("Please upload a valid PDF file: {0:?}")]
    NotPdf(PathBuf),

    /// Reading the file failed
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Message to show the user
        message: String,
    },

    /// The service answered 200 with something that is not a course document
    #[error("Processing service returned an unusable document: {0}")]
    InvalidResponse(#[from] CourseError),
}

impl UploadError {
    /// Check if trying the same upload again could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            UploadError::RequestError(_) => true,
            UploadError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if the problem is with the chosen file rather than the service
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            UploadError::FileNotFound(_)
                | UploadError::NotPdf(_)
                | UploadError::ApiError { status: 400 | 413 | 415 | 422, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_recoverable() {
        let err = UploadError::ApiError { status: 502, message: "Bad gateway".into() };
        assert!(err.is_recoverable());
        assert!(!err.is_bad_input());
    }

    #[test]
    fn rejected_files_are_bad_input() {
        let err = UploadError::ApiError { status: 422, message: "No text".into() };
        assert!(!err.is_recoverable());
        assert!(err.is_bad_input());
        assert!(UploadError::NotPdf(PathBuf::from("a.txt")).is_bad_input());
    }

    #[test]
    fn api_error_displays_message_only() {
        let err = UploadError::ApiError { status: 400, message: "Only PDF files are supported".into() };
        assert_eq!(err.to_string(), "Only PDF files are supported");
    }
}
