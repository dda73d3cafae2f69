//! Processing API integration
//!
//! Uploads a PDF to the remote processing service and decodes the course
//! document it returns.

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod stub;

pub use client::{ProcessedPdf, ProcessingClient};
pub use error::UploadError;
