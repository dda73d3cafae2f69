//! HTTP client for the PDF processing service

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::UploadError;
use crate::course::RawCourseDocument;

/// A successfully processed upload
#[derive(Debug, Clone)]
pub struct ProcessedPdf {
    /// Response body exactly as received
    pub body: String,
    /// The decoded document
    pub document: RawCourseDocument,
}

/// Error body the service sends with non-success responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Client for the processing API
pub struct ProcessingClient {
    /// HTTP client
    client: Client,
    /// Service root, without trailing slash
    base_url: String,
    /// Size above which a warning is logged
    upload_limit_bytes: u64,
}

impl ProcessingClient {
    /// Processing endpoint path
    const ENDPOINT: &'static str = "/process-pdf";
    /// Multipart field carrying the file
    const FILE_FIELD: &'static str = "file";
    /// MIME type sent for uploads
    const PDF_MIME: &'static str = "application/pdf";
    /// Leading bytes of every PDF
    const PDF_MAGIC: &'static [u8] = b"%PDF-";

    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>, upload_limit_bytes: u64) -> Result<Self, UploadError> {
        let client = Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url, upload_limit_bytes })
    }

    /// Full URL of the processing endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, Self::ENDPOINT)
    }

    /// Upload a PDF and return the processed course document.
    ///
    /// One request, no retries: failures go straight back to the caller.
    pub async fn process_pdf(&self, path: &Path) -> Result<ProcessedPdf, UploadError> {
        if !path.is_file() {
            return Err(UploadError::FileNotFound(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await?;
        check_pdf(path, &bytes)?;

        if bytes.len() as u64 > self.upload_limit_bytes {
            warn!(
                size = bytes.len(),
                limit = self.upload_limit_bytes,
                "PDF is larger than the recommended upload size"
            );
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());

        info!(file = %file_name, size = bytes.len(), "uploading PDF for processing");

        let part = Part::bytes(bytes).file_name(file_name).mime_str(Self::PDF_MIME)?;
        let form = Form::new().part(Self::FILE_FIELD, part);

        let response = self.client.post(self.endpoint()).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UploadError::ApiError {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let document = RawCourseDocument::from_json(&body)?;
        info!(chapters = document.chapter_count(), "PDF processed");

        Ok(ProcessedPdf { body, document })
    }
}

/// Reject anything that is not a PDF before it leaves the machine
fn check_pdf(path: &Path, bytes: &[u8]) -> Result<(), UploadError> {
    let has_extension = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if has_extension && bytes.starts_with(ProcessingClient::PDF_MAGIC) {
        Ok(())
    } else {
        Err(UploadError::NotPdf(path.to_path_buf()))
    }
}

/// Message to show for a failed request: the service's `detail` if it sent
/// one, otherwise a generic line with the status
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| {
            format!(
                "Error processing PDF: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::api::stub::serve_once;
    use crate::course::CourseError;

    const COURSE: &str = r#"{"modules":[{"module_name":"Intro","content_summary":"Start here"}],"comprehensive_summary":"All"}"#;

    fn pdf(temp_dir: &TempDir) -> std::path::PathBuf {
        let path = temp_dir.path().join("lesson.pdf");
        fs::write(&path, b"%PDF-1.4 lesson").unwrap();
        path
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = ProcessingClient::new("https://example.com/", 10).unwrap();
        assert_eq!(client.endpoint(), "https://example.com/process-pdf");
    }

    #[test]
    fn error_message_prefers_detail() {
        let message = error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail": "No text found"}"#);
        assert_eq!(message, "No text found");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Error processing PDF: 500 Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"message": "x"}"#),
            "Error processing PDF: 502 Bad Gateway"
        );
    }

    #[test]
    fn check_pdf_requires_extension_and_magic() {
        assert!(check_pdf(Path::new("notes.pdf"), b"%PDF-1.7 ...").is_ok());
        assert!(check_pdf(Path::new("NOTES.PDF"), b"%PDF-1.4").is_ok());
        assert!(matches!(
            check_pdf(Path::new("notes.txt"), b"%PDF-1.7"),
            Err(UploadError::NotPdf(_))
        ));
        assert!(matches!(check_pdf(Path::new("notes.pdf"), b"hello"), Err(UploadError::NotPdf(_))));
    }

    #[tokio::test]
    async fn missing_file_is_reported_before_any_request() {
        let client = ProcessingClient::new("http://127.0.0.1:9", 10).unwrap();
        let err = client.process_pdf(Path::new("/definitely/not/here.pdf")).await.unwrap_err();
        assert!(matches!(err, UploadError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn non_pdf_is_rejected_before_any_request() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.pdf");
        fs::write(&path, "plain text").unwrap();

        let client = ProcessingClient::new("http://127.0.0.1:9", 10).unwrap();
        let err = client.process_pdf(&path).await.unwrap_err();
        assert!(matches!(err, UploadError::NotPdf(_)));
    }

    #[tokio::test]
    async fn successful_upload_returns_document() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve_once("200 OK", COURSE).await;

        let client = ProcessingClient::new(&server.base_url, 1024).unwrap();
        let processed = client.process_pdf(&pdf(&temp_dir)).await.unwrap();

        assert_eq!(processed.body, COURSE);
        assert_eq!(processed.document.chapter_count(), 1);

        let request = server.request.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /process-pdf HTTP/1.1"));
        assert!(lower.contains("multipart/form-data; boundary="));
        assert!(request.contains(r#"name="file"; filename="lesson.pdf""#));
        assert!(lower.contains("content-type: application/pdf"));
        assert!(request.contains("%PDF-1.4 lesson"));
    }

    #[tokio::test]
    async fn error_detail_becomes_api_error() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve_once("422 Unprocessable Entity", r#"{"detail":"No text found"}"#).await;

        let client = ProcessingClient::new(&server.base_url, 1024).unwrap();
        let err = client.process_pdf(&pdf(&temp_dir)).await.unwrap_err();

        assert!(matches!(
            &err,
            UploadError::ApiError { status: 422, message } if message == "No text found"
        ));
        assert!(err.is_bad_input());
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn server_failure_without_detail_uses_status() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve_once("503 Service Unavailable", "<html>down</html>").await;

        let client = ProcessingClient::new(&server.base_url, 1024).unwrap();
        let err = client.process_pdf(&pdf(&temp_dir)).await.unwrap_err();

        assert_eq!(err.to_string(), "Error processing PDF: 503 Service Unavailable");
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn non_course_body_is_invalid_response() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve_once("200 OK", r#"{"status":"queued"}"#).await;

        let client = ProcessingClient::new(&server.base_url, 1024).unwrap();
        let err = client.process_pdf(&pdf(&temp_dir)).await.unwrap_err();

        assert!(matches!(err, UploadError::InvalidResponse(CourseError::UnknownShape)));
    }

    #[tokio::test]
    async fn oversized_upload_is_still_sent() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve_once("200 OK", COURSE).await;

        let client = ProcessingClient::new(&server.base_url, 4).unwrap();
        assert!(client.process_pdf(&pdf(&temp_dir)).await.is_ok());
    }
}
