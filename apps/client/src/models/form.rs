use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::warn;

use crate::api_client::FormPart;
use crate::errors::ValidationError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Uploads above this size are still sent, but are likely to be refused.
pub const RECOMMENDED_MAX_CV_BYTES: usize = 3 * 1024 * 1024;

/// A résumé selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct CvFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl CvFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reads a `.pdf` or `.docx` file from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let content_type = content_type_for(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read CV at {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cv".to_string());

        if bytes.len() > RECOMMENDED_MAX_CV_BYTES {
            warn!(
                "{} is {} bytes; the analysis service expects CVs under ~3MB",
                file_name,
                bytes.len()
            );
        }

        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// Maps an accepted CV extension to its MIME type.
pub fn content_type_for(path: &Path) -> Result<&'static str, ValidationError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => Ok(PDF_CONTENT_TYPE),
        Some("docx") => Ok(DOCX_CONTENT_TYPE),
        _ => Err(ValidationError::UnsupportedFileType),
    }
}

/// Everything the user fills in before asking for an analysis. Lives only in
/// memory; emptied by a reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionForm {
    pub file: Option<CvFile>,
    pub job_description: String,
    pub contact_email: String,
    pub wants_email_copy: bool,
}

impl SubmissionForm {
    /// Checks preconditions in order, stopping at the first failure.
    pub fn validate(&self) -> Result<&CvFile, ValidationError> {
        let file = self.file.as_ref().ok_or(ValidationError::MissingFile)?;
        if self.job_description.trim().is_empty() {
            return Err(ValidationError::MissingJobDescription);
        }
        if self.wants_email_copy && self.contact_email.trim().is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        Ok(file)
    }

    /// Validates and packages the form as the `/api/analyze` multipart body:
    /// `cv`, `jdText`, `email` (only when non-empty) and `sendEmail`.
    pub fn to_multipart(&self) -> Result<Vec<FormPart>, ValidationError> {
        let file = self.validate()?;

        let mut parts = vec![
            FormPart::File {
                name: "cv".to_string(),
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                bytes: file.bytes.clone(),
            },
            FormPart::text("jdText", self.job_description.clone()),
        ];
        if !self.contact_email.is_empty() {
            parts.push(FormPart::text("email", self.contact_email.clone()));
        }
        parts.push(FormPart::text("sendEmail", self.wants_email_copy.to_string()));

        Ok(parts)
    }
}
