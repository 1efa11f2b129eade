use thiserror::Error;

/// Generic message shown when a failed analysis carries no usable text.
pub const ANALYSIS_FAILED: &str = "Analysis failed";
/// Shown when a transport failure has no message of its own.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Input problems detected before any request leaves the client.
/// `Display` is the inline message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Upload a CV (PDF or DOCX).")]
    MissingFile,

    #[error("Paste the Job Description.")]
    MissingJobDescription,

    #[error("Enter an email to receive the PDF.")]
    MissingEmail,

    #[error("Enter email")]
    MissingLoginEmail,

    #[error("Enter OTP")]
    MissingOtpCode,

    #[error("Only PDF or DOCX files are supported")]
    UnsupportedFileType,
}

/// The request never produced an HTTP response (offline, DNS, refused...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self(SOMETHING_WENT_WRONG.to_string())
        } else {
            Self(message)
        }
    }
}

/// Failure of a single analysis attempt. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Non-2xx response; message extracted from the JSON or text body.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 2xx response whose body is not the expected JSON.
    #[error("Unexpected response")]
    MalformedResponse,

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("An analysis is already in progress")]
    Busy,
}

impl SubmissionError {
    /// True when the attempt failed before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, SubmissionError::Validation(_) | SubmissionError::Busy)
    }
}

/// Persisted token storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of one OTP login step.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response")]
    MalformedResponse,

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("A login request is already in progress")]
    Busy,
}
