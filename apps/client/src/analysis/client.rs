use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::api_client::{endpoint, ApiRequest, BusyFlag, RawResponse, Transport};
use crate::errors::{SubmissionError, TransportError, ANALYSIS_FAILED};
use crate::models::{AnalysisResult, AnalyzeResponse, SubmissionForm};

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const HEALTH_PATH: &str = "/api/health";

/// Submits CV + job description pairs to the analysis service.
///
/// At most one submission is in flight per client: a call made while another
/// is outstanding fails with [`SubmissionError::Busy`] and sends nothing.
pub struct AnalysisClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    busy: BusyFlag,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            busy: BusyFlag::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Validates the form, sends exactly one multipart POST to
    /// `/api/analyze` and interprets the reply. Never retries.
    ///
    /// `bearer_token` is attached as `Authorization: Bearer` when given.
    pub async fn submit(
        &self,
        form: &SubmissionForm,
        bearer_token: Option<&str>,
    ) -> Result<AnalysisResult, SubmissionError> {
        let _busy = self.busy.try_claim().ok_or(SubmissionError::Busy)?;

        let parts = form.to_multipart()?;
        let request = ApiRequest::post_multipart(endpoint(&self.base_url, ANALYZE_PATH), parts)
            .with_bearer_token(bearer_token);

        info!(
            "Submitting CV for analysis ({} bytes, email copy: {})",
            form.file.as_ref().map(|f| f.size()).unwrap_or_default(),
            form.wants_email_copy
        );

        let response = self.transport.send(request).await.map_err(|e| {
            warn!("Analysis request failed: {e}");
            SubmissionError::Transport(e)
        })?;

        let outcome = interpret_analyze_response(&response);
        match &outcome {
            Ok(result) => info!("Analysis complete: score {}", result.match_score),
            Err(e) => warn!("Analysis rejected (status {}): {e}", response.status),
        }
        outcome
    }

    /// `GET /api/health`. True when the service answers `{"ok": true}`.
    pub async fn health(&self) -> Result<bool, TransportError> {
        let response = self
            .transport
            .send(ApiRequest::get(endpoint(&self.base_url, HEALTH_PATH)))
            .await?;
        Ok(response.is_success()
            && response
                .json()
                .and_then(|body| body.get("ok").and_then(Value::as_bool))
                .unwrap_or(false))
    }
}

/// Maps an `/api/analyze` reply onto a result or an error.
///
/// - body not JSON, failure status: the body text, or "Analysis failed" when
///   the body is empty;
/// - body not JSON, success status: "Unexpected response";
/// - JSON, failure status: `message`, else `detail`, else "Analysis failed";
/// - JSON object, success status: the analysis result, each field read on
///   its own with defaults for missing or mistyped ones;
/// - any other JSON on a success status: "Unexpected response".
pub fn interpret_analyze_response(
    response: &RawResponse,
) -> Result<AnalysisResult, SubmissionError> {
    let Some(data) = response.json() else {
        if !response.is_success() {
            let text = response.text();
            return Err(SubmissionError::Rejected {
                status: response.status,
                message: if text.is_empty() {
                    ANALYSIS_FAILED.to_string()
                } else {
                    text
                },
            });
        }
        return Err(SubmissionError::MalformedResponse);
    };

    if !response.is_success() {
        let message = message_field(&data, "message")
            .or_else(|| message_field(&data, "detail"))
            .unwrap_or_else(|| ANALYSIS_FAILED.to_string());
        return Err(SubmissionError::Rejected {
            status: response.status,
            message,
        });
    }

    if !data.is_object() {
        return Err(SubmissionError::MalformedResponse);
    }
    serde_json::from_value::<AnalyzeResponse>(data)
        .map(AnalysisResult::from)
        .map_err(|_| SubmissionError::MalformedResponse)
}

/// A field usable as an error message: present and not null, false, zero or
/// an empty string. Structured values (e.g. validation detail lists) are
/// rendered as JSON.
fn message_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
