use std::sync::Arc;

use crate::analysis::client::AnalysisClient;
use crate::analysis::wizard::Wizard;
use crate::errors::SubmissionError;
use crate::models::{AnalysisResult, CvFile, SubmissionForm};

/// What the result panel shows. At most one result or one error is live.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Outcome {
    #[default]
    Empty,
    Result(AnalysisResult),
    Error(String),
}

/// Host-side state for the analysis screen: the form being edited and the
/// outcome of the last submission.
pub struct SubmissionController {
    client: Arc<AnalysisClient>,
    form: SubmissionForm,
    outcome: Outcome,
    bearer_token: Option<String>,
}

impl SubmissionController {
    pub fn new(client: Arc<AnalysisClient>) -> Self {
        Self {
            client,
            form: SubmissionForm::default(),
            outcome: Outcome::Empty,
            bearer_token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every submission.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Outcome::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.client.is_busy()
    }

    pub fn wizard(&self) -> Wizard {
        Wizard::new(&self.form, self.result().is_some())
    }

    /// Replaces the selected CV. Any previous result or error is dropped.
    pub fn select_file(&mut self, file: Option<CvFile>) {
        self.form.file = file;
        self.outcome = Outcome::Empty;
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.form.job_description = text.into();
    }

    pub fn set_contact_email(&mut self, email: impl Into<String>) {
        self.form.contact_email = email.into();
    }

    pub fn set_wants_email_copy(&mut self, wants: bool) {
        self.form.wants_email_copy = wants;
    }

    /// Clears the form and the outcome. Ignored while a submission is in
    /// flight.
    pub fn reset(&mut self) {
        if self.is_busy() {
            return;
        }
        self.form = SubmissionForm::default();
        self.outcome = Outcome::Empty;
    }

    /// Runs one submission. The previous outcome is cleared up front; on
    /// return the outcome holds either the new result or the error message.
    pub async fn submit(&mut self) -> Result<(), SubmissionError> {
        if self.is_busy() {
            return Err(SubmissionError::Busy);
        }
        self.outcome = Outcome::Empty;

        let submitted = self
            .client
            .submit(&self.form, self.bearer_token.as_deref())
            .await;
        match submitted {
            Ok(result) => {
                self.outcome = Outcome::Result(result);
                Ok(())
            }
            Err(SubmissionError::Busy) => Err(SubmissionError::Busy),
            Err(err) => {
                self.outcome = Outcome::Error(err.to_string());
                Err(err)
            }
        }
    }
}
