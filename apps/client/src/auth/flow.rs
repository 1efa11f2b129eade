use serde_json::Value;
use tracing::debug;

use crate::auth::client::AuthClient;
use crate::errors::AuthError;

/// Where a login attempt stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginStep {
    AwaitingEmail,
    /// A code was sent to `email`; the email can no longer be edited.
    AwaitingCode { email: String },
    Complete { user: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginEvent {
    OtpSent { email: String },
    Verified { user: Value },
    Cancelled,
}

/// Legal transitions of the two-step login. Events that do not apply to the
/// current step leave it unchanged.
pub fn transition(step: LoginStep, event: LoginEvent) -> LoginStep {
    match (step, event) {
        (_, LoginEvent::Cancelled) => LoginStep::AwaitingEmail,
        (LoginStep::AwaitingEmail, LoginEvent::OtpSent { email }) => {
            LoginStep::AwaitingCode { email }
        }
        (LoginStep::AwaitingCode { .. }, LoginEvent::Verified { user }) => {
            LoginStep::Complete { user }
        }
        (step, _) => step,
    }
}

/// Host-side state of the login dialog: the step plus the text inputs and
/// the last error. Failed steps keep their state so the user can retry.
#[derive(Debug, Clone)]
pub struct LoginFlow {
    step: LoginStep,
    email_input: String,
    code_input: String,
    error: Option<String>,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFlow {
    pub fn new() -> Self {
        Self {
            step: LoginStep::AwaitingEmail,
            email_input: String::new(),
            code_input: String::new(),
            error: None,
        }
    }

    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    pub fn email_input(&self) -> &str {
        &self.email_input
    }

    pub fn code_input(&self) -> &str {
        &self.code_input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_email_locked(&self) -> bool {
        !matches!(self.step, LoginStep::AwaitingEmail)
    }

    /// Edits the email. Returns `false` (and changes nothing) once the code
    /// step has begun.
    pub fn set_email(&mut self, email: impl Into<String>) -> bool {
        if self.is_email_locked() {
            return false;
        }
        self.email_input = email.into();
        true
    }

    /// Edits the code. Only accepted while waiting for one.
    pub fn set_code(&mut self, code: impl Into<String>) -> bool {
        if !matches!(self.step, LoginStep::AwaitingCode { .. }) {
            return false;
        }
        self.code_input = code.into();
        true
    }

    /// Step one: ask the auth service to email a code. No-op outside
    /// `AwaitingEmail`.
    pub async fn send_otp(&mut self, auth: &AuthClient) -> Result<(), AuthError> {
        if self.step != LoginStep::AwaitingEmail {
            return Ok(());
        }
        self.error = None;

        let email = self.email_input.trim().to_string();
        match auth.request_otp(&email).await {
            Ok(_) => {
                debug!("Login moved to code entry");
                self.apply(LoginEvent::OtpSent { email });
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Step two: verify the code for the locked email, persist the token and
    /// return the user object. No-op outside `AwaitingCode`.
    pub async fn verify(&mut self, auth: &AuthClient) -> Result<Option<Value>, AuthError> {
        let LoginStep::AwaitingCode { email } = &self.step else {
            return Ok(None);
        };
        let email = email.clone();
        self.error = None;

        let verified = auth.verify_otp(&email, &self.code_input).await;
        let session = match verified {
            Ok(session) => session,
            Err(err) => return Err(self.fail(err)),
        };
        if let Err(err) = auth.set_token(&session.token).await {
            return Err(self.fail(err.into()));
        }

        self.apply(LoginEvent::Verified {
            user: session.user.clone(),
        });
        Ok(Some(session.user))
    }

    /// Abandons the attempt. Inputs and errors are cleared so a new attempt
    /// starts from scratch.
    pub fn cancel(&mut self) {
        *self = Self::new();
    }

    fn apply(&mut self, event: LoginEvent) {
        let step = std::mem::replace(&mut self.step, LoginStep::AwaitingEmail);
        self.step = transition(step, event);
    }

    fn fail(&mut self, err: AuthError) -> AuthError {
        self.error = Some(err.to_string());
        err
    }
}
