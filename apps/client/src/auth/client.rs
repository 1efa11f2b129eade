use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api_client::{endpoint, ApiRequest, BusyFlag, RawResponse, Transport};
use crate::auth::token_store::{TokenStore, TOKEN_KEY};
use crate::errors::{AuthError, StorageError, ValidationError};
use crate::models::VerifiedSession;

pub const REQUEST_OTP_PATH: &str = "/api/auth/request-otp";
pub const VERIFY_OTP_PATH: &str = "/api/auth/verify-otp";

const REQUEST_OTP_FAILED: &str = "otp_failed";
const VERIFY_OTP_FAILED: &str = "verify_failed";

/// Email one-time-password login against the auth service, plus access to
/// the persisted bearer token. Holds no session state of its own beyond
/// what is in the [`TokenStore`].
pub struct AuthClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn TokenStore>,
    busy: BusyFlag,
}

impl AuthClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            store,
            busy: BusyFlag::default(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Asks the service to email a code to `email`. A blank email fails
    /// locally without a request.
    pub async fn request_otp(&self, email: &str) -> Result<Value, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingLoginEmail.into());
        }
        let _busy = self.busy.try_claim().ok_or(AuthError::Busy)?;

        let response = self
            .transport
            .send(ApiRequest::post_json(
                endpoint(&self.base_url, REQUEST_OTP_PATH),
                json!({ "email": email }),
            ))
            .await?;

        let response = ensure_success(response, REQUEST_OTP_FAILED)?;
        info!("One-time code requested");
        response.json().ok_or(AuthError::MalformedResponse)
    }

    /// Exchanges an emailed code for a bearer token and user object. The
    /// token is returned, not stored; see [`AuthClient::set_token`].
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifiedSession, AuthError> {
        let (email, code) = (email.trim(), code.trim());
        if code.is_empty() {
            return Err(ValidationError::MissingOtpCode.into());
        }
        if email.is_empty() {
            return Err(ValidationError::MissingLoginEmail.into());
        }
        let _busy = self.busy.try_claim().ok_or(AuthError::Busy)?;

        let response = self
            .transport
            .send(ApiRequest::post_json(
                endpoint(&self.base_url, VERIFY_OTP_PATH),
                json!({ "email": email, "code": code }),
            ))
            .await?;

        let response = ensure_success(response, VERIFY_OTP_FAILED)?;
        let session: VerifiedSession =
            serde_json::from_slice(&response.body).map_err(|_| AuthError::MalformedResponse)?;
        if session.token.is_empty() {
            return Err(AuthError::MalformedResponse);
        }

        info!("One-time code verified");
        Ok(session)
    }

    /// Persists the token; an empty token removes the stored one instead.
    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        if token.is_empty() {
            self.store.remove(TOKEN_KEY).await
        } else {
            self.store.set(TOKEN_KEY, token).await
        }
    }

    /// The stored token, or an empty string when logged out.
    pub async fn get_token(&self) -> Result<String, StorageError> {
        Ok(self.store.get(TOKEN_KEY).await?.unwrap_or_default())
    }

    pub async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(!self.get_token().await?.is_empty())
    }
}

/// Non-2xx replies fail with the raw body text, or `fallback` when empty.
fn ensure_success(response: RawResponse, fallback: &str) -> Result<RawResponse, AuthError> {
    if response.is_success() {
        return Ok(response);
    }
    let text = response.text();
    warn!("Auth request rejected with status {}", response.status);
    Err(AuthError::Rejected {
        status: response.status,
        message: if text.is_empty() {
            fallback.to_string()
        } else {
            text
        },
    })
}
