//! Client for the CV-to-job-description match service.
//!
//! Two independent pieces drive everything:
//! - [`analysis`]: validates a CV + job description form, submits it as one
//!   multipart request and maps the reply to a result or an inline error.
//! - [`auth`]: the two-step email OTP login and the persisted bearer token.
//!
//! All HTTP goes through the [`api_client::Transport`] seam; the persisted
//! token goes through [`auth::TokenStore`]. Both are injectable.

pub mod analysis;
pub mod api_client;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod state;
