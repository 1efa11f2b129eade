// Email OTP login: the HTTP client for the auth service, the login dialog
// state machine, and the persisted bearer token.

pub mod client;
pub mod flow;
pub mod token_store;

pub use client::AuthClient;
pub use flow::{LoginFlow, LoginStep};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
