use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::analysis::AnalysisClient;
use crate::api_client::{ReqwestTransport, Transport};
use crate::auth::{AuthClient, FileTokenStore, TokenStore};
use crate::config::Config;

/// Shared client state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analysis: Arc<AnalysisClient>,
    pub auth: Arc<AuthClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_file.clone()));

        info!(
            "Analysis API at {}, auth API at {}",
            config.api_url, config.auth_url
        );

        Ok(Self {
            analysis: Arc::new(AnalysisClient::new(
                config.api_url.clone(),
                transport.clone(),
            )),
            auth: Arc::new(AuthClient::new(config.auth_url.clone(), transport, store)),
            config,
        })
    }
}
