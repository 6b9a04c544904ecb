//! CLI wiring: data directory, configuration and client construction

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use voltbay_core::storage::FileCredentialStore;
use voltbay_core::{AppConfig, SessionWatch};
use voltbay_http::VoltbayClient;

const SESSION_FILE: &str = "session.json";

/// Resolve the data directory: explicit flag, then `VOLTBAY_STATE_DIR`,
/// then the platform data dir.
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        if let Ok(state_dir) = std::env::var("VOLTBAY_STATE_DIR") {
            PathBuf::from(state_dir)
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("voltbay")
        }
    })
}

/// Everything a command needs to talk to the backend.
pub struct Session {
    pub client: VoltbayClient,
    pub watch: SessionWatch,
}

/// Load configuration, open the session store and build the client.
pub async fn connect(data_dir: Option<PathBuf>, base_url: Option<String>) -> Result<Session> {
    let config = AppConfig::load()?;
    let base_url = base_url.unwrap_or_else(|| config.api.base_url.clone());

    let store =
        FileCredentialStore::open(resolve_data_dir(data_dir).join(SESSION_FILE)).await?;
    let watch = SessionWatch::new();
    let client = VoltbayClient::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .credential_store(Arc::new(store))
        .session_watch(watch.clone())
        .build()?;

    Ok(Session { client, watch })
}
