//! Shared state for the redirect service.

use fotodrop_core::Config;
use fotodrop_ledger::AliasLedger;
use std::sync::Arc;

pub struct AppState {
    pub ledger: Arc<dyn AliasLedger>,
    /// Shared secret for the write endpoint. When unset, every update is
    /// refused with 401.
    pub update_secret: Option<String>,
    /// Provider URL prefix that folder ids are appended to.
    pub folder_base_url: String,
    pub linktree_url: Option<String>,
}

impl AppState {
    pub fn new(config: &Config, ledger: Arc<dyn AliasLedger>) -> Self {
        AppState {
            ledger,
            update_secret: config.redirect_api_secret().map(String::from),
            folder_base_url: config.provider_folder_base_url().to_string(),
            linktree_url: config.linktree_url().map(String::from),
        }
    }

    pub fn folder_url(&self, folder_id: &str) -> String {
        format!("{}/{}", self.folder_base_url.trim_end_matches('/'), folder_id)
    }
}
