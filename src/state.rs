use std::sync::Arc;

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared handler dependencies, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Result<Self, TokenError> {
        let tokens = TokenService::from_config(&config.security)?;
        Ok(Self {
            store,
            tokens,
            config: Arc::new(config),
        })
    }
}
