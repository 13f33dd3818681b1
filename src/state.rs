use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::config::AppConfig;
use crate::database::Store;

/// Shared by every handler through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionKeys>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig, sessions: SessionKeys) -> Self {
        Self {
            store,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }
}
