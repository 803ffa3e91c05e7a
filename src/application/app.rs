use std::sync::Arc;

use anyhow::Result;

use crate::domain::services::QueryCache;
use crate::domain::services::SessionStore;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::SaviApi;
use crate::infrastructure::storage::file::FileStorage;

/// Everything a screen needs, built once per run.
pub struct App {
    pub session: Arc<SessionStore>,
    pub api: Arc<SaviApi>,
    pub cache: Arc<QueryCache>,
}

impl App {
    pub fn new(session: Arc<SessionStore>, api: Arc<SaviApi>, cache: Arc<QueryCache>) -> App {
        return App {
            session,
            api,
            cache,
        };
    }

    /// Wires the app from the loaded config and restores the stored session.
    pub async fn start() -> Result<App> {
        let session = SessionStore::new(Box::<FileStorage>::default());
        session.hydrate().await;

        let api = SaviApi::new(ApiClient::from_config(session.clone())?);
        return Ok(App::new(
            session,
            Arc::new(api),
            Arc::new(QueryCache::default()),
        ));
    }

    /// Waits for queued session writes before the process exits.
    pub async fn shutdown(&self) {
        self.session.flush().await;
    }
}
