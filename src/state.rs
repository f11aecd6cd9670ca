use crate::{config::AppConfig, services::storage::StorageService};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: StorageService,
}

impl AppState {
    pub fn new(config: AppConfig, storage: StorageService) -> Self {
        Self { config, storage }
    }
}
