use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{AccountService, CatService, OwnershipPolicy, ToyService};

/// Shared router state: immutable configuration plus the store handle
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn policy(&self) -> OwnershipPolicy {
        OwnershipPolicy::from_config(&self.config.security)
    }

    pub fn cats(&self) -> CatService {
        CatService::new(self.store.clone(), self.policy())
    }

    pub fn toys(&self) -> ToyService {
        ToyService::new(self.store.clone(), self.policy())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone())
    }
}
