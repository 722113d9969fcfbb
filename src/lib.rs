pub mod catalog;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use catalog::CatalogStore;
use engine::BookingEngine;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub engine: Arc<BookingEngine>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let catalog = Arc::new(CatalogStore::new());
        let engine = Arc::new(BookingEngine::new(
            catalog.clone(),
            config.reserve_lock_timeout(),
        ));
        Self {
            catalog,
            engine,
            config,
        }
    }
}
