use crate::config::{AppSettings, Config};
use crate::db::Database;

/// Everything a request handler needs; shared read-only by all workers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new(db: Database, settings: AppSettings) -> Self {
        Self { db, settings }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Database::new(cfg.db_path.clone()), AppSettings::from(cfg))
    }
}
