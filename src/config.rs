use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::{info, warn};

use crate::domain::status::{StageCatalogue, DEFAULT_STAGES};

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: String,
    pub schema_path: String,
    pub max_workers: usize,
    pub stages: StageCatalogue,
    pub tax_percent: u32,
    pub page_size: usize,
}

impl Config {
    pub fn load() -> Self {
        let stages = StageCatalogue::parse(&try_load::<String>("VISA_STAGES", &DEFAULT_STAGES.join(",")));
        let stages = if stages.is_empty() {
            warn!("VISA_STAGES has no usable stages, using defaults");
            StageCatalogue::default()
        } else {
            stages
        };

        Self {
            addr: try_load("VISA_DESK_ADDR", "127.0.0.1:3000"),
            db_path: try_load("VISA_DESK_DB", "visa_desk.sqlite3"),
            schema_path: try_load("VISA_DESK_SCHEMA", "sql/schema.sql"),
            max_workers: try_load("VISA_DESK_WORKERS", "8"),
            stages,
            tax_percent: try_load("VISA_TAX_PERCENT", "18"),
            page_size: try_load("VISA_PAGE_SIZE", "10"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("{key} not set, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| default.to_string());

    raw.parse().unwrap_or_else(|e| {
        warn!("{key}={raw} is invalid ({e}), using default: {default}");
        match default.parse() {
            Ok(value) => value,
            Err(e) => panic!("default for {key} does not parse: {e}"),
        }
    })
}

/// Settings the request handlers need. Cloned into every worker.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub stages: StageCatalogue,
    pub tax_percent: u32,
    pub page_size: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            stages: StageCatalogue::default(),
            tax_percent: 18,
            page_size: 10,
        }
    }
}

impl From<&Config> for AppSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            stages: cfg.stages.clone(),
            tax_percent: cfg.tax_percent,
            page_size: cfg.page_size.max(1),
        }
    }
}
