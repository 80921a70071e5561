use std::sync::Arc;

use time::UtcOffset;
use tracing::{info, warn};

use crate::config::{AppConfig, StoreConfig};
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the configured store; applies migrations when asked to.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match &config.store {
            StoreConfig::Postgres(db) => {
                let pg = PgStore::connect(db).await?;
                if db.run_migrations {
                    if let Err(e) = pg.migrate().await {
                        warn!(error = %e, "migration failed; continuing");
                    }
                }
                info!(max_connections = db.max_connections, "postgres store ready");
                Arc::new(pg)
            }
            StoreConfig::Memory => {
                warn!("using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// State over a fresh `MemoryStore`, dates in UTC.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreConfig::Memory,
            utc_offset: UtcOffset::UTC,
        });
        Self::from_parts(store, config)
    }
}
