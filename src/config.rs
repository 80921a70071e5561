use anyhow::{anyhow, Context};
use time::{macros::format_description, UtcOffset};

/// Postgres connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

/// Which `Store` implementation backs the service.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres(DatabaseConfig),
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    /// Offset used to derive the attendance date and check-in time.
    pub utc_offset: UtcOffset,
}

impl AppConfig {
    /// Must run before the tokio runtime spawns worker threads, otherwise the
    /// host's local offset cannot be determined and UTC is used.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match var("APP_PORT") {
            Some(v) => v.parse::<u16>().with_context(|| format!("APP_PORT={v}"))?,
            None => 8080,
        };

        let store = match var("APP_STORE").as_deref().unwrap_or("postgres") {
            "postgres" => StoreConfig::Postgres(DatabaseConfig {
                url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: var("DB_MAX_CONNECTIONS")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(10),
                run_migrations: var("RUN_MIGRATIONS")
                    .map(|v| !matches!(v.as_str(), "0" | "false" | "no"))
                    .unwrap_or(true),
            }),
            "memory" => StoreConfig::Memory,
            other => return Err(anyhow!("unknown APP_STORE '{other}', expected postgres or memory")),
        };

        let utc_offset = match var("APP_UTC_OFFSET") {
            Some(v) => parse_offset(&v)?,
            None => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        };

        Ok(Self {
            host,
            port,
            store,
            utc_offset,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("APP_UTC_OFFSET={raw}, expected +HH:MM"))
}
