//! Database Module
//!
//! Selects the active store once at startup: the networked primary when its
//! liveness probe answers, otherwise the embedded fallback (bootstrapping its
//! schema on the way). The rest of the system only ever sees the resulting
//! [`AnyPool`]; nothing outside this module branches on backend identity.

pub mod models;
pub mod repository;
pub mod schema;

use std::fmt;
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::Config;
use crate::utils::{AppError, AppResult};

/// Which store the station ended up on. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Primary,
    Fallback,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Primary => write!(f, "primary"),
            Backend::Fallback => write!(f, "fallback"),
        }
    }
}

/// Database service — owns the active connection pool
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: AnyPool,
    pub backend: Backend,
}

impl DbService {
    /// Establish the active store.
    ///
    /// Single attempt against the primary (offline-first, no reconnect
    /// loop); any probe failure falls through to the embedded store. Both
    /// stores failing is fatal to startup.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        sqlx::any::install_default_drivers();

        let primary_err =
            match tokio::time::timeout(config.probe_timeout(), Self::open_primary(config)).await {
                Ok(Ok(pool)) => {
                    tracing::info!("Primary store active");
                    return Ok(Self {
                        pool,
                        backend: Backend::Primary,
                    });
                }
                Ok(Err(e)) => e,
                Err(_) => AppError::connection("primary probe timed out"),
            };

        tracing::warn!(error = %primary_err, "Primary store unreachable, switching to embedded store");

        let pool = Self::open_fallback(config).await.map_err(|fallback_err| {
            AppError::connection(format!(
                "neither store reachable: primary: {primary_err}; fallback: {fallback_err}"
            ))
        })?;

        schema::ensure_schema(&pool).await?;
        tracing::info!(path = %config.fallback_path, "Embedded store active");

        Ok(Self {
            pool,
            backend: Backend::Fallback,
        })
    }

    async fn open_primary(config: &Config) -> AppResult<AnyPool> {
        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(config.probe_timeout())
            .connect(&config.primary_url)
            .await
            .map_err(|e| AppError::connection(format!("open primary: {e}")))?;

        Self::probe(&pool, config.probe_timeout()).await?;
        Ok(pool)
    }

    async fn open_fallback(config: &Config) -> AppResult<AnyPool> {
        // mode=rwc: create the store file on first run
        let url = format!("sqlite://{}?mode=rwc", config.fallback_path);

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(config.probe_timeout())
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    // Station pragmas, per connection: WAL, FK enforcement
                    // (cascade deletes), 5s busy wait on write contention
                    sqlx::query("PRAGMA journal_mode = WAL")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA foreign_keys = ON")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .map_err(|e| AppError::connection(format!("open fallback: {e}")))?;

        Self::probe(&pool, config.probe_timeout()).await?;
        Ok(pool)
    }

    /// Round-trip liveness probe with a bounded timeout
    async fn probe(pool: &AnyPool, timeout: Duration) -> AppResult<()> {
        tokio::time::timeout(timeout, sqlx::query("SELECT 1").fetch_one(pool))
            .await
            .map_err(|_| AppError::connection("liveness probe timed out"))?
            .map_err(|e| AppError::connection(format!("liveness probe: {e}")))?;
        Ok(())
    }
}
