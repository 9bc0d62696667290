use crate::config::{HealthConfig, UploadConfig};
use crate::storage::DbPool;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
struct Metrics {
    status: Gauge<i64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("hoaxify-server");
        Self {
            status: meter
                .i64_gauge("hoaxify_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: DbPool,
    upload_path: PathBuf,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(pool: DbPool, upload: &UploadConfig, config: HealthConfig) -> Self {
        Self {
            pool,
            upload_path: PathBuf::from(&upload.upload_path),
            config,
            metrics: Metrics::new(),
        }
    }

    /// Checks database connectivity.
    ///
    /// # Errors
    /// Returns a string describing the failure if the database is unreachable.
    pub async fn check_db(&self) -> Result<(), String> {
        let db_timeout = Duration::from_millis(self.config.db_timeout_ms);

        match timeout(db_timeout, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(Ok(_)) => {
                self.metrics.status.record(1, &[KeyValue::new("component", "database")]);
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "database")]);
                Err(format!("Database connection failed: {e:?}"))
            }
            Err(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "database")]);
                Err("Database connection timed out".to_string())
            }
        }
    }

    /// Checks that the upload directory is present.
    ///
    /// # Errors
    /// Returns a string describing the failure if the directory is missing.
    pub async fn check_storage(&self) -> Result<(), String> {
        let storage_timeout = Duration::from_millis(self.config.storage_timeout_ms);

        match timeout(storage_timeout, tokio::fs::metadata(&self.upload_path)).await {
            Ok(Ok(meta)) if meta.is_dir() => {
                self.metrics.status.record(1, &[KeyValue::new("component", "storage")]);
                Ok(())
            }
            Ok(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "storage")]);
                Err(format!("Upload directory missing: {}", self.upload_path.display()))
            }
            Err(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "storage")]);
                Err("Upload directory check timed out".to_string())
            }
        }
    }
}
