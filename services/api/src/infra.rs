use hiring_metrics::config::DatabaseConfig;
use hiring_metrics::error::AppError;
use hiring_metrics::metrics::{MetricsService, SqliteFactStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Open the fact store, with an optional path override, and migrate it.
pub(crate) async fn open_store(
    mut config: DatabaseConfig,
    path_override: Option<PathBuf>,
) -> Result<SqliteFactStore, AppError> {
    if let Some(path) = path_override {
        config.path = path;
    }
    let store = SqliteFactStore::setup(&config).await?;
    debug!(path = %store.db_path().display(), "fact store ready");
    Ok(store)
}

pub(crate) fn metrics_service(store: SqliteFactStore) -> Arc<MetricsService<SqliteFactStore>> {
    Arc::new(MetricsService::new(Arc::new(store)))
}
