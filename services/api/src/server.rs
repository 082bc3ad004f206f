use crate::cli::ServeArgs;
use crate::infra::{metrics_service, open_store, AppState};
use crate::routes::with_metrics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiring_metrics::config::AppConfig;
use hiring_metrics::error::AppError;
use hiring_metrics::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = open_store(config.database.clone(), None).await?;
    let service = metrics_service(store);

    let app = with_metrics_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        database = %config.database.path.display(),
        "hiring metrics service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
