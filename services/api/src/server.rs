use crate::cli::ServeArgs;
use crate::infra::{load_snapshot, AppState};
use crate::routes::counselling_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tn_counsel::config::AppConfig;
use tn_counsel::error::AppError;
use tn_counsel::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    args.dataset.apply(&mut config.dataset);

    telemetry::init(&config.telemetry)?;

    let snapshot = load_snapshot(&config.dataset)?;
    let year = snapshot.year();
    let rows = snapshot.master().len();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState::new(
        readiness_flag.clone(),
        Arc::new(prometheus_handle),
        config.dataset.clone(),
        snapshot,
    );

    let app = counselling_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, year, rows, "counselling ranker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
