use crate::cli::ServeArgs;
use crate::error::AppError;
use crate::infra::{build_orchestrator, AppState};
use crate::routes::compliance_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use compliance_engine::config::AppConfig;
use compliance_engine::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let orchestrator = Arc::new(build_orchestrator(&config)?);
    let configured = orchestrator.registry().configured().len();

    let app = compliance_router(orchestrator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, rule_sets = configured, "compliance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
