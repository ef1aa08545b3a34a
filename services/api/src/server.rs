use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMarketplaceRepository, LoggingNotificationPublisher};
use crate::routes::with_core_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leadmarket::config::AppConfig;
use leadmarket::error::AppError;
use leadmarket::marketplace::MarketplaceService;
use leadmarket::rating::{CarrierCatalog, RatingEngine};
use leadmarket::telemetry;
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

    let engine = Arc::new(RatingEngine::new(CarrierCatalog::standard()));
    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let notifier = Arc::new(LoggingNotificationPublisher::default());
    let marketplace = Arc::new(MarketplaceService::new(repository, notifier));

    let app = with_core_routes(engine, marketplace)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
