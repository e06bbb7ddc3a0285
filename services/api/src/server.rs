use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryApplicationRepository, InMemoryJobRepository, InMemoryProfileRepository,
};
use crate::routes::with_board_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tu_brete::board::postings::PostingGuard;
use tu_brete::board::BoardState;
use tu_brete::config::AppConfig;
use tu_brete::error::AppError;
use tu_brete::telemetry;
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

    let jobs = match &config.board.seed_csv {
        Some(path) => {
            let repository = InMemoryJobRepository::from_csv(path)?;
            info!(path = %path.display(), "listing store seeded from export");
            repository
        }
        None => InMemoryJobRepository::default(),
    };

    let board = BoardState::new(
        Arc::new(jobs),
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryProfileRepository::default()),
        PostingGuard::with_ttl_days(config.board.posting_ttl_days),
    );

    let app = with_board_routes(board)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board ready");

    axum::serve(listener, app).await?;
    Ok(())
}
