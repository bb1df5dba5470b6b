use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use engineer_intake::config::{AppConfig, SessionConfig};
use engineer_intake::error::AppError;
use engineer_intake::telemetry;
use engineer_intake::workflows::booking::BookingService;
use engineer_intake::workflows::intake::{
    IntakeHandoff, LoggingHandoff, NominatimGeocoder, ReverseGeocoder,
};
use engineer_intake::workflows::registration::RegistrationService;
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

    let geocoder = NominatimGeocoder::new(&config.geocoding)?;
    let handoff = Arc::new(LoggingHandoff);
    let bookings = Arc::new(BookingService::new(geocoder, handoff.clone()));
    let registrations = Arc::new(RegistrationService::new(handoff));

    tokio::spawn(sweep_idle_sessions(
        bookings.clone(),
        registrations.clone(),
        config.sessions.clone(),
    ));

    let app = with_intake_routes(bookings, registrations)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        geocoder = %config.geocoding.base_url,
        "engineer intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drops form sessions their clients walked away from.
async fn sweep_idle_sessions<G, H>(
    bookings: Arc<BookingService<G, H>>,
    registrations: Arc<RegistrationService<H>>,
    sessions: SessionConfig,
) where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    let mut ticker = tokio::time::interval(sessions.sweep_interval());
    loop {
        ticker.tick().await;
        bookings.evict_idle(sessions.idle_timeout);
        registrations.evict_idle(sessions.idle_timeout);
    }
}
