//! Server construction and middleware wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::{RedirectService, RedirectSettings};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::redirect::{confirm_redirect, next_redirect, redirect_stats};
use backend::inbound::http::state::HttpState;
use backend::middleware::trace::attach_trace_id;
use backend::outbound::persistence::{
    DbPool, DieselConsultantRoster, DieselDailyActivityCounter, DieselReservationLog,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Wire the database adapters and domain service into HTTP state.
pub fn build_http_state(pool: &DbPool, config: &AppConfig) -> HttpState {
    let service = Arc::new(RedirectService::new(
        Arc::new(DieselConsultantRoster::new(pool.clone())),
        Arc::new(DieselDailyActivityCounter::new(pool.clone())),
        Arc::new(DieselReservationLog::new(pool.clone())),
        Arc::new(DefaultClock),
        RedirectSettings::new(config.ttl_minutes, config.backups.clone()),
    ));

    HttpState::new(service.clone(), service, config.default_platform.clone())
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(from_fn(attach_trace_id))
        .service(next_redirect)
        .service(confirm_redirect)
        .service(redirect_stats)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server over the given pool and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    pool: &DbPool,
    config: &AppConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(pool, config));

    #[cfg(feature = "metrics")]
    let prometheus = make_metrics();

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    actix_web_prom::PrometheusMetricsBuilder::new("redirect")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}
