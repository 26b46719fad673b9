//! Backend entry-point: wires the redirect endpoints, health probes, and
//! OpenAPI docs over a PostgreSQL pool.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::AppConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()
        .map_err(|err| std::io::Error::other(format!("configuration error: {err}")))?;

    let pool = DbPool::new(PoolConfig::new(config.database_url.as_str()))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool error: {err}")))?;

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, &pool, &config)?;

    info!(
        bind_addr = %config.bind_addr,
        default_platform = %config.default_platform,
        ttl_minutes = config.ttl_minutes,
        "redirect backend listening"
    );
    server.await
}
