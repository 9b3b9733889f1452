//! Fintrack entry-point: loads settings, installs JSON logging and runs the
//! HTTP server until it is stopped.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fintrack::inbound::http::health::HealthState;
use fintrack::server::{Collaborators, ServerSettings, create_server};

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

    let settings = ServerSettings::load().map_err(std::io::Error::other)?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &settings, Collaborators::default())?;
    info!(
        bind_addr = settings.bind_addr.as_deref().unwrap_or("0.0.0.0:8080"),
        "fintrack listening"
    );

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
