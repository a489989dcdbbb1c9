//! Main entry point for the credlink backend.
//!
//! Sets up the Actix Web server, registers the credit-score and Plaid proxy
//! routes, and initializes shared application state (Plaid client, link
//! session). Configuration comes from the environment, optionally via `.env`.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use credlink_server::{
    AppState, PlaidClient, Settings, get_subscriber, handlers, init_subscriber,
    telemetry::RequestLoggingMiddleware,
};
use dotenv::dotenv;
use tracing_actix_web::TracingLogger;

/// Main entry point. Configures and runs the Actix Web server.
///
/// - Loads environment variables from `.env`.
/// - Initializes Bunyan JSON logging.
/// - Reads configuration; missing Plaid credentials abort startup.
/// - Registers all routes with logging middleware.
/// - Runs until Ctrl-C, then stops the server gracefully.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let subscriber = get_subscriber("credlink".to_string(), "info".to_string(), std::io::stdout);
    init_subscriber(subscriber)?;

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(
        plaid_env = settings.plaid.environment.as_str(),
        host = %settings.server.host,
        port = settings.server.port,
        "Configuration loaded"
    );

    let plaid = PlaidClient::new(&settings.plaid).context("failed to build Plaid client")?;
    let app_state = AppState::new(Arc::new(plaid));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(TracingLogger::default())
            .wrap(RequestLoggingMiddleware::new())
            .configure(handlers::configure_routes)
    })
    .bind((settings.server.host.as_str(), settings.server.port))?
    .run();

    let srv_handle = server.handle();

    let server_task = tokio::spawn(server);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Shutdown signal received");
            srv_handle.stop(true).await;
        }
        res = server_task => {
            match res {
                Ok(Err(e)) => tracing::error!("Server stopped with error: {}", e),
                Err(e) => tracing::error!("Server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }

    Ok(())
}
