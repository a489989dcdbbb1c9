//! Application-wide structured logging.
//!
//! Events are written as Bunyan-formatted JSON records. `log` records emitted
//! by actix and other dependencies are bridged into `tracing` so everything
//! ends up in the same stream.
//!
//! The filter defaults to the level passed to [`get_subscriber`] and can be
//! overridden at runtime through `RUST_LOG`.

use tracing::{Subscriber, subscriber::set_global_default};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt};

/// Builds the subscriber used by the server.
///
/// # Parameters
/// - `name`: service name written into every record
/// - `env_filter`: default filter directive when `RUST_LOG` is unset
/// - `sink`: where records are written (stdout in production, a sink in tests)
///
/// # Example
/// ```rust,no_run
/// use credlink_server::{get_subscriber, init_subscriber};
///
/// let subscriber = get_subscriber("credlink".into(), "info".into(), std::io::stdout);
/// init_subscriber(subscriber).expect("logging already initialised");
/// ```
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs `subscriber` as the global default and redirects `log` records to it.
///
/// Must be called once; a second call returns an error.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
