use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs color-eyre hooks and a layered subscriber: env-filter, fmt output,
/// and error-span capture. Call once at process start; `RUST_LOG` overrides
/// the default directive.
pub fn init_tracing(default_directive: &str) -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
