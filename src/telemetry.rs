use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "barbershop_notify=info";

/// Installs the global fmt subscriber. `directives` is the configured
/// `RUST_LOG`, so configuration has to be loaded first.
pub fn init(directives: Option<&str>) {
    tracing_subscriber::registry()
        .with(filter(directives))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
