use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stderr subscriber. `RUST_LOG`, when set, wins over `level`.
pub fn init(level: &str) {
  let filter = std::env::var("RUST_LOG")
    .ok()
    .and_then(|_| EnvFilter::try_from_default_env().ok())
    .unwrap_or_else(|| EnvFilter::new(level));

  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .try_init();
}
