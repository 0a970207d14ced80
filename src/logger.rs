use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `tracing` subscriber for the binary.
///
/// Verbosity comes from `RUST_LOG`, falling back to `info`.
pub fn init() {
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("info"));

	let fmt_layer = fmt::layer()
		.with_target(false)
		.with_timer(fmt::time::uptime())
		.with_writer(std::io::stderr);

	tracing_subscriber::registry()
		.with(env_filter)
		.with(fmt_layer)
		.init();
}
