use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for a binary.
///
/// `default_directives` applies when `RUST_LOG` is unset. Logs go to stderr
/// so the client binaries can keep stdout clean for task results.
pub fn init(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
