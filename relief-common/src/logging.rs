/// Initialise the global `tracing` subscriber from `RUST_LOG`, defaulting to
/// `info` when unset. Call once, at process start.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
