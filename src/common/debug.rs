use tracing_subscriber::EnvFilter;

/// Set up verbose logging for tests and examples. Safe to call repeatedly;
/// later calls are no-ops.
pub fn setup_logging_verbose() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
