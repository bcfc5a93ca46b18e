use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset: dev logs in debug builds only.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose || cfg!(debug_assertions) {
        "farmflow_scheduler=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Logs go to stderr so CLI stdout stays
/// machine-readable. Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_names(true),
        )
        .try_init();
}
