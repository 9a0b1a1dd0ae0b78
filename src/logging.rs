use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so they never mix with converted output on stdout. The filter comes from
/// `DOTNOTE_LOG` (e.g. `DOTNOTE_LOG=dotnote=trace`) and defaults to warnings only.
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_env("DOTNOTE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
