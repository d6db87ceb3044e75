//! Logging setup utilities for the Tumult chat application.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Library crates whose events are enabled by the default filter.
const LIBRARY_TARGETS: [&str; 3] = ["tumult_shared", "tumult_server", "tumult_client"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// A binary whose target is already a library target is listed once.
fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<&str> = LIBRARY_TARGETS.to_vec();
    if !targets.contains(&binary_target.as_str()) {
        targets.push(&binary_target);
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the library crates and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
/// Output goes to stderr so it never interleaves with chat output on stdout.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tumult-server", "tumult-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use tumult_shared::logger::setup_logger;
///
/// setup_logger("tumult-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
