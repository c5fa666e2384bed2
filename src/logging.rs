use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Output format for process-wide logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console output for interactive sessions.
    Console,
    /// Line-delimited JSON for non-interactive output.
    Json,
}

impl LogFormat {
    /// Pick the format from whether stderr is attached to a terminal.
    pub fn detect() -> Self {
        if std::io::stderr().is_terminal() {
            LogFormat::Console
        } else {
            LogFormat::Json
        }
    }
}

/// Install the global tracing subscriber. Call once at process start;
/// `RUST_LOG` overrides the default level.
pub fn init(format: LogFormat, verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match format {
        LogFormat::Console => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
