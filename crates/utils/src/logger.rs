use serde::Deserialize;
use tracing_subscriber::{
    fmt::{self},
    prelude::*,
    EnvFilter,
};

/// Format for log output.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable pretty-printed format.
    Pretty,
    /// JSON format for structured logging.
    Json,
    /// Minimal format with only essential information.
    #[default]
    Minimal,
}

/// Crates capped at `warn`: the wallet bridge and RPC transport (`reqwest` over `hyper`, `h2`
/// and `rustls`) log every request, and `config` logs each source it reads at startup.
pub const QUIET_DEPENDENCIES: [&str; 6] =
    ["hyper", "hyper_util", "reqwest", "h2", "rustls", "config"];

/// Initializes the logging system.
///
/// Caps [`QUIET_DEPENDENCIES`] at `warn` so the client's own events stand out.
///
/// # Panics
///
/// Panics if any of the log filter directives fail to parse.
pub fn init_logger(log_format: LogFormat) {
    // Set default log level to info if RUST_LOG is not set.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    let filter = QUIET_DEPENDENCIES.iter().fold(EnvFilter::from_default_env(), |filter, krate| {
        filter.add_directive(format!("{krate}=warn").parse().unwrap())
    });
    let base = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Pretty => base
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(false)
                    .with_target(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init(),
        LogFormat::Json => base.with(fmt::layer().json()).init(),
        LogFormat::Minimal => base
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::Directive;

    use super::*;

    #[test]
    fn test_quiet_dependencies_form_valid_directives() {
        for krate in QUIET_DEPENDENCIES {
            let directive: Directive = format!("{krate}=warn").parse().unwrap();
            assert_eq!(directive.to_string(), format!("{krate}=warn"));
        }
    }
}
