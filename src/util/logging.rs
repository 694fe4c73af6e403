use clap::ValueEnum;
use tracing_subscriber::{fmt, EnvFilter};

/// Shape of the diagnostic log lines on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// Logs always go to stderr; stdout carries only the smoke test report, so
/// the report can be piped or diffed without log noise.
pub fn init_tracing(format: LogFormat) {
    let subscriber = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Text => subscriber.with_thread_ids(false).init(),
        LogFormat::Json => subscriber.json().with_current_span(false).init(),
    }
}
