use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when neither `MIBSCOPE_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// `$HOME/.mibscope/logs`, or `./.mibscope/logs` without a home directory.
pub fn log_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mibscope")
        .join("logs")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("MIBSCOPE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber: a daily `component.<date>` file in
/// [`log_dir`], mirrored to stderr when `to_stderr` is set. A subscriber
/// that is already installed is left in place. Hold the guard until exit.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create log directory {}: {e}", dir.display());
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, component));

    let stderr = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(stderr)
        .try_init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_under_dot_mibscope() {
        let dir = log_dir();
        assert!(dir.ends_with(".mibscope/logs"));
    }
}
