use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Target used for internal-consistency failures (stale declarations met mid-walk).
pub const CONSISTENCY_TARGET: &str = "hierscope::consistency";

/// Install the global tracing subscriber for a host process embedding the engine.
///
/// Logs go to stderr, and additionally to a daily-rolling file named after
/// `component` when `log_dir` is given. Returns the file writer guard, which
/// must be kept alive for buffered lines to be flushed. Installing twice is a
/// no-op for the second call.
pub fn init_logging(component: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_dir) = log_dir else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer())
            .try_init();
        return None;
    };

    let _ = std::fs::create_dir_all(log_dir);

    // Roll daily, with the component name as the prefix
    let file_appender = tracing_appender::rolling::daily(log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer: no ANSI colors, output to file
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let _ = registry.with(stderr_layer()).try_init();

    Some(guard)
}

fn stderr_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let guard = init_logging("hierscope-test", Some(&log_dir));
        assert!(guard.is_some());
        assert!(log_dir.is_dir());

        // A second install must not panic.
        let _ = init_logging("hierscope-test", None);
    }
}
