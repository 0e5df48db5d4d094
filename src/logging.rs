//! Tracing subscriber setup for the command line tool

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Environment variable overriding the log filter (e.g. `gem_version_check=trace`)
pub const LOG_ENV_VAR: &str = "GEM_VERSION_CHECK_LOG";

/// Map the number of `-v` flags to a default level
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// Logs always go to stderr so stdout carries only the report. With
/// `log_file` set they are also appended to that file; keep the returned
/// guard alive until exit so buffered lines are flushed.
pub fn init(verbose: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let level_filter = level_for_verbosity(verbose);
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let file_writer = log_file.and_then(|path| {
        let file_name = path.file_name()?;
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            return None;
        }
        Some(tracing_appender::non_blocking(
            tracing_appender::rolling::never(dir, file_name),
        ))
    });

    match file_writer {
        Some((writer, guard)) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr.and(writer))
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .without_time()
                .try_init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, LevelFilter::WARN)]
    #[case(1, LevelFilter::INFO)]
    #[case(2, LevelFilter::DEBUG)]
    #[case(3, LevelFilter::TRACE)]
    #[case(9, LevelFilter::TRACE)]
    fn level_for_verbosity_returns_expected(#[case] verbose: u8, #[case] expected: LevelFilter) {
        assert_eq!(level_for_verbosity(verbose), expected);
    }
}
