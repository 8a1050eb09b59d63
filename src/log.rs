/// Diagnostic logging for daylog
/// Events go to stderr so they never mix with command output on stdout.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Overrides the log filter (e.g. `DAYLOG_LOG=daylog=trace`)
pub const LOG_ENV: &str = "DAYLOG_LOG";

/// Default filter directive for the given verbosity
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Build the filter, preferring `DAYLOG_LOG` when it is set and valid
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
