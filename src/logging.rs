//! Tracing subscriber setup for the prrompt binary.

use std::env;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `prrompt=debug`.
pub const LOG_ENV_VAR: &str = "PRROMPT_LOG";

/// Filter directive to use: `PRROMPT_LOG` when set, otherwise `debug` for
/// verbose runs and `warn` for everything else.
pub fn filter_directive(verbose: bool) -> String {
    match env::var(LOG_ENV_VAR) {
        Ok(v) if !v.trim().is_empty() => v,
        _ if verbose => "debug".to_string(),
        _ => "warn".to_string(),
    }
}

/// Install a stderr `fmt` subscriber. Hooks share stdout with git, so all
/// diagnostics go to stderr.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_new(filter_directive(verbose))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
