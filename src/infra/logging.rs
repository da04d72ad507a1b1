//! tracing-subscriber setup. Verbosity comes from `-v` only; the
//! environment is never consulted.

use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a level directive
pub fn level_for(verbosity: u8) -> &'static str
{
    match verbosity
    {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a compact stderr subscriber. Safe to call more than once.
pub fn init(verbosity: u8)
{
    let filter = EnvFilter::new(level_for(verbosity));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
