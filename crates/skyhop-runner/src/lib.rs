pub mod audio;
pub mod config;
pub mod error;
pub mod game_loop;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `SKYHOP_LOG_FORMAT=json` selects
/// JSON lines; anything else gets the human-readable formatter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SKYHOP_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
