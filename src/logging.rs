use tracing_subscriber::EnvFilter;

use crate::config::Mode;

/// Installs the global subscriber. `RUST_LOG` wins over the mode's default
/// filter. Release mode logs JSON lines.
pub fn init(mode: Mode) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(mode)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // try_init so a second call (tests, embedding) is harmless
    let _ = match mode {
        Mode::Debug => builder.compact().try_init(),
        Mode::Release => builder.json().with_ansi(false).try_init(),
    };
}

pub fn default_filter(mode: Mode) -> &'static str {
    match mode {
        Mode::Debug => "jwt_debugger=debug,tower_http=debug",
        Mode::Release => "info",
    }
}
