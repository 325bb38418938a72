//! Diagnostic logging setup
//!
//! The engine emits `tracing` events (debug for I/O and structural clipping,
//! trace for view creation, warn for slow eigen convergence). Nothing is
//! printed unless a subscriber is installed; these helpers install a plain
//! stderr formatter.

use std::str::FromStr;
use tracing::Level;

/// Environment variable read by [`init_from_env`]
pub const LOG_ENV: &str = "MATRICA_LOG";

/// Install a stderr subscriber at `level`; errors if one is already set
pub fn try_init(level: Level) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init()
}

/// Install a stderr subscriber at `level`, ignoring an existing one
pub fn init(level: Level) {
    let _ = try_init(level);
}

/// Parse a level name such as "debug" or "WARN"
pub fn level_from_str(name: &str) -> Option<Level> {
    Level::from_str(name.trim()).ok()
}

/// Install a subscriber at the level named by `MATRICA_LOG`, or `WARN`
pub fn init_from_env() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| level_from_str(&v))
        .unwrap_or(Level::WARN);
    init(level);
}
