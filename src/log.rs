//! Tagged, level-gated stderr logging.
//!
//! This runs as PID 1, often before a container has any logging
//! infrastructure at all, so it writes plain tagged lines to stderr the way
//! `guest-init` does rather than pulling in `tracing`. Exact phrasing is not
//! a compatibility surface; only the level gating and the presence of a
//! program-name tag are load-bearing.

use std::sync::atomic::{AtomicU8, Ordering};

/// Program tag prefixed to every log line.
pub const PROGRAM_NAME: &str = "container-init";

static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Set the process-wide verbosity level. Called once, before the event loop.
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

/// Error-level lines are always emitted; errors are the default, not an opt-in.
pub fn error_enabled() -> bool {
    true
}

pub fn info_enabled() -> bool {
    verbosity() >= 1
}

pub fn debug_enabled() -> bool {
    verbosity() >= 2
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        if $crate::log::error_enabled() {
            eprintln!("[ERROR][{}] {}", $crate::log::PROGRAM_NAME, format!($($arg)*));
        }
    };
}

macro_rules! log_info {
    ($($arg:tt)*) => {
        if $crate::log::info_enabled() {
            eprintln!("[INFO][{}] {}", $crate::log::PROGRAM_NAME, format!($($arg)*));
        }
    };
}

macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::log::debug_enabled() {
            eprintln!("[DEBUG][{}] {}", $crate::log::PROGRAM_NAME, format!($($arg)*));
        }
    };
}

pub(crate) use log_debug;
pub(crate) use log_error;
pub(crate) use log_info;
