//! Diagnostic logging hook.
//!
//! polycrypt emits `tracing` events but never installs a subscriber on its
//! own. Applications that already run a subscriber need nothing from here;
//! everyone else calls [`init`] once.
//!
//! Events never carry key bytes, plaintext, or nonces. Field names, record
//! indices, and lengths are logged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install a formatted subscriber filtered by `RUST_LOG`.
///
/// `default_level` applies when `RUST_LOG` is unset. Only the first call does
/// anything; later calls are no-ops. If some other global subscriber is
/// already installed the call quietly leaves it in place.
///
/// Returns whether this process has a polycrypt-installed subscriber.
pub fn init(default_level: Level) -> bool {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(default_level).into())
            .from_env_lossy();

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok();
        INSTALLED.store(installed, Ordering::Release);
    });
    is_installed()
}

/// [`init`] with `info` as the fallback level.
pub fn init_from_env() -> bool {
    init(Level::INFO)
}

pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let first = init(Level::WARN);
        let second = init(Level::TRACE);
        let third = init_from_env();
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(third, is_installed());
    }
}
