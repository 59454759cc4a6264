//! PopupGallery observability
//!
//! Structured logging, crash reports and, in debug builds, a deadlock
//! watchdog for the host binary. Library crates only emit `tracing` events.

mod panic_hook;
mod logging;

pub use panic_hook::init_panic_hook;
pub use logging::{init_logging, cleanup_old_logs};

use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the log directory when set
pub const LOG_DIR_ENV: &str = "POPUP_GALLERY_LOG_DIR";

/// Directory holding `gallery.log*` files
pub fn log_dir() -> PathBuf {
    match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_log_dir(),
    }
}

fn default_log_dir() -> PathBuf {
    ProjectDirs::from("com", "PopupGallery", "PopupGallery")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Logging, panic hook and (debug builds) deadlock watchdog
pub fn init() -> anyhow::Result<()> {
    init_logging()?;
    init_panic_hook();

    #[cfg(debug_assertions)]
    spawn_deadlock_watchdog();

    Ok(())
}

/// Log every lock cycle parking_lot currently sees; returns the cycle count
pub fn report_deadlocks() -> usize {
    let cycles = parking_lot::deadlock::check_deadlock();
    if cycles.is_empty() {
        return 0;
    }

    tracing::error!(cycles = cycles.len(), "Deadlock detected");
    for (cycle, threads) in cycles.iter().enumerate() {
        for t in threads {
            tracing::error!(
                cycle,
                thread = ?t.thread_id(),
                "Deadlocked thread\n{:#?}",
                t.backtrace()
            );
        }
    }
    cycles.len()
}

#[cfg(debug_assertions)]
fn spawn_deadlock_watchdog() {
    use std::thread;
    use std::time::Duration;

    let spawned = thread::Builder::new()
        .name("deadlock-watchdog".into())
        .spawn(|| loop {
            thread::sleep(Duration::from_secs(10));
            report_deadlocks();
        });

    if let Err(e) = spawned {
        tracing::warn!("Deadlock watchdog not started: {}", e);
    }
}
