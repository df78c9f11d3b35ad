//! Opt-in timing of conversions.
//!
//! Scopes are free when timing is off. When on, each scope reports its
//! elapsed time through `tracing` as it drops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Option<Instant>,
}

impl Scope {
    /// Time since the scope opened, `None` when timing is off.
    pub fn elapsed(&self) -> Option<Duration> {
        self.start.map(|start| start.elapsed())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if let Some(elapsed) = self.elapsed() {
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            tracing::info!(target: "adfless::perf", scope = self.name, elapsed_ms, "timing");
        }
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Open a timing scope that reports when dropped.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: is_enabled().then(Instant::now),
    }
}
