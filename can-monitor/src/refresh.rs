//! Fixed-interval refresh ticker for the presentation side
//!
//! The presentation loop runs on an explicit tick and can be stopped from
//! another thread through a channel, independently of the ingestion loop.

use crossbeam_channel::{select, tick, Receiver};
use std::ops::ControlFlow;
use std::time::Duration;

/// Default refresh interval in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 50;

/// Calls a closure once per tick until stopped
#[derive(Debug, Clone, Copy)]
pub struct RefreshLoop {
    interval: Duration,
}

impl RefreshLoop {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until `stop` receives a message or disconnects, or `on_tick` breaks
    ///
    /// Returns the number of ticks delivered to `on_tick`.
    pub fn run<F>(&self, stop: &Receiver<()>, mut on_tick: F) -> u64
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let ticker = tick(self.interval);
        let mut ticks = 0u64;

        loop {
            select! {
                recv(stop) -> _ => {
                    log::debug!("Refresh loop stopped after {} ticks", ticks);
                    return ticks;
                }
                recv(ticker) -> _ => {
                    ticks += 1;
                    if on_tick().is_break() {
                        log::debug!("Refresh loop finished after {} ticks", ticks);
                        return ticks;
                    }
                }
            }
        }
    }
}

impl Default for RefreshLoop {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REFRESH_MS))
    }
}
