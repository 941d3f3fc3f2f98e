use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use super::sim_error::SimError;

/// Longest uninterrupted sleep of the ticker thread, so that `stop` takes
/// effect promptly even with long intervals.
const POLL_SLICE_MILLIS: u64 = 25;

/// A periodic task runner with support for stopping, pausing, and resuming.
///
/// The `Ticker` invokes a callback on a dedicated thread every `interval`.
/// Ticks skipped while paused are not replayed.
pub struct Ticker {
    name: String,
    interval_millis: AtomicU64,
    running: AtomicBool, // Flag to indicate if the ticker is running
    paused: AtomicBool,  // Flag to indicate if the ticker is paused
}

impl Ticker {
    /// Creates a new ticker.
    ///
    /// # Parameters
    /// - `name`: name of the spawned thread.
    /// - `interval_millis`: time between two ticks, must be positive.
    pub fn new(name: &str, interval_millis: u64) -> Result<Arc<Self>, SimError> {
        if interval_millis == 0 {
            return Err(SimError::InvalidInterval(interval_millis));
        }
        Ok(Arc::new(Self {
            name: name.to_string(),
            interval_millis: AtomicU64::new(interval_millis),
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        }))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_millis.load(Ordering::SeqCst))
    }

    /// Changes the time between ticks, effective from the next tick.
    pub fn set_interval(&self, interval_millis: u64) -> Result<(), SimError> {
        if interval_millis == 0 {
            return Err(SimError::InvalidInterval(interval_millis));
        }
        self.interval_millis.store(interval_millis, Ordering::SeqCst);
        Ok(())
    }

    /// Stops the ticker
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Pauses the ticker indefinitely
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resumes the ticker
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Starts the ticker thread. The first tick fires one interval after the
    /// start; `tick_callback` receives the 1-based tick count.
    ///
    /// # Returns
    /// The handle of the spawned thread, which finishes once `stop` is called.
    pub fn start(
        self: Arc<Self>,
        mut tick_callback: impl FnMut(usize) + Send + 'static,
    ) -> Result<JoinHandle<()>, SimError> {
        thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                let mut tick_count = 0;
                let mut next_tick = Instant::now() + self.interval();

                while self.is_running() {
                    let now = Instant::now();
                    if now < next_tick {
                        let remaining = next_tick - now;
                        thread::sleep(remaining.min(Duration::from_millis(POLL_SLICE_MILLIS)));
                        continue;
                    }
                    next_tick = now + self.interval();

                    if self.is_paused() {
                        continue;
                    }

                    tick_count += 1;
                    tick_callback(tick_count);
                }
            })
            .map_err(|e| SimError::TickerStartError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(matches!(
            Ticker::new("zero", 0),
            Err(SimError::InvalidInterval(0))
        ));
        let ticker = Ticker::new("ok", 10).expect("ticker");
        assert_eq!(ticker.set_interval(0), Err(SimError::InvalidInterval(0)));
        assert_eq!(ticker.interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_ticks_until_stopped() {
        let ticker = Ticker::new("test-ticker", 5).expect("ticker");
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let handle = Arc::clone(&ticker)
            .start(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .expect("start");

        thread::sleep(Duration::from_millis(100));
        ticker.stop();
        handle.join().expect("ticker thread");

        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen > 0);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn test_paused_ticker_does_not_tick() {
        let ticker = Ticker::new("paused-ticker", 5).expect("ticker");
        ticker.pause();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let handle = Arc::clone(&ticker)
            .start(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .expect("start");

        thread::sleep(Duration::from_millis(60));
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        ticker.resume();
        thread::sleep(Duration::from_millis(60));
        ticker.stop();
        handle.join().expect("ticker thread");
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }
}
