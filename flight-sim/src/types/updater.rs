use std::sync::{Arc, Mutex, RwLock};
use std::thread::JoinHandle;

use logger::Logger;
use operations::live_flights::LiveFlights;
use operations::notifications::NotificationChannel;

use super::alerts::AlertGenerator;
use super::sim_error::SimError;
use super::telemetry::TelemetryStrategy;
use super::ticker::Ticker;

/// Default time between two telemetry ticks.
pub const TELEMETRY_INTERVAL_MILLIS: u64 = 5_000;
/// Default time between two alert draws.
pub const ALERT_INTERVAL_MILLIS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdaterIntervals {
    pub telemetry_millis: u64,
    pub alert_millis: u64,
}

impl Default for UpdaterIntervals {
    fn default() -> Self {
        UpdaterIntervals {
            telemetry_millis: TELEMETRY_INTERVAL_MILLIS,
            alert_millis: ALERT_INTERVAL_MILLIS,
        }
    }
}

/// The simulated live feed.
///
/// Each telemetry tick advances every `En Route` flight through the
/// telemetry strategy and writes the result back with the store's own
/// `update`. Each alert tick may add one synthesized alert to the
/// notification channel. Stores are locked for one whole pass, so a tick is
/// never observed half applied.
pub struct LiveUpdater {
    flights: Arc<RwLock<LiveFlights>>,
    notifications: Arc<RwLock<NotificationChannel>>,
    strategy: Mutex<Box<dyn TelemetryStrategy>>,
    alerts: Mutex<AlertGenerator>,
    logger: Option<Arc<Logger>>,
}

impl LiveUpdater {
    pub fn new(
        flights: Arc<RwLock<LiveFlights>>,
        notifications: Arc<RwLock<NotificationChannel>>,
        strategy: Box<dyn TelemetryStrategy>,
        alerts: AlertGenerator,
    ) -> Self {
        LiveUpdater {
            flights,
            notifications,
            strategy: Mutex::new(strategy),
            alerts: Mutex::new(alerts),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Advances every in-progress flight once.
    ///
    /// # Returns
    /// The number of flights advanced.
    pub fn telemetry_tick(&self) -> Result<usize, SimError> {
        let mut strategy = self
            .strategy
            .lock()
            .map_err(|_| SimError::LockError("telemetry strategy".to_string()))?;
        let mut flights = self
            .flights
            .write()
            .map_err(|_| SimError::LockError("live flights".to_string()))?;

        let mut advanced = 0;
        for id in flights.in_progress_ids() {
            let next = match flights.get(&id) {
                Some(flight) => strategy.advance(flight),
                None => continue,
            };
            if flights.update(&id, next.telemetry_patch()) {
                advanced += 1;
            }
        }

        self.debug(&format!("Telemetry tick advanced {} flight(s)", advanced));
        Ok(advanced)
    }

    /// Draws once from the alert generator.
    ///
    /// # Returns
    /// The id of the added notification, if an alert fired.
    pub fn alert_tick(&self) -> Result<Option<String>, SimError> {
        let draft = self
            .alerts
            .lock()
            .map_err(|_| SimError::LockError("alert generator".to_string()))?
            .draw();
        let draft = match draft {
            Some(draft) => draft,
            None => return Ok(None),
        };

        let mut channel = self
            .notifications
            .write()
            .map_err(|_| SimError::LockError("notifications".to_string()))?;
        let notification = channel.add(draft);

        self.info(&format!(
            "Synthesized {} alert: {}",
            notification.priority, notification.title
        ));
        Ok(Some(notification.id.clone()))
    }

    /// Starts both tickers.
    ///
    /// # Returns
    /// A handle that stops the updater when dropped.
    pub fn start(self, intervals: UpdaterIntervals) -> Result<UpdaterHandle, SimError> {
        let telemetry = Ticker::new("telemetry-ticker", intervals.telemetry_millis)?;
        let alerts = Ticker::new("alert-ticker", intervals.alert_millis)?;
        let updater = Arc::new(self);

        let mut handle = UpdaterHandle {
            telemetry: Arc::clone(&telemetry),
            alerts: Arc::clone(&alerts),
            threads: Vec::new(),
        };

        let telemetry_updater = Arc::clone(&updater);
        handle.threads.push(telemetry.start(move |_| {
            if let Err(e) = telemetry_updater.telemetry_tick() {
                telemetry_updater.warn(&format!("Skipping telemetry tick: {}", e));
            }
        })?);

        let alert_updater = Arc::clone(&updater);
        handle.threads.push(alerts.start(move |_| {
            if let Err(e) = alert_updater.alert_tick() {
                alert_updater.warn(&format!("Skipping alert tick: {}", e));
            }
        })?);

        updater.info(&format!(
            "Live updater started (telemetry every {} ms, alerts every {} ms)",
            intervals.telemetry_millis, intervals.alert_millis
        ));
        Ok(handle)
    }

    fn debug(&self, message: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.debug(message);
        }
    }

    fn info(&self, message: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.info(message);
        }
    }

    fn warn(&self, message: &str) {
        match &self.logger {
            Some(logger) => {
                let _ = logger.warn(message);
            }
            None => eprintln!("{}", message),
        }
    }
}

/// Owns the running tickers of a started [`LiveUpdater`].
///
/// Dropping the handle stops the updater and waits for its threads.
pub struct UpdaterHandle {
    telemetry: Arc<Ticker>,
    alerts: Arc<Ticker>,
    threads: Vec<JoinHandle<()>>,
}

impl UpdaterHandle {
    pub fn pause(&self) {
        self.telemetry.pause();
        self.alerts.pause();
    }

    pub fn resume(&self) {
        self.telemetry.resume();
        self.alerts.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.telemetry.is_paused()
    }

    pub fn is_running(&self) -> bool {
        self.telemetry.is_running()
    }

    /// Stops both tickers and waits for their threads to finish.
    pub fn stop(&mut self) {
        self.telemetry.stop();
        self.alerts.stop();
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
    }
}

impl Drop for UpdaterHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::telemetry::{RandomWalk, WalkLimits};
    use operations::live_flights::{sample_flights, FlightStatus};
    use std::thread;
    use std::time::Duration;

    fn stores() -> (Arc<RwLock<LiveFlights>>, Arc<RwLock<NotificationChannel>>) {
        (
            Arc::new(RwLock::new(LiveFlights::new())),
            Arc::new(RwLock::new(NotificationChannel::empty())),
        )
    }

    fn updater(
        flights: &Arc<RwLock<LiveFlights>>,
        notifications: &Arc<RwLock<NotificationChannel>>,
        alert_probability: f64,
    ) -> LiveUpdater {
        LiveUpdater::new(
            Arc::clone(flights),
            Arc::clone(notifications),
            Box::new(RandomWalk::seeded(17, WalkLimits::default())),
            AlertGenerator::seeded(17, alert_probability).expect("generator"),
        )
    }

    #[test]
    fn test_telemetry_tick_only_touches_en_route_flights() {
        let (flights, notifications) = stores();
        let before = flights.read().expect("read").flights().to_vec();

        let advanced = updater(&flights, &notifications, 0.0)
            .telemetry_tick()
            .expect("tick");

        assert_eq!(advanced, 1);
        let after = flights.read().expect("read").flights().to_vec();
        for (old, new) in before.iter().zip(after.iter()) {
            if old.status == FlightStatus::EnRoute {
                assert!(new.progress >= old.progress);
                assert!(new.last_update >= old.last_update);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_repeated_ticks_keep_bounds() {
        let (flights, notifications) = stores();
        let updater = updater(&flights, &notifications, 0.0);

        let mut last_progress = 65.0;
        for _ in 0..200 {
            updater.telemetry_tick().expect("tick");
            let guard = flights.read().expect("read");
            let flight = guard.get("1").expect("AA1234");
            assert!(flight.progress >= last_progress);
            assert!(flight.progress <= 100.0);
            assert!(flight.fuel >= 10.0);
            last_progress = flight.progress;
        }
    }

    #[test]
    fn test_alert_tick_prepends_to_channel() {
        let (flights, notifications) = stores();
        let updater = updater(&flights, &notifications, 1.0);

        let first = updater.alert_tick().expect("tick").expect("alert");
        let second = updater.alert_tick().expect("tick").expect("alert");

        let channel = notifications.read().expect("read");
        assert_eq!(channel.len(), 2);
        assert_eq!(channel.unread_count(), 2);
        assert_eq!(channel.notifications()[0].id, second);
        assert_eq!(channel.notifications()[1].id, first);
    }

    #[test]
    fn test_alert_tick_without_alert_leaves_channel_alone() {
        let (flights, notifications) = stores();
        let updater = updater(&flights, &notifications, 0.0);
        assert_eq!(updater.alert_tick(), Ok(None));
        assert!(notifications.read().expect("read").is_empty());
    }

    #[test]
    fn test_started_updater_stops_on_drop() {
        let flights = Arc::new(RwLock::new(LiveFlights::with_flights(sample_flights())));
        let notifications = Arc::new(RwLock::new(NotificationChannel::empty()));

        let handle = updater(&flights, &notifications, 1.0)
            .start(UpdaterIntervals {
                telemetry_millis: 5,
                alert_millis: 5,
            })
            .expect("start");
        thread::sleep(Duration::from_millis(100));
        drop(handle);

        let alerts = notifications.read().expect("read").len();
        assert!(alerts > 0);
        let progress = flights.read().expect("read").get("1").map(|f| f.progress);

        thread::sleep(Duration::from_millis(50));
        assert_eq!(notifications.read().expect("read").len(), alerts);
        assert_eq!(flights.read().expect("read").get("1").map(|f| f.progress), progress);
    }

    #[test]
    fn test_invalid_interval_does_not_start() {
        let (flights, notifications) = stores();
        let result = updater(&flights, &notifications, 0.0).start(UpdaterIntervals {
            telemetry_millis: 0,
            alert_millis: 10,
        });
        assert!(matches!(result, Err(SimError::InvalidInterval(0))));
    }
}
