use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use logger::{Color, Logger};
use operations::airports::Airports;
use operations::atc::AirTrafficControl;
use operations::errors::SessionError;
use operations::fleet::Fleet;
use operations::live_flights::LiveFlights;
use operations::notifications::NotificationChannel;
use operations::personnel::Personnel;
use operations::profile::Profile;
use operations::schedule::Schedule;
use operations::session::{FileSlot, Session, SessionSlot, User};
use operations::settings::Settings;
use simulator::{AlertGenerator, LiveUpdater, RandomWalk, TelemetryStrategy, UpdaterHandle};

use crate::config::DashboardConfig;
use crate::errors::DashboardError;

const LOG_NAME: &str = "flight-control";
const CONSOLE_LOCATION: &str = "Local console";
const CONSOLE_DEVICE: &str = "flight-control CLI";

/// State of the simulated live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdaterState {
    Stopped,
    Running,
    Paused,
}

/// Composition root of the dashboard.
///
/// Owns one instance of every domain store and hands them to the front-end.
/// Live flights and notifications are shared with the live updater threads,
/// so they live behind `Arc<RwLock<_>>`; a poisoned lock is reported as
/// [`DashboardError::LockError`].
pub struct Dashboard {
    config: DashboardConfig,
    logger: Arc<Logger>,
    live_flights: Arc<RwLock<LiveFlights>>,
    notifications: Arc<RwLock<NotificationChannel>>,
    pub schedule: Schedule,
    pub fleet: Fleet,
    pub airports: Airports,
    pub personnel: Personnel,
    pub atc: AirTrafficControl,
    pub settings: Settings,
    pub profile: Profile,
    pub session: Session,
    updater: Option<UpdaterHandle>,
}

impl Dashboard {
    /// Creates a dashboard seeded with the sample records, keeping the
    /// session token in the configured session file.
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let slot = FileSlot::new(&config.session_file);
        Self::with_session_slot(config, Box::new(slot))
    }

    /// Creates a dashboard keeping the session token in `slot`.
    ///
    /// # Parameters
    /// - `config`: validated before anything is created.
    /// - `slot`: persistence of the signed-in user.
    pub fn with_session_slot(
        config: DashboardConfig,
        slot: Box<dyn SessionSlot>,
    ) -> Result<Self, DashboardError> {
        config.validate()?;

        let logger = Logger::new(&config.log_dir, LOG_NAME)?
            .with_level(config.level()?)
            .with_console(config.log_to_console);
        let delay = config.simulated_delay();

        let dashboard = Dashboard {
            logger: Arc::new(logger),
            live_flights: Arc::new(RwLock::new(LiveFlights::new())),
            notifications: Arc::new(RwLock::new(NotificationChannel::new())),
            schedule: Schedule::new(),
            fleet: Fleet::new(),
            airports: Airports::new(),
            personnel: Personnel::new(),
            atc: AirTrafficControl::new(),
            settings: Settings::new(),
            profile: Profile::new(delay),
            session: Session::new(slot, delay),
            updater: None,
            config,
        };
        dashboard.log_info("Dashboard state seeded");
        Ok(dashboard)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn live_flights(&self) -> Result<RwLockReadGuard<'_, LiveFlights>, DashboardError> {
        self.live_flights
            .read()
            .map_err(|_| DashboardError::LockError("live flights".to_string()))
    }

    pub fn live_flights_mut(&self) -> Result<RwLockWriteGuard<'_, LiveFlights>, DashboardError> {
        self.live_flights
            .write()
            .map_err(|_| DashboardError::LockError("live flights".to_string()))
    }

    pub fn notifications(&self) -> Result<RwLockReadGuard<'_, NotificationChannel>, DashboardError> {
        self.notifications
            .read()
            .map_err(|_| DashboardError::LockError("notifications".to_string()))
    }

    pub fn notifications_mut(
        &self,
    ) -> Result<RwLockWriteGuard<'_, NotificationChannel>, DashboardError> {
        self.notifications
            .write()
            .map_err(|_| DashboardError::LockError("notifications".to_string()))
    }

    /// Starts the simulated live feed with the configured walk limits,
    /// alert probability and intervals. Does nothing when already running.
    pub fn start_updater(&mut self) -> Result<(), DashboardError> {
        let strategy = RandomWalk::new(self.config.walk_limits());
        let alerts = AlertGenerator::new(self.config.alert_probability)?;
        self.start_updater_with(Box::new(strategy), alerts)
    }

    /// Starts the live feed with the given strategy and alert generator, for
    /// reproducible runs.
    pub fn start_updater_with(
        &mut self,
        strategy: Box<dyn TelemetryStrategy>,
        alerts: AlertGenerator,
    ) -> Result<(), DashboardError> {
        if self.updater.is_some() {
            return Ok(());
        }

        let handle = LiveUpdater::new(
            Arc::clone(&self.live_flights),
            Arc::clone(&self.notifications),
            strategy,
            alerts,
        )
        .with_logger(Arc::clone(&self.logger))
        .start(self.config.intervals())?;

        self.updater = Some(handle);
        Ok(())
    }

    /// Stops the live feed and waits for its threads.
    pub fn stop_updater(&mut self) {
        if let Some(mut handle) = self.updater.take() {
            handle.stop();
            self.log_info("Live updater stopped");
        }
    }

    /// # Returns
    /// `false` when the live feed is not running.
    pub fn pause_updater(&self) -> bool {
        match &self.updater {
            Some(handle) => {
                handle.pause();
                self.log_info("Live updater paused");
                true
            }
            None => false,
        }
    }

    /// # Returns
    /// `false` when the live feed is not running.
    pub fn resume_updater(&self) -> bool {
        match &self.updater {
            Some(handle) => {
                handle.resume();
                self.log_info("Live updater resumed");
                true
            }
            None => false,
        }
    }

    pub fn updater_state(&self) -> UpdaterState {
        match &self.updater {
            Some(handle) if handle.is_paused() => UpdaterState::Paused,
            Some(handle) if handle.is_running() => UpdaterState::Running,
            _ => UpdaterState::Stopped,
        }
    }

    /// Restores the user signed in during a previous run, if any. A corrupt
    /// token is logged, dropped from the slot and returned as the error.
    pub fn restore_session(&mut self) -> Result<Option<User>, DashboardError> {
        let restored = self.session.restore().map(|user| user.cloned());
        match restored {
            Ok(user) => {
                if let Some(user) = &user {
                    self.log_info(&format!("Restored session of {}", user.email));
                }
                Ok(user)
            }
            Err(e) => {
                self.log_warn(&format!("Discarding stored session: {}", e));
                Err(e.into())
            }
        }
    }

    /// Signs a user in and records the attempt in the profile's login
    /// history, whether it succeeded or not.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, DashboardError> {
        let result = self.session.login(email, password).cloned();
        self.profile
            .record_login(CONSOLE_LOCATION, CONSOLE_DEVICE, result.is_ok());

        match result {
            Ok(user) => {
                self.log_colored(&format!("{} signed in as {}", user.email, user.role), Color::Green);
                Ok(user)
            }
            Err(e) => {
                self.log_warn(&format!("Failed sign-in for {}: {}", email, e));
                Err(e.into())
            }
        }
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<User, DashboardError> {
        let user = self.session.register(email, password, name)?.clone();
        self.log_info(&format!("Registered operator account {}", user.email));
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), DashboardError> {
        let email = self.session.current_user().map(|user| user.email.clone());
        self.session.logout()?;
        if let Some(email) = email {
            self.log_info(&format!("{} signed out", email));
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// Fails with [`SessionError::InvalidCredentials`] when nobody is signed in.
    pub fn require_user(&self) -> Result<&User, DashboardError> {
        self.session
            .current_user()
            .ok_or(DashboardError::SessionError(SessionError::InvalidCredentials))
    }

    pub fn log_info(&self, message: &str) {
        let _ = self.logger.info(message);
    }

    pub fn log_warn(&self, message: &str) {
        let _ = self.logger.warn(message);
    }

    fn log_colored(&self, message: &str, color: Color) {
        let _ = self.logger.info_colored(message, color);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop_updater();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use operations::session::MemorySlot;
    use std::env;
    use std::thread;
    use std::time::Duration;

    fn config(name: &str) -> DashboardConfig {
        DashboardConfig {
            log_dir: env::temp_dir().join(format!("flight-control-{}-{}", name, std::process::id())),
            simulated_delay_ms: 0,
            telemetry_interval_ms: 5,
            alert_interval_ms: 5,
            ..DashboardConfig::default()
        }
    }

    fn dashboard(name: &str) -> Dashboard {
        Dashboard::with_session_slot(config(name), Box::new(MemorySlot::new())).expect("dashboard")
    }

    #[test]
    fn test_seeded_on_creation() {
        let dashboard = dashboard("seeded");
        assert_eq!(dashboard.live_flights().expect("flights").flights().len(), 4);
        assert!(!dashboard.notifications().expect("notifications").is_empty());
        assert_eq!(dashboard.fleet.aircraft().len(), 5);
        assert_eq!(dashboard.airports.airports().len(), 3);
        assert_eq!(dashboard.updater_state(), UpdaterState::Stopped);
        assert!(dashboard.logger().path().exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DashboardConfig {
            alert_probability: 2.0,
            ..config("invalid")
        };
        assert!(matches!(
            Dashboard::with_session_slot(config, Box::new(MemorySlot::new())),
            Err(DashboardError::ConfigError(_))
        ));
    }

    #[test]
    fn test_updater_lifecycle() {
        let mut dashboard = dashboard("updater");
        assert!(!dashboard.pause_updater());

        dashboard
            .start_updater_with(
                Box::new(RandomWalk::seeded(3, dashboard.config().walk_limits())),
                AlertGenerator::seeded(3, 1.0).expect("generator"),
            )
            .expect("start");
        assert_eq!(dashboard.updater_state(), UpdaterState::Running);

        thread::sleep(Duration::from_millis(80));
        assert!(dashboard.pause_updater());
        assert_eq!(dashboard.updater_state(), UpdaterState::Paused);
        assert!(dashboard.resume_updater());

        dashboard.stop_updater();
        assert_eq!(dashboard.updater_state(), UpdaterState::Stopped);

        let progress = dashboard
            .live_flights()
            .expect("flights")
            .get("1")
            .map(|flight| flight.progress)
            .expect("AA1234");
        assert!((65.0..=100.0).contains(&progress));
    }

    #[test]
    fn test_login_is_recorded_in_profile_history() {
        let mut dashboard = dashboard("login");
        let before = dashboard.profile.profile().security.login_history.len();

        assert!(dashboard.login("admin@flightcontrol.com", "wrong").is_err());
        let user = dashboard
            .login("admin@flightcontrol.com", "admin123")
            .expect("login");
        assert_eq!(dashboard.require_user().expect("user").id, user.id);

        let history = &dashboard.profile.profile().security.login_history;
        assert_eq!(history.len(), before + 2);
        assert!(history[0].success);
        assert!(!history[1].success);

        dashboard.logout().expect("logout");
        assert!(dashboard.require_user().is_err());
    }

    #[test]
    fn test_corrupt_session_is_reported() {
        let mut dashboard = Dashboard::with_session_slot(
            config("corrupt"),
            Box::new(MemorySlot::with_token("not a user")),
        )
        .expect("dashboard");
        assert!(matches!(
            dashboard.restore_session(),
            Err(DashboardError::SessionError(SessionError::Corrupt(_)))
        ));
        assert!(dashboard.restore_session().expect("empty slot").is_none());
    }
}
