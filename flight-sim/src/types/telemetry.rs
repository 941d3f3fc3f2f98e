use chrono::Utc;
use operations::live_flights::{LiveFlight, PERCENT_MAX};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Produces the next telemetry reading of a flight.
///
/// Implementations only compute the advanced copy; writing it back is up to
/// the caller, through the live-flights store.
pub trait TelemetryStrategy: Send {
    fn advance(&mut self, flight: &LiveFlight) -> LiveFlight;
}

/// Bounds of the random walk, per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkLimits {
    /// Progress grows by up to this many percentage points.
    pub max_progress_step: f64,
    /// Latitude and longitude move by up to this many degrees either way.
    pub position_jitter: f64,
    /// Feet, either way.
    pub altitude_jitter: f64,
    /// Knots, either way.
    pub speed_jitter: f64,
    /// Fuel drops by up to this many percentage points.
    pub max_fuel_burn: f64,
    /// Fuel is never walked below this percentage.
    pub fuel_floor: f64,
}

impl Default for WalkLimits {
    fn default() -> Self {
        WalkLimits {
            max_progress_step: 2.0,
            position_jitter: 0.05,
            altitude_jitter: 500.0,
            speed_jitter: 10.0,
            max_fuel_burn: 0.5,
            fuel_floor: 10.0,
        }
    }
}

/// Random-walk telemetry with no physical model: progress creeps forward,
/// position, altitude and speed jitter, fuel burns down to a floor.
pub struct RandomWalk<R: Rng = StdRng> {
    rng: R,
    limits: WalkLimits,
}

impl RandomWalk<StdRng> {
    pub fn new(limits: WalkLimits) -> Self {
        Self::with_rng(StdRng::from_entropy(), limits)
    }

    /// A reproducible walk, for tests and replays.
    pub fn seeded(seed: u64, limits: WalkLimits) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), limits)
    }
}

impl<R: Rng> RandomWalk<R> {
    pub fn with_rng(rng: R, limits: WalkLimits) -> Self {
        RandomWalk { rng, limits }
    }

    pub fn limits(&self) -> &WalkLimits {
        &self.limits
    }

    /// Uniform in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * 2.0 * amplitude
    }
}

impl<R: Rng + Send> TelemetryStrategy for RandomWalk<R> {
    fn advance(&mut self, flight: &LiveFlight) -> LiveFlight {
        let mut next = flight.clone();

        let step = self.rng.gen::<f64>() * self.limits.max_progress_step;
        next.progress = (flight.progress + step).min(PERCENT_MAX).max(flight.progress);

        next.position.latitude += self.jitter(self.limits.position_jitter);
        next.position.longitude += self.jitter(self.limits.position_jitter);
        next.position.altitude = (next.position.altitude + self.jitter(self.limits.altitude_jitter)).max(0.0);
        next.position.speed = (next.position.speed + self.jitter(self.limits.speed_jitter)).max(0.0);

        let burn = self.rng.gen::<f64>() * self.limits.max_fuel_burn;
        next.fuel = (flight.fuel - burn).max(self.limits.fuel_floor);

        next.last_update = Utc::now();
        next
    }
}
