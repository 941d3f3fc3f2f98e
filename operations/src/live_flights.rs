use chrono::{DateTime, NaiveTime, Utc};
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable};

labelled_enum! {
    /// Represents the various statuses a tracked flight can have.
    pub enum FlightStatus ("flight status") {
        Scheduled => "Scheduled",
        Boarding => "Boarding",
        Departed => "Departed",
        EnRoute => "En Route",
        Approaching => "Approaching",
        Landed => "Landed",
        Delayed => "Delayed",
        Cancelled => "Cancelled",
    }
}

impl Default for FlightStatus {
    fn default() -> Self {
        FlightStatus::Scheduled
    }
}

impl FlightStatus {
    /// The only status the live updater advances on its own.
    pub fn is_in_progress(&self) -> bool {
        *self == FlightStatus::EnRoute
    }

    pub fn is_airborne(&self) -> bool {
        matches!(
            self,
            FlightStatus::Departed | FlightStatus::EnRoute | FlightStatus::Approaching
        )
    }
}

pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;
/// Fuel percentage under which a flight is reported as low on fuel.
pub const LOW_FUEL_THRESHOLD: f64 = 25.0;

/// Clamps progress and fuel readings to `[0, 100]`.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// One end of a flight: where and when it departs or arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    pub airport: String,
    pub code: String,
    pub time: NaiveTime,
    pub gate: Option<String>,
    pub terminal: Option<String>,
}

impl Endpoint {
    pub fn new(airport: &str, code: &str, hour: u32, minute: u32) -> Self {
        Endpoint {
            airport: airport.to_string(),
            code: code.to_string(),
            time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
            gate: None,
            terminal: None,
        }
    }

    pub fn at_gate(mut self, gate: &str, terminal: &str) -> Self {
        self.gate = Some(gate.to_string());
        self.terminal = Some(terminal.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Feet.
    pub altitude: f64,
    /// Knots.
    pub speed: f64,
    /// Degrees.
    pub heading: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnRouteWeather {
    pub conditions: String,
    pub temperature: i32,
    pub wind_speed: u32,
    pub visibility: u32,
}

/// A flight tracked in real time.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFlight {
    pub id: String,
    pub flight_number: String,
    pub airline: String,
    pub aircraft: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub status: FlightStatus,
    pub position: Position,
    /// Percentage of the route completed, within `[0, 100]`.
    pub progress: f64,
    pub estimated_arrival: NaiveTime,
    /// Minutes.
    pub delay: u32,
    pub passengers: u32,
    pub crew: u32,
    /// Percentage of fuel left, within `[0, 100]`.
    pub fuel: f64,
    pub weather: EnRouteWeather,
    pub last_update: DateTime<Utc>,
}

/// A live flight before it has an identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFlightDraft {
    pub flight_number: String,
    pub airline: String,
    pub aircraft: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub status: FlightStatus,
    pub position: Position,
    pub progress: f64,
    pub estimated_arrival: NaiveTime,
    pub delay: u32,
    pub passengers: u32,
    pub crew: u32,
    pub fuel: f64,
    pub weather: EnRouteWeather,
}

/// Fields that may change on a live flight. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFlightPatch {
    pub status: Option<FlightStatus>,
    pub departure_gate: Option<String>,
    pub arrival_gate: Option<String>,
    pub position: Option<Position>,
    pub progress: Option<f64>,
    pub fuel: Option<f64>,
    pub estimated_arrival: Option<NaiveTime>,
    pub delay: Option<u32>,
    pub weather: Option<EnRouteWeather>,
    /// Defaults to the time the patch is applied.
    pub last_update: Option<DateTime<Utc>>,
}

impl LiveFlightPatch {
    pub fn status(status: FlightStatus) -> Self {
        LiveFlightPatch {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl LiveFlight {
    /// The telemetry fields of this record as a patch, used to write an
    /// advanced copy back through the store.
    pub fn telemetry_patch(&self) -> LiveFlightPatch {
        LiveFlightPatch {
            position: Some(self.position),
            progress: Some(self.progress),
            fuel: Some(self.fuel),
            last_update: Some(self.last_update),
            ..Default::default()
        }
    }

    pub fn is_low_on_fuel(&self) -> bool {
        self.fuel < LOW_FUEL_THRESHOLD
    }
}

impl Entity for LiveFlight {
    type Draft = LiveFlightDraft;
    type Patch = LiveFlightPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: LiveFlightDraft) -> Self {
        LiveFlight {
            id,
            flight_number: draft.flight_number,
            airline: draft.airline,
            aircraft: draft.aircraft,
            departure: draft.departure,
            arrival: draft.arrival,
            status: draft.status,
            position: draft.position,
            progress: clamp_percent(draft.progress),
            estimated_arrival: draft.estimated_arrival,
            delay: draft.delay,
            passengers: draft.passengers,
            crew: draft.crew,
            fuel: clamp_percent(draft.fuel),
            weather: draft.weather,
            last_update: Utc::now(),
        }
    }

    fn apply(&mut self, patch: LiveFlightPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(gate) = patch.departure_gate {
            self.departure.gate = Some(gate);
        }
        if let Some(gate) = patch.arrival_gate {
            self.arrival.gate = Some(gate);
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(progress) = patch.progress {
            self.progress = clamp_percent(progress);
        }
        if let Some(fuel) = patch.fuel {
            self.fuel = clamp_percent(fuel);
        }
        if let Some(eta) = patch.estimated_arrival {
            self.estimated_arrival = eta;
        }
        if let Some(delay) = patch.delay {
            self.delay = delay;
        }
        if let Some(weather) = patch.weather {
            self.weather = weather;
        }
        self.last_update = patch.last_update.unwrap_or_else(Utc::now);
    }
}

impl Searchable for LiveFlight {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.flight_number.as_str(),
            self.airline.as_str(),
            self.departure.code.as_str(),
            self.arrival.code.as_str(),
        ]
    }
}

/// Search term plus status filter of the live-flights view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFlightQuery {
    pub search: String,
    pub status: Filter<FlightStatus>,
}

impl LiveFlightQuery {
    pub fn search(term: &str) -> Self {
        LiveFlightQuery {
            search: term.to_string(),
            status: Filter::All,
        }
    }

    pub fn with_status(mut self, status: Filter<FlightStatus>) -> Self {
        self.status = status;
        self
    }
}

impl Criteria<LiveFlight> for LiveFlightQuery {
    fn matches(&self, flight: &LiveFlight) -> bool {
        flight.matches_term(&self.search) && self.status.accepts(&flight.status)
    }
}

/// Counters shown on the live-flights summary cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFlightStats {
    pub total: usize,
    pub airborne: usize,
    pub delayed: usize,
    pub low_fuel: usize,
    pub passengers: u32,
    /// Mean progress of airborne flights, 0 when none are airborne.
    pub average_progress: f64,
}

/// Live-flight domain: the tracked flights and the one under inspection.
///
/// Live flights are never deleted; they only change status.
#[derive(Debug, Clone)]
pub struct LiveFlights {
    store: EntityStore<LiveFlight>,
}

impl Default for LiveFlights {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveFlights {
    /// Creates the domain seeded with the sample flights.
    pub fn new() -> Self {
        Self::with_flights(sample_flights())
    }

    pub fn with_flights(flights: Vec<LiveFlight>) -> Self {
        LiveFlights {
            store: EntityStore::seeded(flights, InsertOrder::Append),
        }
    }

    pub fn flights(&self) -> &[LiveFlight] {
        self.store.records()
    }

    pub fn get(&self, id: &str) -> Option<&LiveFlight> {
        self.store.get(id)
    }

    pub fn find_by_number(&self, flight_number: &str) -> Option<&LiveFlight> {
        self.store
            .iter()
            .find(|flight| flight.flight_number.eq_ignore_ascii_case(flight_number))
    }

    pub fn add(&mut self, draft: LiveFlightDraft) -> &LiveFlight {
        self.store.add(draft)
    }

    pub fn update(&mut self, id: &str, patch: LiveFlightPatch) -> bool {
        self.store.update(id, patch)
    }

    pub fn update_status(&mut self, id: &str, status: FlightStatus) -> bool {
        self.store.update(id, LiveFlightPatch::status(status))
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    pub fn selected(&self) -> Option<&LiveFlight> {
        self.store.selected()
    }

    pub fn filtered(&self, query: &LiveFlightQuery) -> Vec<&LiveFlight> {
        self.store.project(query)
    }

    /// Ids of the flights the live updater should advance.
    pub fn in_progress_ids(&self) -> Vec<String> {
        self.store
            .iter()
            .filter(|flight| flight.status.is_in_progress())
            .map(|flight| flight.id.clone())
            .collect()
    }

    pub fn stats(&self) -> LiveFlightStats {
        let airborne: Vec<&LiveFlight> = self
            .store
            .iter()
            .filter(|flight| flight.status.is_airborne())
            .collect();
        let average_progress = if airborne.is_empty() {
            0.0
        } else {
            airborne.iter().map(|flight| flight.progress).sum::<f64>() / airborne.len() as f64
        };

        LiveFlightStats {
            total: self.store.len(),
            airborne: airborne.len(),
            delayed: self
                .store
                .iter()
                .filter(|flight| flight.status == FlightStatus::Delayed)
                .count(),
            low_fuel: self.store.iter().filter(|f| f.is_low_on_fuel()).count(),
            passengers: self.store.iter().map(|flight| flight.passengers).sum(),
            average_progress,
        }
    }
}

fn weather(conditions: &str, temperature: i32, wind_speed: u32, visibility: u32) -> EnRouteWeather {
    EnRouteWeather {
        conditions: conditions.to_string(),
        temperature,
        wind_speed,
        visibility,
    }
}

fn sample(id: &str, draft: LiveFlightDraft) -> LiveFlight {
    LiveFlight::from_draft(id.to_string(), draft)
}

/// The sample flights the live view starts with.
pub fn sample_flights() -> Vec<LiveFlight> {
    vec![
        sample(
            "1",
            LiveFlightDraft {
                flight_number: "AA1234".to_string(),
                airline: "American Airlines".to_string(),
                aircraft: "Boeing 737-800".to_string(),
                departure: Endpoint::new("John F. Kennedy International", "JFK", 8, 30)
                    .at_gate("A12", "Terminal 8"),
                arrival: Endpoint::new("Los Angeles International", "LAX", 11, 45)
                    .at_gate("B7", "Terminal 6"),
                status: FlightStatus::EnRoute,
                position: Position {
                    latitude: 39.8283,
                    longitude: -98.5795,
                    altitude: 35000.0,
                    speed: 485.0,
                    heading: 245.0,
                },
                progress: 65.0,
                estimated_arrival: NaiveTime::from_hms_opt(11, 52, 0).unwrap_or_default(),
                delay: 7,
                passengers: 156,
                crew: 6,
                fuel: 68.0,
                weather: weather("Clear", -45, 25, 10),
            },
        ),
        sample(
            "2",
            LiveFlightDraft {
                flight_number: "UA5678".to_string(),
                airline: "United Airlines".to_string(),
                aircraft: "Airbus A320".to_string(),
                departure: Endpoint::new("Chicago O'Hare International", "ORD", 14, 15)
                    .at_gate("C3", "Terminal 1"),
                arrival: Endpoint::new("San Francisco International", "SFO", 16, 30)
                    .at_gate("D15", "Terminal 3"),
                status: FlightStatus::Delayed,
                position: Position {
                    latitude: 41.9742,
                    longitude: -87.9073,
                    ..Default::default()
                },
                progress: 0.0,
                estimated_arrival: NaiveTime::from_hms_opt(17, 15, 0).unwrap_or_default(),
                delay: 45,
                passengers: 142,
                crew: 5,
                fuel: 95.0,
                weather: weather("Rain", 12, 15, 3),
            },
        ),
        sample(
            "3",
            LiveFlightDraft {
                flight_number: "DL9012".to_string(),
                airline: "Delta Air Lines".to_string(),
                aircraft: "Boeing 757-200".to_string(),
                departure: Endpoint::new("Hartsfield-Jackson Atlanta International", "ATL", 10, 0)
                    .at_gate("E8", "Terminal S"),
                arrival: Endpoint::new("Miami International", "MIA", 12, 15)
                    .at_gate("F12", "Terminal N"),
                status: FlightStatus::Approaching,
                position: Position {
                    latitude: 25.7617,
                    longitude: -80.1918,
                    altitude: 8000.0,
                    speed: 320.0,
                    heading: 180.0,
                },
                progress: 95.0,
                estimated_arrival: NaiveTime::from_hms_opt(12, 18, 0).unwrap_or_default(),
                delay: 3,
                passengers: 189,
                crew: 7,
                fuel: 22.0,
                weather: weather("Partly Cloudy", 28, 8, 8),
            },
        ),
        sample(
            "4",
            LiveFlightDraft {
                flight_number: "SW3456".to_string(),
                airline: "Southwest Airlines".to_string(),
                aircraft: "Boeing 737-700".to_string(),
                departure: Endpoint::new("Denver International", "DEN", 16, 45)
                    .at_gate("A25", "Terminal A"),
                arrival: Endpoint::new("Phoenix Sky Harbor International", "PHX", 18, 20)
                    .at_gate("B18", "Terminal 4"),
                status: FlightStatus::Boarding,
                position: Position {
                    latitude: 39.8561,
                    longitude: -104.6737,
                    ..Default::default()
                },
                progress: 0.0,
                estimated_arrival: NaiveTime::from_hms_opt(18, 20, 0).unwrap_or_default(),
                delay: 0,
                passengers: 134,
                crew: 5,
                fuel: 98.0,
                weather: weather("Clear", 22, 12, 10),
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_round_trip_case_insensitively() {
        assert_eq!("en route".parse::<FlightStatus>().ok(), Some(FlightStatus::EnRoute));
        assert_eq!("CANCELLED".parse::<FlightStatus>().ok(), Some(FlightStatus::Cancelled));
        assert_eq!(FlightStatus::EnRoute.to_string(), "En Route");
        assert!("taxiing".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_all_filter_with_empty_search_returns_every_flight_in_order() {
        let flights = LiveFlights::new();
        let view = flights.filtered(&LiveFlightQuery::default());

        let ids: Vec<_> = view.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_search_matches_airport_codes_case_insensitively() {
        let flights = LiveFlights::new();
        let view = flights.filtered(&LiveFlightQuery::search("jfk"));

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].flight_number, "AA1234");
    }

    #[test]
    fn test_search_and_status_filter_combine() {
        let flights = LiveFlights::new();
        let query = LiveFlightQuery::search("airlines").with_status(Filter::Only(FlightStatus::Delayed));

        let view = flights.filtered(&query);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].flight_number, "UA5678");
    }

    #[test]
    fn test_unmatched_search_is_empty() {
        let flights = LiveFlights::new();
        assert!(flights.filtered(&LiveFlightQuery::search("ZZ999")).is_empty());
    }

    #[test]
    fn test_update_status_stamps_last_update() {
        let mut flights = LiveFlights::new();
        let before = flights.get("4").map(|f| f.last_update).expect("flight 4");

        assert!(flights.update_status("4", FlightStatus::Departed));
        let flight = flights.get("4").expect("flight 4");
        assert_eq!(flight.status, FlightStatus::Departed);
        assert!(flight.last_update >= before);
        assert_eq!(flight.passengers, 134);
    }

    #[test]
    fn test_patch_clamps_percentages() {
        let mut flights = LiveFlights::new();
        flights.update(
            "1",
            LiveFlightPatch {
                progress: Some(140.0),
                fuel: Some(-3.0),
                ..Default::default()
            },
        );

        let flight = flights.get("1").expect("flight 1");
        assert_eq!(flight.progress, PERCENT_MAX);
        assert_eq!(flight.fuel, PERCENT_MIN);
    }

    #[test]
    fn test_gate_patch_keeps_other_fields() {
        let mut flights = LiveFlights::new();
        flights.update(
            "2",
            LiveFlightPatch {
                departure_gate: Some("C9".to_string()),
                ..Default::default()
            },
        );

        let flight = flights.get("2").expect("flight 2");
        assert_eq!(flight.departure.gate.as_deref(), Some("C9"));
        assert_eq!(flight.departure.terminal.as_deref(), Some("Terminal 1"));
        assert_eq!(flight.status, FlightStatus::Delayed);
    }

    #[test]
    fn test_selection_follows_store() {
        let mut flights = LiveFlights::new();
        assert!(flights.select("3"));
        flights.update_status("3", FlightStatus::Landed);

        assert_eq!(flights.selected().map(|f| f.status), Some(FlightStatus::Landed));

        flights.clear_selection();
        assert!(flights.selected().is_none());
    }

    #[test]
    fn test_only_en_route_flights_are_in_progress() {
        let flights = LiveFlights::new();
        assert_eq!(flights.in_progress_ids(), vec!["1".to_string()]);
    }

    #[test]
    fn test_stats() {
        let stats = LiveFlights::new().stats();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.airborne, 2);
        assert_eq!(stats.delayed, 1);
        assert_eq!(stats.low_fuel, 1);
        assert_eq!(stats.passengers, 156 + 142 + 189 + 134);
        assert!((stats.average_progress - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_find_by_number() {
        let flights = LiveFlights::new();
        assert_eq!(flights.find_by_number("dl9012").map(|f| f.id.as_str()), Some("3"));
        assert!(flights.find_by_number("XX0000").is_none());
    }
}
