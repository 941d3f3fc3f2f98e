use chrono::{DateTime, Utc};
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable};

labelled_enum! {
    pub enum AirportStatus ("airport status") {
        Operational => "Operational",
        Limited => "Limited",
        Closed => "Closed",
        Emergency => "Emergency",
    }
}

labelled_enum! {
    pub enum RunwayStatus ("runway status") {
        Active => "Active",
        Closed => "Closed",
        Maintenance => "Maintenance",
    }
}

labelled_enum! {
    pub enum TerminalStatus ("terminal status") {
        Operational => "Operational",
        Limited => "Limited",
        Closed => "Closed",
    }
}

labelled_enum! {
    pub enum GateStatus ("gate status") {
        Available => "Available",
        Occupied => "Occupied",
        Maintenance => "Maintenance",
        Closed => "Closed",
    }
}

labelled_enum! {
    pub enum GateKind ("gate type") {
        Domestic => "Domestic",
        International => "International",
        Both => "Both",
    }
}

labelled_enum! {
    pub enum ServiceCategory ("service category") {
        Passenger => "Passenger",
        Cargo => "Cargo",
        Ground => "Ground",
        Maintenance => "Maintenance",
        Security => "Security",
        Other => "Other",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Runway {
    pub id: String,
    pub name: String,
    /// Feet.
    pub length: u32,
    pub width: u32,
    pub surface: String,
    pub status: RunwayStatus,
    pub heading: String,
    pub lighting: bool,
    pub ils: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub id: String,
    pub name: String,
    pub gates: u32,
    pub capacity: u32,
    pub services: Vec<String>,
    pub status: TerminalStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub id: String,
    pub number: String,
    pub terminal: String,
    pub kind: GateKind,
    pub status: GateStatus,
    pub current_flight: Option<String>,
    pub aircraft: Option<String>,
    pub scheduled_departure: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirportService {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    pub provider: String,
    pub active: bool,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherInfo {
    pub conditions: String,
    /// Fahrenheit.
    pub temperature: i32,
    pub humidity: u32,
    pub wind_speed: u32,
    pub wind_direction: u32,
    /// Statute miles.
    pub visibility: u32,
    pub pressure: f64,
    pub ceiling: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficInfo {
    pub arrivals: u32,
    pub departures: u32,
    pub delays: u32,
    pub cancellations: u32,
    pub ground_stops: bool,
    pub average_delay: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Capacity {
    pub hourly: u32,
    pub daily: u32,
    pub annual: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirportStatistics {
    pub daily_flights: u32,
    pub daily_passengers: u32,
    pub on_time_performance: u32,
    pub average_delay: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub id: String,
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Feet above sea level.
    pub elevation: i32,
    pub runways: Vec<Runway>,
    pub terminals: Vec<Terminal>,
    pub gates: Vec<Gate>,
    pub services: Vec<AirportService>,
    pub weather: WeatherInfo,
    pub traffic: TrafficInfo,
    pub status: AirportStatus,
    pub capacity: Capacity,
    pub statistics: AirportStatistics,
    pub contact: Contact,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirportDraft {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: i32,
    pub runways: Vec<Runway>,
    pub terminals: Vec<Terminal>,
    pub gates: Vec<Gate>,
    pub services: Vec<AirportService>,
    pub weather: WeatherInfo,
    pub traffic: TrafficInfo,
    pub status: AirportStatus,
    pub capacity: Capacity,
    pub statistics: AirportStatistics,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportPatch {
    pub status: Option<AirportStatus>,
    pub weather: Option<WeatherInfo>,
    pub traffic: Option<TrafficInfo>,
    pub statistics: Option<AirportStatistics>,
}

impl Airport {
    pub fn runway(&self, runway_id: &str) -> Option<&Runway> {
        self.runways.iter().find(|runway| runway.id == runway_id)
    }

    pub fn gate(&self, gate_id: &str) -> Option<&Gate> {
        self.gates.iter().find(|gate| gate.id == gate_id)
    }

    /// Occupied gates as a percentage of all gates, `0` for an airport
    /// without gates.
    pub fn gate_utilization(&self) -> f64 {
        if self.gates.is_empty() {
            return 0.0;
        }
        let occupied = self
            .gates
            .iter()
            .filter(|gate| gate.status == GateStatus::Occupied)
            .count();
        occupied as f64 / self.gates.len() as f64 * 100.0
    }
}

impl Entity for Airport {
    type Draft = AirportDraft;
    type Patch = AirportPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: AirportDraft) -> Self {
        Airport {
            id,
            code: draft.code,
            name: draft.name,
            city: draft.city,
            country: draft.country,
            timezone: draft.timezone,
            latitude: draft.latitude,
            longitude: draft.longitude,
            elevation: draft.elevation,
            runways: draft.runways,
            terminals: draft.terminals,
            gates: draft.gates,
            services: draft.services,
            weather: draft.weather,
            traffic: draft.traffic,
            status: draft.status,
            capacity: draft.capacity,
            statistics: draft.statistics,
            contact: draft.contact,
            last_updated: Utc::now(),
        }
    }

    fn apply(&mut self, patch: AirportPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(weather) = patch.weather {
            self.weather = weather;
        }
        if let Some(traffic) = patch.traffic {
            self.traffic = traffic;
        }
        if let Some(statistics) = patch.statistics {
            self.statistics = statistics;
        }
        self.last_updated = Utc::now();
    }
}

impl Searchable for Airport {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.code.as_str(),
            self.name.as_str(),
            self.city.as_str(),
            self.country.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportQuery {
    pub search: String,
    pub status: Filter<AirportStatus>,
}

impl Criteria<Airport> for AirportQuery {
    fn matches(&self, airport: &Airport) -> bool {
        airport.matches_term(&self.search) && self.status.accepts(&airport.status)
    }
}

/// Airports domain. Airports are seeded and never added or removed; only
/// their operational state changes.
#[derive(Debug, Clone)]
pub struct Airports {
    airports: EntityStore<Airport>,
}

impl Default for Airports {
    fn default() -> Self {
        Self::new()
    }
}

impl Airports {
    pub fn new() -> Self {
        Self::with_airports(sample_airports())
    }

    pub fn with_airports(airports: Vec<Airport>) -> Self {
        Airports {
            airports: EntityStore::seeded(airports, InsertOrder::Append),
        }
    }

    pub fn airports(&self) -> &[Airport] {
        self.airports.records()
    }

    pub fn get(&self, id: &str) -> Option<&Airport> {
        self.airports.get(id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|airport| airport.code.eq_ignore_ascii_case(code))
    }

    pub fn update(&mut self, id: &str, patch: AirportPatch) -> bool {
        self.airports.update(id, patch)
    }

    pub fn update_status(&mut self, id: &str, status: AirportStatus) -> bool {
        self.update(
            id,
            AirportPatch {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Sets the status of one runway. Unknown airport or runway ids leave
    /// the store untouched and return `false`.
    pub fn update_runway_status(
        &mut self,
        airport_id: &str,
        runway_id: &str,
        status: RunwayStatus,
    ) -> bool {
        let known = self
            .get(airport_id)
            .map_or(false, |airport| airport.runway(runway_id).is_some());
        known
            && self.airports.modify(airport_id, |airport| {
                for runway in airport.runways.iter_mut().filter(|r| r.id == runway_id) {
                    runway.status = status;
                }
                airport.last_updated = Utc::now();
            })
    }

    /// Sets the status of one gate. Leaving the occupied state drops the
    /// flight assignment of the gate.
    pub fn update_gate_status(&mut self, airport_id: &str, gate_id: &str, status: GateStatus) -> bool {
        let known = self
            .get(airport_id)
            .map_or(false, |airport| airport.gate(gate_id).is_some());
        known
            && self.airports.modify(airport_id, |airport| {
                for gate in airport.gates.iter_mut().filter(|g| g.id == gate_id) {
                    gate.status = status;
                    if status != GateStatus::Occupied {
                        gate.current_flight = None;
                        gate.aircraft = None;
                        gate.scheduled_departure = None;
                    }
                }
                airport.last_updated = Utc::now();
            })
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.airports.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.airports.clear_selection();
    }

    pub fn selected(&self) -> Option<&Airport> {
        self.airports.selected()
    }

    pub fn filtered(&self, query: &AirportQuery) -> Vec<&Airport> {
        self.airports.project(query)
    }

    /// Gate utilization of the airport, `None` when the id is unknown.
    pub fn gate_utilization(&self, id: &str) -> Option<f64> {
        self.get(id).map(Airport::gate_utilization)
    }

    pub fn active_runways(&self, id: &str) -> Vec<&Runway> {
        self.get(id)
            .map(|airport| {
                airport
                    .runways
                    .iter()
                    .filter(|runway| runway.status == RunwayStatus::Active)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn ground_stops(&self) -> Vec<&Airport> {
        self.airports
            .project(&|airport: &Airport| airport.traffic.ground_stops)
    }
}

fn runway(id: &str, name: &str, dimensions: (u32, u32), status: RunwayStatus, ils: bool) -> Runway {
    Runway {
        id: id.to_string(),
        name: name.to_string(),
        length: dimensions.0,
        width: dimensions.1,
        surface: "Asphalt".to_string(),
        status,
        heading: name.replace(['L', 'R', 'C'], ""),
        lighting: true,
        ils,
    }
}

fn terminal(id: &str, name: &str, gates: u32, capacity: u32, services: &[&str], status: TerminalStatus) -> Terminal {
    Terminal {
        id: id.to_string(),
        name: name.to_string(),
        gates,
        capacity,
        services: services.iter().map(|s| s.to_string()).collect(),
        status,
    }
}

fn gate(id: &str, number: &str, terminal: &str, kind: GateKind, status: GateStatus) -> Gate {
    Gate {
        id: id.to_string(),
        number: number.to_string(),
        terminal: terminal.to_string(),
        kind,
        status,
        current_flight: None,
        aircraft: None,
        scheduled_departure: None,
    }
}

fn occupied(mut gate: Gate, flight: &str, aircraft: &str, departure: &str) -> Gate {
    gate.current_flight = Some(flight.to_string());
    gate.aircraft = Some(aircraft.to_string());
    gate.scheduled_departure = Some(departure.to_string());
    gate
}

fn service(id: &str, name: &str, category: ServiceCategory, provider: &str, hours: &str) -> AirportService {
    AirportService {
        id: id.to_string(),
        name: name.to_string(),
        category,
        provider: provider.to_string(),
        active: true,
        hours: hours.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn weather(
    conditions: &str,
    temperature: i32,
    humidity: u32,
    wind: (u32, u32),
    visibility: u32,
    pressure: f64,
    ceiling: u32,
) -> WeatherInfo {
    WeatherInfo {
        conditions: conditions.to_string(),
        temperature,
        humidity,
        wind_speed: wind.0,
        wind_direction: wind.1,
        visibility,
        pressure,
        ceiling,
        last_updated: Utc::now(),
    }
}

fn contact(phone: &str, email: &str, website: &str) -> Contact {
    Contact {
        phone: phone.to_string(),
        email: email.to_string(),
        website: website.to_string(),
    }
}

pub fn sample_airports() -> Vec<Airport> {
    use GateKind::*;
    use ServiceCategory::*;

    let full_service = ["Customs", "Immigration", "Duty Free", "Restaurants", "Lounges"];
    let domestic = ["Check-in", "Restaurants", "Shops"];
    let hub = ["Check-in", "Restaurants", "Shops", "Lounges"];

    let jfk = AirportDraft {
        code: "JFK".to_string(),
        name: "John F. Kennedy International Airport".to_string(),
        city: "New York".to_string(),
        country: "United States".to_string(),
        timezone: "EST".to_string(),
        latitude: 40.6413,
        longitude: -73.7781,
        elevation: 13,
        runways: vec![
            runway("1", "04L/22R", (12079, 200), RunwayStatus::Active, true),
            runway("2", "04R/22L", (8400, 200), RunwayStatus::Active, true),
            runway("3", "08L/26R", (10000, 150), RunwayStatus::Maintenance, false),
        ],
        terminals: vec![
            terminal("1", "Terminal 1", 11, 8000, &["Customs", "Immigration", "Duty Free", "Restaurants"], TerminalStatus::Operational),
            terminal("4", "Terminal 4", 48, 15000, &full_service, TerminalStatus::Operational),
            terminal("8", "Terminal 8", 30, 12000, &["Domestic Check-in", "Restaurants", "Shops"], TerminalStatus::Operational),
        ],
        gates: vec![
            occupied(gate("1", "A12", "Terminal 8", Domestic, GateStatus::Occupied), "AA1234", "Boeing 737", "08:30"),
            gate("2", "B7", "Terminal 4", International, GateStatus::Available),
            gate("3", "C3", "Terminal 1", International, GateStatus::Maintenance),
        ],
        services: vec![
            service("1", "Ground Handling", Ground, "Swissport", "24/7"),
            service("2", "Aircraft Maintenance", Maintenance, "American Airlines", "24/7"),
            service("3", "Customs & Border Protection", Security, "CBP", "24/7"),
        ],
        weather: weather("Clear", 72, 65, (8, 270), 10, 30.15, 25000),
        traffic: TrafficInfo {
            arrivals: 156,
            departures: 142,
            delays: 8,
            cancellations: 2,
            ground_stops: false,
            average_delay: 12,
        },
        status: AirportStatus::Operational,
        capacity: Capacity {
            hourly: 90,
            daily: 1200,
            annual: 62_000_000,
        },
        statistics: AirportStatistics {
            daily_flights: 298,
            daily_passengers: 45000,
            on_time_performance: 87,
            average_delay: 12,
        },
        contact: contact("+1-718-244-4444", "info@jfkairport.com", "https://www.jfkairport.com"),
    };

    let lax = AirportDraft {
        code: "LAX".to_string(),
        name: "Los Angeles International Airport".to_string(),
        city: "Los Angeles".to_string(),
        country: "United States".to_string(),
        timezone: "PST".to_string(),
        latitude: 33.9425,
        longitude: -118.4081,
        elevation: 125,
        runways: vec![
            runway("1", "06L/24R", (10285, 200), RunwayStatus::Active, true),
            runway("2", "06R/24L", (12091, 200), RunwayStatus::Active, true),
        ],
        terminals: vec![
            terminal("1", "Terminal 1", 18, 10000, &domestic, TerminalStatus::Operational),
            terminal("2", "Terminal 2", 11, 8000, &domestic, TerminalStatus::Operational),
            terminal("TBIT", "Tom Bradley International Terminal", 18, 15000, &full_service, TerminalStatus::Operational),
        ],
        gates: vec![
            gate("1", "B7", "Tom Bradley International Terminal", International, GateStatus::Available),
            occupied(gate("2", "1A", "Terminal 1", Domestic, GateStatus::Occupied), "SW3456", "Boeing 737", "16:45"),
        ],
        services: vec![
            service("1", "Ground Handling", Ground, "Menzies Aviation", "24/7"),
            service("2", "Cargo Operations", Cargo, "FedEx", "24/7"),
        ],
        weather: weather("Partly Cloudy", 68, 72, (6, 250), 8, 29.92, 15000),
        traffic: TrafficInfo {
            arrivals: 189,
            departures: 201,
            delays: 15,
            cancellations: 1,
            ground_stops: false,
            average_delay: 18,
        },
        status: AirportStatus::Operational,
        capacity: Capacity {
            hourly: 120,
            daily: 1800,
            annual: 88_000_000,
        },
        statistics: AirportStatistics {
            daily_flights: 390,
            daily_passengers: 67000,
            on_time_performance: 82,
            average_delay: 18,
        },
        contact: contact("+1-855-463-5252", "info@lawa.org", "https://www.flylax.com"),
    };

    let ord = AirportDraft {
        code: "ORD".to_string(),
        name: "Chicago O'Hare International Airport".to_string(),
        city: "Chicago".to_string(),
        country: "United States".to_string(),
        timezone: "CST".to_string(),
        latitude: 41.9742,
        longitude: -87.9073,
        elevation: 672,
        runways: vec![
            runway("1", "04L/22R", (7500, 150), RunwayStatus::Active, true),
            runway("2", "10L/28R", (13000, 200), RunwayStatus::Active, true),
            runway("3", "14R/32L", (10801, 200), RunwayStatus::Closed, false),
        ],
        terminals: vec![
            terminal("1", "Terminal 1", 50, 18000, &hub, TerminalStatus::Limited),
            terminal("2", "Terminal 2", 60, 20000, &hub, TerminalStatus::Operational),
            terminal("3", "Terminal 3", 75, 25000, &hub, TerminalStatus::Operational),
        ],
        gates: vec![
            gate("1", "C3", "Terminal 1", Domestic, GateStatus::Available),
            occupied(gate("2", "B15", "Terminal 2", Both, GateStatus::Occupied), "UA5678", "Airbus A320", "14:15"),
        ],
        services: vec![
            service("1", "Ground Handling", Ground, "United Ground Express", "24/7"),
            service("2", "De-icing Services", Ground, "Airport Authority", "Seasonal"),
        ],
        weather: weather("Rain", 45, 85, (15, 180), 3, 29.85, 2000),
        traffic: TrafficInfo {
            arrivals: 234,
            departures: 198,
            delays: 45,
            cancellations: 8,
            ground_stops: true,
            average_delay: 35,
        },
        status: AirportStatus::Limited,
        capacity: Capacity {
            hourly: 150,
            daily: 2400,
            annual: 84_000_000,
        },
        statistics: AirportStatistics {
            daily_flights: 432,
            daily_passengers: 78000,
            on_time_performance: 68,
            average_delay: 35,
        },
        contact: contact("+1-800-832-6352", "info@flychicago.com", "https://www.flychicago.com"),
    };

    vec![
        Airport::from_draft("1".to_string(), jfk),
        Airport::from_draft("2".to_string(), lax),
        Airport::from_draft("3".to_string(), ord),
    ]
}
