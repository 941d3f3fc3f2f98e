use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable};

use crate::live_flights::Endpoint;

labelled_enum! {
    pub enum ScheduleStatus ("schedule status") {
        Scheduled => "Scheduled",
        Confirmed => "Confirmed",
        Delayed => "Delayed",
        Cancelled => "Cancelled",
        Boarding => "Boarding",
        Departed => "Departed",
    }
}

labelled_enum! {
    pub enum Frequency ("frequency") {
        Daily => "Daily",
        Weekly => "Weekly",
        BiWeekly => "Bi-weekly",
        Monthly => "Monthly",
        OneTime => "One-time",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seats {
    pub capacity: u32,
    pub booked: u32,
    pub available: u32,
}

impl Seats {
    /// Keeps `available` consistent with capacity and bookings.
    pub fn new(capacity: u32, booked: u32) -> Self {
        Seats {
            capacity,
            booked,
            available: capacity.saturating_sub(booked),
        }
    }

    /// Booked seats as a percentage of capacity.
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.booked as f64 / self.capacity as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrewPlan {
    pub pilots: u32,
    pub flight_attendants: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    /// Miles.
    pub distance: u32,
    pub duration: String,
    pub flight_time: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pricing {
    pub economy: f64,
    pub business: f64,
    pub first_class: f64,
}

/// A recurring (or one-time) scheduled flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledFlight {
    pub id: String,
    pub flight_number: String,
    pub airline: String,
    pub aircraft: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub status: ScheduleStatus,
    pub frequency: Frequency,
    pub days_of_week: Vec<Weekday>,
    pub effective_date: NaiveDate,
    /// `None` means open ended.
    pub expiry_date: Option<NaiveDate>,
    pub passengers: Seats,
    pub crew: CrewPlan,
    pub route: Route,
    pub pricing: Pricing,
    pub notes: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledFlightDraft {
    pub flight_number: String,
    pub airline: String,
    pub aircraft: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub status: ScheduleStatus,
    pub frequency: Frequency,
    pub days_of_week: Vec<Weekday>,
    pub effective_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub passengers: Seats,
    pub crew: CrewPlan,
    pub route: Route,
    pub pricing: Pricing,
    pub notes: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduledFlightPatch {
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub aircraft: Option<String>,
    pub departure: Option<Endpoint>,
    pub arrival: Option<Endpoint>,
    pub status: Option<ScheduleStatus>,
    pub frequency: Option<Frequency>,
    pub days_of_week: Option<Vec<Weekday>>,
    pub effective_date: Option<NaiveDate>,
    /// `Some(None)` removes the expiry date.
    pub expiry_date: Option<Option<NaiveDate>>,
    pub passengers: Option<Seats>,
    pub crew: Option<CrewPlan>,
    pub route: Option<Route>,
    pub pricing: Option<Pricing>,
    pub notes: Option<Option<String>>,
}

impl ScheduledFlight {
    /// Whether the flight operates on `date`: its weekday is listed and the
    /// date lies within the effective period.
    pub fn operates_on(&self, date: NaiveDate) -> bool {
        let within_period =
            date >= self.effective_date && self.expiry_date.map_or(true, |expiry| date <= expiry);
        within_period && self.days_of_week.contains(&date.weekday())
    }
}

impl Entity for ScheduledFlight {
    type Draft = ScheduledFlightDraft;
    type Patch = ScheduledFlightPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ScheduledFlightDraft) -> Self {
        ScheduledFlight {
            id,
            flight_number: draft.flight_number,
            airline: draft.airline,
            aircraft: draft.aircraft,
            departure: draft.departure,
            arrival: draft.arrival,
            status: draft.status,
            frequency: draft.frequency,
            days_of_week: draft.days_of_week,
            effective_date: draft.effective_date,
            expiry_date: draft.expiry_date,
            passengers: draft.passengers,
            crew: draft.crew,
            route: draft.route,
            pricing: draft.pricing,
            notes: draft.notes,
            last_modified: Utc::now(),
            created_by: draft.created_by,
        }
    }

    fn apply(&mut self, patch: ScheduledFlightPatch) {
        if let Some(flight_number) = patch.flight_number {
            self.flight_number = flight_number;
        }
        if let Some(airline) = patch.airline {
            self.airline = airline;
        }
        if let Some(aircraft) = patch.aircraft {
            self.aircraft = aircraft;
        }
        if let Some(departure) = patch.departure {
            self.departure = departure;
        }
        if let Some(arrival) = patch.arrival {
            self.arrival = arrival;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(days) = patch.days_of_week {
            self.days_of_week = days;
        }
        if let Some(date) = patch.effective_date {
            self.effective_date = date;
        }
        if let Some(expiry) = patch.expiry_date {
            self.expiry_date = expiry;
        }
        if let Some(passengers) = patch.passengers {
            self.passengers = passengers;
        }
        if let Some(crew) = patch.crew {
            self.crew = crew;
        }
        if let Some(route) = patch.route {
            self.route = route;
        }
        if let Some(pricing) = patch.pricing {
            self.pricing = pricing;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.last_modified = Utc::now();
    }
}

impl Searchable for ScheduledFlight {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.flight_number.as_str(),
            self.airline.as_str(),
            self.departure.code.as_str(),
            self.arrival.code.as_str(),
        ]
    }
}

/// Filters of the schedule view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleQuery {
    pub search: String,
    pub status: Filter<ScheduleStatus>,
    /// Exact airline name.
    pub airline: Filter<String>,
}

impl Criteria<ScheduledFlight> for ScheduleQuery {
    fn matches(&self, flight: &ScheduledFlight) -> bool {
        flight.matches_term(&self.search)
            && self.status.accepts(&flight.status)
            && self.airline.accepts(&flight.airline)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleStats {
    pub total: usize,
    pub confirmed: usize,
    pub delayed: usize,
    pub cancelled: usize,
    /// Booked over offered seats across all flights, as a percentage.
    pub load_factor: f64,
}

/// Flight-schedule domain.
#[derive(Debug, Clone)]
pub struct Schedule {
    store: EntityStore<ScheduledFlight>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::with_flights(sample_schedule())
    }

    pub fn with_flights(flights: Vec<ScheduledFlight>) -> Self {
        Schedule {
            store: EntityStore::seeded(flights, InsertOrder::Append),
        }
    }

    pub fn flights(&self) -> &[ScheduledFlight] {
        self.store.records()
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledFlight> {
        self.store.get(id)
    }

    pub fn add(&mut self, draft: ScheduledFlightDraft) -> &ScheduledFlight {
        self.store.add(draft)
    }

    pub fn update(&mut self, id: &str, patch: ScheduledFlightPatch) -> bool {
        self.store.update(id, patch)
    }

    pub fn delete(&mut self, id: &str) -> Option<ScheduledFlight> {
        self.store.delete(id)
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    pub fn selected(&self) -> Option<&ScheduledFlight> {
        self.store.selected()
    }

    pub fn filtered(&self, query: &ScheduleQuery) -> Vec<&ScheduledFlight> {
        self.store.project(query)
    }

    /// The flights operating on `date`, in schedule order.
    pub fn flights_on(&self, date: NaiveDate) -> Vec<&ScheduledFlight> {
        self.store
            .project(&|flight: &ScheduledFlight| flight.operates_on(date))
    }

    /// Distinct airline names, in first-seen order, for the airline filter.
    pub fn airlines(&self) -> Vec<&str> {
        let mut airlines: Vec<&str> = Vec::new();
        for flight in self.store.iter() {
            if !airlines.contains(&flight.airline.as_str()) {
                airlines.push(&flight.airline);
            }
        }
        airlines
    }

    pub fn stats(&self) -> ScheduleStats {
        let count = |status: ScheduleStatus| {
            self.store
                .iter()
                .filter(|flight| flight.status == status)
                .count()
        };
        let capacity: u32 = self.store.iter().map(|f| f.passengers.capacity).sum();
        let booked: u32 = self.store.iter().map(|f| f.passengers.booked).sum();

        ScheduleStats {
            total: self.store.len(),
            confirmed: count(ScheduleStatus::Confirmed),
            delayed: count(ScheduleStatus::Delayed),
            cancelled: count(ScheduleStatus::Cancelled),
            load_factor: Seats::new(capacity, booked).load_factor(),
        }
    }
}

const EVERY_DAY: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn route(distance: u32, duration: &str, flight_time: &str) -> Route {
    Route {
        distance,
        duration: duration.to_string(),
        flight_time: flight_time.to_string(),
    }
}

pub fn sample_schedule() -> Vec<ScheduledFlight> {
    let drafts = vec![
        ScheduledFlightDraft {
            flight_number: "AA1001".to_string(),
            airline: "American Airlines".to_string(),
            aircraft: "Boeing 737-800".to_string(),
            departure: Endpoint::new("John F. Kennedy International", "JFK", 6, 0)
                .at_gate("A12", "Terminal 8"),
            arrival: Endpoint::new("Los Angeles International", "LAX", 9, 30)
                .at_gate("B7", "Terminal 6"),
            status: ScheduleStatus::Scheduled,
            frequency: Frequency::Daily,
            days_of_week: EVERY_DAY.to_vec(),
            effective_date: date(2024, 1, 1),
            expiry_date: Some(date(2024, 12, 31)),
            passengers: Seats::new(160, 142),
            crew: CrewPlan {
                pilots: 2,
                flight_attendants: 4,
            },
            route: route(2475, "5h 30m", "5h 15m"),
            pricing: Pricing {
                economy: 299.0,
                business: 899.0,
                first_class: 1599.0,
            },
            notes: Some("Popular morning route".to_string()),
            created_by: "John Smith".to_string(),
        },
        ScheduledFlightDraft {
            flight_number: "UA2002".to_string(),
            airline: "United Airlines".to_string(),
            aircraft: "Airbus A320".to_string(),
            departure: Endpoint::new("Chicago O'Hare International", "ORD", 14, 15)
                .at_gate("C3", "Terminal 1"),
            arrival: Endpoint::new("San Francisco International", "SFO", 16, 45)
                .at_gate("D15", "Terminal 3"),
            status: ScheduleStatus::Confirmed,
            frequency: Frequency::Daily,
            days_of_week: EVERY_DAY.to_vec(),
            effective_date: date(2024, 1, 1),
            expiry_date: None,
            passengers: Seats::new(150, 128),
            crew: CrewPlan {
                pilots: 2,
                flight_attendants: 4,
            },
            route: route(1846, "4h 30m", "4h 15m"),
            pricing: Pricing {
                economy: 249.0,
                business: 749.0,
                first_class: 1299.0,
            },
            notes: None,
            created_by: "Sarah Johnson".to_string(),
        },
        ScheduledFlightDraft {
            flight_number: "DL3003".to_string(),
            airline: "Delta Air Lines".to_string(),
            aircraft: "Boeing 757-200".to_string(),
            departure: Endpoint::new("Hartsfield-Jackson Atlanta International", "ATL", 10, 0)
                .at_gate("E8", "Terminal S"),
            arrival: Endpoint::new("Miami International", "MIA", 12, 15)
                .at_gate("F12", "Terminal N"),
            status: ScheduleStatus::Scheduled,
            frequency: Frequency::Weekly,
            days_of_week: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            effective_date: date(2024, 1, 1),
            expiry_date: Some(date(2024, 6, 30)),
            passengers: Seats::new(200, 175),
            crew: CrewPlan {
                pilots: 2,
                flight_attendants: 6,
            },
            route: route(594, "2h 15m", "2h 00m"),
            pricing: Pricing {
                economy: 179.0,
                business: 549.0,
                first_class: 999.0,
            },
            notes: Some("Seasonal route".to_string()),
            created_by: "Mike Davis".to_string(),
        },
        ScheduledFlightDraft {
            flight_number: "SW4004".to_string(),
            airline: "Southwest Airlines".to_string(),
            aircraft: "Boeing 737-700".to_string(),
            departure: Endpoint::new("Denver International", "DEN", 16, 45)
                .at_gate("A25", "Terminal A"),
            arrival: Endpoint::new("Phoenix Sky Harbor International", "PHX", 18, 20)
                .at_gate("B18", "Terminal 4"),
            status: ScheduleStatus::Delayed,
            frequency: Frequency::Daily,
            days_of_week: EVERY_DAY.to_vec(),
            effective_date: date(2024, 1, 1),
            expiry_date: None,
            passengers: Seats::new(143, 134),
            crew: CrewPlan {
                pilots: 2,
                flight_attendants: 3,
            },
            route: route(602, "1h 35m", "1h 25m"),
            // Single-class cabin.
            pricing: Pricing {
                economy: 129.0,
                business: 0.0,
                first_class: 0.0,
            },
            notes: None,
            created_by: "Lisa Wilson".to_string(),
        },
    ];

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| ScheduledFlight::from_draft((index + 1).to_string(), draft))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(number: &str) -> ScheduledFlightDraft {
        ScheduledFlightDraft {
            flight_number: number.to_string(),
            airline: "JetBlue".to_string(),
            aircraft: "Airbus A321".to_string(),
            departure: Endpoint::new("Boston Logan International", "BOS", 7, 0),
            arrival: Endpoint::new("Orlando International", "MCO", 10, 5),
            status: ScheduleStatus::Scheduled,
            frequency: Frequency::OneTime,
            days_of_week: vec![Weekday::Sat],
            effective_date: date(2024, 3, 2),
            expiry_date: Some(date(2024, 3, 2)),
            passengers: Seats::new(200, 12),
            crew: CrewPlan::default(),
            route: Route::default(),
            pricing: Pricing::default(),
            notes: None,
            created_by: "Ops".to_string(),
        }
    }

    #[test]
    fn test_add_then_update_merges_fields() {
        let mut schedule = Schedule::new();
        let id = schedule.add(draft("B6101")).id.clone();

        schedule.update(
            &id,
            ScheduledFlightPatch {
                status: Some(ScheduleStatus::Confirmed),
                ..Default::default()
            },
        );

        let flight = schedule.get(&id).expect("added flight");
        assert_eq!(flight.status, ScheduleStatus::Confirmed);
        assert_eq!(flight.flight_number, "B6101");
        assert_eq!(flight.passengers.available, 188);
        assert_eq!(schedule.flights().last().map(|f| f.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn test_delete_selected_flight_clears_selection() {
        let mut schedule = Schedule::new();
        schedule.select("2");

        assert!(schedule.delete("2").is_some());
        assert!(schedule.selected().is_none());
        assert_eq!(schedule.flights().len(), 3);
    }

    #[test]
    fn test_expiry_can_be_removed() {
        let mut schedule = Schedule::new();
        schedule.update(
            "1",
            ScheduledFlightPatch {
                expiry_date: Some(None),
                ..Default::default()
            },
        );
        assert_eq!(schedule.get("1").and_then(|f| f.expiry_date), None);
    }

    #[test]
    fn test_flights_on_respects_weekday_and_period() {
        let schedule = Schedule::new();

        // 2024-03-04 is a Monday: every daily flight plus the Mon/Wed/Fri route.
        let monday: Vec<_> = schedule
            .flights_on(date(2024, 3, 4))
            .iter()
            .map(|f| f.flight_number.as_str())
            .collect();
        assert_eq!(monday, vec!["AA1001", "UA2002", "DL3003", "SW4004"]);

        let tuesday = schedule.flights_on(date(2024, 3, 5));
        assert_eq!(tuesday.len(), 3);

        // Past the seasonal and the yearly expiry dates.
        let next_year = schedule.flights_on(date(2025, 1, 6));
        let numbers: Vec<_> = next_year.iter().map(|f| f.flight_number.as_str()).collect();
        assert_eq!(numbers, vec!["UA2002", "SW4004"]);

        assert!(schedule.flights_on(date(2023, 12, 31)).is_empty());
    }

    #[test]
    fn test_query_filters_by_airline_and_status() {
        let schedule = Schedule::new();
        let query = ScheduleQuery {
            search: String::new(),
            status: Filter::All,
            airline: Filter::Only("Delta Air Lines".to_string()),
        };
        let view = schedule.filtered(&query);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].flight_number, "DL3003");

        let query = ScheduleQuery {
            status: Filter::Only(ScheduleStatus::Scheduled),
            search: "lax".to_string(),
            airline: Filter::All,
        };
        let view = schedule.filtered(&query);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].flight_number, "AA1001");
    }

    #[test]
    fn test_airlines_are_distinct() {
        let mut schedule = Schedule::new();
        schedule.add(ScheduledFlightDraft {
            airline: "United Airlines".to_string(),
            ..draft("UA9")
        });
        assert_eq!(schedule.airlines().len(), 4);
    }

    #[test]
    fn test_stats() {
        let stats = Schedule::new().stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.delayed, 1);
        assert_eq!(stats.cancelled, 0);

        let expected = (142 + 128 + 175 + 134) as f64 / (160 + 150 + 200 + 143) as f64 * 100.0;
        assert!((stats.load_factor - expected).abs() < 1e-9);
    }
}
