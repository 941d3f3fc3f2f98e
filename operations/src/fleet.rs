use chrono::NaiveDate;
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable};

labelled_enum! {
    pub enum AircraftType ("aircraft type") {
        Commercial => "Commercial",
        Cargo => "Cargo",
        Private => "Private",
    }
}

labelled_enum! {
    pub enum AircraftStatus ("aircraft status") {
        Active => "Active",
        Maintenance => "Maintenance",
        Grounded => "Grounded",
        Retired => "Retired",
    }
}

labelled_enum! {
    pub enum MaintenanceKind ("maintenance type") {
        Scheduled => "Scheduled",
        Unscheduled => "Unscheduled",
        Inspection => "Inspection",
        Repair => "Repair",
    }
}

labelled_enum! {
    pub enum MaintenanceStatus ("maintenance status") {
        Completed => "Completed",
        InProgress => "In Progress",
        Scheduled => "Scheduled",
    }
}

labelled_enum! {
    pub enum MaintenancePriority ("maintenance priority") {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

/// An airframe of the fleet, identified by its registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    pub id: String,
    pub registration: String,
    pub model: String,
    pub manufacturer: String,
    pub kind: AircraftType,
    pub capacity: u32,
    pub status: AircraftStatus,
    pub location: String,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub flight_hours: u32,
    pub cycles: u32,
    pub year_manufactured: i32,
    pub owner: String,
    pub operator: String,
    pub engines: String,
    /// Nautical miles.
    pub max_range: u32,
    /// Knots.
    pub cruise_speed: u32,
    /// Gallons.
    pub fuel_capacity: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AircraftDraft {
    pub registration: String,
    pub model: String,
    pub manufacturer: String,
    pub kind: AircraftType,
    pub capacity: u32,
    pub status: AircraftStatus,
    pub location: String,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub flight_hours: u32,
    pub cycles: u32,
    pub year_manufactured: i32,
    pub owner: String,
    pub operator: String,
    pub engines: String,
    pub max_range: u32,
    pub cruise_speed: u32,
    pub fuel_capacity: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AircraftPatch {
    pub status: Option<AircraftStatus>,
    pub location: Option<String>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub flight_hours: Option<u32>,
    pub cycles: Option<u32>,
    pub operator: Option<String>,
    pub capacity: Option<u32>,
    pub notes: Option<Option<String>>,
}

impl Entity for Aircraft {
    type Draft = AircraftDraft;
    type Patch = AircraftPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: AircraftDraft) -> Self {
        Aircraft {
            id,
            registration: draft.registration,
            model: draft.model,
            manufacturer: draft.manufacturer,
            kind: draft.kind,
            capacity: draft.capacity,
            status: draft.status,
            location: draft.location,
            last_maintenance: draft.last_maintenance,
            next_maintenance: draft.next_maintenance,
            flight_hours: draft.flight_hours,
            cycles: draft.cycles,
            year_manufactured: draft.year_manufactured,
            owner: draft.owner,
            operator: draft.operator,
            engines: draft.engines,
            max_range: draft.max_range,
            cruise_speed: draft.cruise_speed,
            fuel_capacity: draft.fuel_capacity,
            notes: draft.notes,
        }
    }

    fn apply(&mut self, patch: AircraftPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(date) = patch.last_maintenance {
            self.last_maintenance = date;
        }
        if let Some(date) = patch.next_maintenance {
            self.next_maintenance = date;
        }
        if let Some(hours) = patch.flight_hours {
            self.flight_hours = hours;
        }
        if let Some(cycles) = patch.cycles {
            self.cycles = cycles;
        }
        if let Some(operator) = patch.operator {
            self.operator = operator;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

impl Searchable for Aircraft {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.registration.as_str(),
            self.model.as_str(),
            self.manufacturer.as_str(),
            self.location.as_str(),
        ]
    }
}

/// A maintenance entry, owned by the aircraft whose id it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRecord {
    pub id: String,
    pub aircraft_id: String,
    pub kind: MaintenanceKind,
    pub description: String,
    pub date: NaiveDate,
    /// Hours.
    pub duration: u32,
    pub cost: f64,
    pub technician: String,
    pub status: MaintenanceStatus,
    pub priority: MaintenancePriority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceDraft {
    pub aircraft_id: String,
    pub kind: MaintenanceKind,
    pub description: String,
    pub date: NaiveDate,
    pub duration: u32,
    pub cost: f64,
    pub technician: String,
    pub status: MaintenanceStatus,
    pub priority: MaintenancePriority,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenancePatch {
    pub status: Option<MaintenanceStatus>,
    pub duration: Option<u32>,
    pub cost: Option<f64>,
    pub technician: Option<String>,
}

impl Entity for MaintenanceRecord {
    type Draft = MaintenanceDraft;
    type Patch = MaintenancePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: MaintenanceDraft) -> Self {
        MaintenanceRecord {
            id,
            aircraft_id: draft.aircraft_id,
            kind: draft.kind,
            description: draft.description,
            date: draft.date,
            duration: draft.duration,
            cost: draft.cost,
            technician: draft.technician,
            status: draft.status,
            priority: draft.priority,
        }
    }

    fn apply(&mut self, patch: MaintenancePatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(technician) = patch.technician {
            self.technician = technician;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetQuery {
    pub search: String,
    pub status: Filter<AircraftStatus>,
    pub kind: Filter<AircraftType>,
}

impl Criteria<Aircraft> for FleetQuery {
    fn matches(&self, aircraft: &Aircraft) -> bool {
        aircraft.matches_term(&self.search)
            && self.status.accepts(&aircraft.status)
            && self.kind.accepts(&aircraft.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetStats {
    pub total: usize,
    pub active: usize,
    pub maintenance: usize,
    pub grounded: usize,
    /// Years, rounded to one decimal.
    pub average_age: f64,
    pub total_flight_hours: u64,
}

/// Fleet domain: aircraft and the maintenance records that belong to them.
#[derive(Debug, Clone)]
pub struct Fleet {
    aircraft: EntityStore<Aircraft>,
    maintenance: EntityStore<MaintenanceRecord>,
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

impl Fleet {
    pub fn new() -> Self {
        Self::with_records(sample_aircraft(), sample_maintenance())
    }

    pub fn with_records(aircraft: Vec<Aircraft>, maintenance: Vec<MaintenanceRecord>) -> Self {
        Fleet {
            aircraft: EntityStore::seeded(aircraft, InsertOrder::Append),
            maintenance: EntityStore::seeded(maintenance, InsertOrder::Append),
        }
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        self.aircraft.records()
    }

    pub fn maintenance_records(&self) -> &[MaintenanceRecord] {
        self.maintenance.records()
    }

    pub fn get(&self, id: &str) -> Option<&Aircraft> {
        self.aircraft.get(id)
    }

    pub fn add_aircraft(&mut self, draft: AircraftDraft) -> &Aircraft {
        self.aircraft.add(draft)
    }

    pub fn update_aircraft(&mut self, id: &str, patch: AircraftPatch) -> bool {
        self.aircraft.update(id, patch)
    }

    /// Deletes the aircraft and then every maintenance record referencing
    /// it. Returns the number of maintenance records removed.
    pub fn delete_aircraft(&mut self, id: &str) -> usize {
        self.aircraft.delete(id);
        self.maintenance.retain(|record| record.aircraft_id != id)
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.aircraft.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.aircraft.clear_selection();
    }

    pub fn selected(&self) -> Option<&Aircraft> {
        self.aircraft.selected()
    }

    pub fn add_maintenance(&mut self, draft: MaintenanceDraft) -> &MaintenanceRecord {
        self.maintenance.add(draft)
    }

    pub fn update_maintenance(&mut self, id: &str, patch: MaintenancePatch) -> bool {
        self.maintenance.update(id, patch)
    }

    pub fn maintenance_for(&self, aircraft_id: &str) -> Vec<&MaintenanceRecord> {
        self.maintenance
            .project(&|record: &MaintenanceRecord| record.aircraft_id == aircraft_id)
    }

    pub fn filtered(&self, query: &FleetQuery) -> Vec<&Aircraft> {
        self.aircraft.project(query)
    }

    /// Aircraft whose next maintenance is due on or before `date`.
    pub fn maintenance_due(&self, date: NaiveDate) -> Vec<&Aircraft> {
        self.aircraft.project(&|aircraft: &Aircraft| {
            aircraft.status != AircraftStatus::Retired && aircraft.next_maintenance <= date
        })
    }

    pub fn stats(&self, current_year: i32) -> FleetStats {
        let count = |status: AircraftStatus| {
            self.aircraft
                .iter()
                .filter(|aircraft| aircraft.status == status)
                .count()
        };
        let total = self.aircraft.len();
        let average_age = if total == 0 {
            0.0
        } else {
            let years: i32 = self
                .aircraft
                .iter()
                .map(|aircraft| current_year - aircraft.year_manufactured)
                .sum();
            (years as f64 / total as f64 * 10.0).round() / 10.0
        };

        FleetStats {
            total,
            active: count(AircraftStatus::Active),
            maintenance: count(AircraftStatus::Maintenance),
            grounded: count(AircraftStatus::Grounded),
            average_age,
            total_flight_hours: self
                .aircraft
                .iter()
                .map(|aircraft| aircraft.flight_hours as u64)
                .sum(),
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn airframe(
    id: &str,
    registration: &str,
    model: &str,
    manufacturer: &str,
    kind: AircraftType,
    capacity: u32,
    status: AircraftStatus,
    location: &str,
    maintenance: (NaiveDate, NaiveDate),
    usage: (u32, u32),
    year_manufactured: i32,
    carrier: &str,
    engines: &str,
    performance: (u32, u32, u32),
    notes: &str,
) -> Aircraft {
    let (max_range, cruise_speed, fuel_capacity) = performance;
    Aircraft::from_draft(
        id.to_string(),
        AircraftDraft {
            registration: registration.to_string(),
            model: model.to_string(),
            manufacturer: manufacturer.to_string(),
            kind,
            capacity,
            status,
            location: location.to_string(),
            last_maintenance: maintenance.0,
            next_maintenance: maintenance.1,
            flight_hours: usage.0,
            cycles: usage.1,
            year_manufactured,
            owner: carrier.to_string(),
            operator: carrier.to_string(),
            engines: engines.to_string(),
            max_range,
            cruise_speed,
            fuel_capacity,
            notes: Some(notes.to_string()),
        },
    )
}

pub fn sample_aircraft() -> Vec<Aircraft> {
    use AircraftStatus::*;
    use AircraftType::*;

    vec![
        airframe(
            "1",
            "N123AA",
            "Boeing 737-800",
            "Boeing",
            Commercial,
            162,
            Active,
            "JFK Airport",
            (date(2024, 1, 15), date(2024, 4, 15)),
            (45230, 28450),
            2018,
            "American Airlines",
            "CFM56-7B",
            (3383, 453, 6875),
            "Recently upgraded avionics",
        ),
        airframe(
            "2",
            "N456UA",
            "Airbus A320",
            "Airbus",
            Commercial,
            150,
            Maintenance,
            "ORD Maintenance Hangar",
            (date(2024, 1, 20), date(2024, 2, 20)),
            (38920, 24680),
            2019,
            "United Airlines",
            "V2500",
            (3300, 447, 6400),
            "Engine inspection in progress",
        ),
        airframe(
            "3",
            "N789DL",
            "Boeing 757-200",
            "Boeing",
            Commercial,
            200,
            Active,
            "ATL Airport",
            (date(2024, 1, 10), date(2024, 3, 10)),
            (67890, 42350),
            2015,
            "Delta Air Lines",
            "RB211-535E4",
            (4488, 459, 11276),
            "High utilization aircraft",
        ),
        airframe(
            "4",
            "N321SW",
            "Boeing 737-700",
            "Boeing",
            Commercial,
            143,
            Grounded,
            "DAL Maintenance Base",
            (date(2024, 1, 5), date(2024, 2, 5)),
            (52340, 35670),
            2016,
            "Southwest Airlines",
            "CFM56-7B",
            (3010, 453, 6875),
            "Awaiting parts for repair",
        ),
        airframe(
            "5",
            "N555FX",
            "Boeing 767-300F",
            "Boeing",
            Cargo,
            0,
            Active,
            "MEM Airport",
            (date(2024, 1, 12), date(2024, 4, 12)),
            (41250, 18920),
            2017,
            "FedEx",
            "CF6-80C2",
            (6025, 459, 16700),
            "Cargo conversion completed 2020",
        ),
    ]
}

pub fn sample_maintenance() -> Vec<MaintenanceRecord> {
    vec![
        MaintenanceRecord {
            id: "1".to_string(),
            aircraft_id: "1".to_string(),
            kind: MaintenanceKind::Scheduled,
            description: "A-Check maintenance".to_string(),
            date: date(2024, 1, 15),
            duration: 8,
            cost: 25000.0,
            technician: "John Smith".to_string(),
            status: MaintenanceStatus::Completed,
            priority: MaintenancePriority::Medium,
        },
        MaintenanceRecord {
            id: "2".to_string(),
            aircraft_id: "2".to_string(),
            kind: MaintenanceKind::Unscheduled,
            description: "Engine inspection".to_string(),
            date: date(2024, 1, 20),
            duration: 24,
            cost: 45000.0,
            technician: "Mike Johnson".to_string(),
            status: MaintenanceStatus::InProgress,
            priority: MaintenancePriority::High,
        },
        MaintenanceRecord {
            id: "3".to_string(),
            aircraft_id: "3".to_string(),
            kind: MaintenanceKind::Inspection,
            description: "Annual inspection".to_string(),
            date: date(2024, 1, 10),
            duration: 16,
            cost: 35000.0,
            technician: "Sarah Wilson".to_string(),
            status: MaintenanceStatus::Completed,
            priority: MaintenancePriority::Medium,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repair_for(aircraft_id: &str) -> MaintenanceDraft {
        MaintenanceDraft {
            aircraft_id: aircraft_id.to_string(),
            kind: MaintenanceKind::Repair,
            description: "Hydraulic pump replacement".to_string(),
            date: date(2024, 2, 1),
            duration: 12,
            cost: 18000.0,
            technician: "Ana Torres".to_string(),
            status: MaintenanceStatus::Scheduled,
            priority: MaintenancePriority::High,
        }
    }

    #[test]
    fn test_delete_cascades_to_maintenance_records() {
        let mut fleet = Fleet::new();
        fleet.add_maintenance(repair_for("3"));
        assert_eq!(fleet.maintenance_for("3").len(), 2);

        let removed = fleet.delete_aircraft("3");

        assert_eq!(removed, 2);
        assert!(fleet.get("3").is_none());
        assert!(fleet.maintenance_for("3").is_empty());
        assert_eq!(fleet.maintenance_records().len(), 2);
    }

    #[test]
    fn test_delete_clears_selected_aircraft() {
        let mut fleet = Fleet::new();
        fleet.select("4");
        fleet.delete_aircraft("4");
        assert!(fleet.selected().is_none());
    }

    #[test]
    fn test_delete_unknown_aircraft_is_silent() {
        let mut fleet = Fleet::new();
        assert_eq!(fleet.delete_aircraft("99"), 0);
        assert_eq!(fleet.aircraft().len(), 5);
        assert_eq!(fleet.maintenance_records().len(), 3);
    }

    #[test]
    fn test_update_keeps_untouched_fields() {
        let mut fleet = Fleet::new();
        fleet.update_aircraft(
            "4",
            AircraftPatch {
                status: Some(AircraftStatus::Active),
                location: Some("DAL Airport".to_string()),
                ..Default::default()
            },
        );

        let aircraft = fleet.get("4").expect("aircraft 4");
        assert_eq!(aircraft.status, AircraftStatus::Active);
        assert_eq!(aircraft.location, "DAL Airport");
        assert_eq!(aircraft.registration, "N321SW");
        assert_eq!(aircraft.flight_hours, 52340);
    }

    #[test]
    fn test_query_by_type_and_search() {
        let fleet = Fleet::new();
        let cargo = fleet.filtered(&FleetQuery {
            kind: Filter::Only(AircraftType::Cargo),
            ..Default::default()
        });
        assert_eq!(cargo.len(), 1);
        assert_eq!(cargo[0].registration, "N555FX");

        let boeing_active = fleet.filtered(&FleetQuery {
            search: "737".to_string(),
            status: Filter::Only(AircraftStatus::Active),
            kind: Filter::All,
        });
        assert_eq!(boeing_active.len(), 1);
        assert_eq!(boeing_active[0].id, "1");
    }

    #[test]
    fn test_search_covers_manufacturer_but_not_operator() {
        let mut aircraft = sample_aircraft();
        aircraft.push(airframe(
            "6",
            "N600RP",
            "E175",
            "Embraer",
            AircraftType::Commercial,
            76,
            AircraftStatus::Active,
            "BOS Airport",
            (date(2024, 1, 2), date(2024, 4, 2)),
            (12000, 9000),
            2021,
            "Republic Airways",
            "CF34-8E",
            (2200, 447, 2800),
            "",
        ));
        let fleet = Fleet::with_records(aircraft, Vec::new());
        let search = |term: &str| {
            fleet
                .filtered(&FleetQuery {
                    search: term.to_string(),
                    ..Default::default()
                })
                .iter()
                .map(|a| a.id.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(search("embraer"), vec!["6"]);
        assert!(search("Republic").is_empty());
        assert!(search("FedEx").is_empty());
    }

    #[test]
    fn test_maintenance_due() {
        let fleet = Fleet::new();
        let due: Vec<_> = fleet
            .maintenance_due(date(2024, 2, 28))
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(due, vec!["2", "4"]);
    }

    #[test]
    fn test_stats() {
        let stats = Fleet::new().stats(2024);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.maintenance, 1);
        assert_eq!(stats.grounded, 1);
        // Ages 6, 5, 9, 8, 7.
        assert_eq!(stats.average_age, 7.0);
        assert_eq!(stats.total_flight_hours, 45230 + 38920 + 67890 + 52340 + 41250);
    }

    #[test]
    fn test_stats_of_empty_fleet() {
        let stats = Fleet::with_records(Vec::new(), Vec::new()).stats(2024);
        assert_eq!(stats, FleetStats::default());
    }
}
