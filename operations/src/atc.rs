use chrono::{DateTime, Duration, Utc};
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable, Selection};

labelled_enum! {
    pub enum RequestType ("request type") {
        Takeoff => "takeoff",
        Landing => "landing",
        Altitude => "altitude",
        Course => "course",
        General => "general",
    }
}

labelled_enum! {
    pub enum ClearanceStatus ("clearance status") {
        Pending => "pending",
        Approved => "approved",
        Denied => "denied",
        Completed => "completed",
    }
}

labelled_enum! {
    pub enum CommunicationPriority ("communication priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Emergency => "emergency",
    }
}

labelled_enum! {
    pub enum ContactStatus ("contact status") {
        Airborne => "airborne",
        Taxiing => "taxiing",
        Holding => "holding",
        Approach => "approach",
        Departed => "departed",
    }
}

/// One request/response exchange between a flight and a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Communication {
    pub id: String,
    pub flight_number: String,
    pub call_sign: String,
    pub kind: RequestType,
    pub status: ClearanceStatus,
    pub request: String,
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub priority: CommunicationPriority,
    pub controller: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommunicationDraft {
    pub flight_number: String,
    pub call_sign: String,
    pub kind: RequestType,
    pub status: ClearanceStatus,
    pub request: String,
    pub response: Option<String>,
    pub priority: CommunicationPriority,
    pub controller: String,
    pub frequency: String,
}

impl CommunicationDraft {
    /// A pending request, as filed from the clearance form.
    pub fn request(
        flight_number: &str,
        call_sign: &str,
        kind: RequestType,
        request: &str,
        controller: &str,
        frequency: &str,
    ) -> Self {
        CommunicationDraft {
            flight_number: flight_number.to_string(),
            call_sign: call_sign.to_string(),
            kind,
            status: ClearanceStatus::Pending,
            request: request.to_string(),
            response: None,
            priority: CommunicationPriority::Medium,
            controller: controller.to_string(),
            frequency: frequency.to_string(),
        }
    }

    pub fn with_priority(mut self, priority: CommunicationPriority) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunicationPatch {
    pub status: Option<ClearanceStatus>,
    pub response: Option<String>,
    pub priority: Option<CommunicationPriority>,
    pub controller: Option<String>,
    pub frequency: Option<String>,
}

impl Entity for Communication {
    type Draft = CommunicationDraft;
    type Patch = CommunicationPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: CommunicationDraft) -> Self {
        Communication {
            id,
            flight_number: draft.flight_number,
            call_sign: draft.call_sign,
            kind: draft.kind,
            status: draft.status,
            request: draft.request,
            response: draft.response,
            timestamp: Utc::now(),
            priority: draft.priority,
            controller: draft.controller,
            frequency: draft.frequency,
        }
    }

    fn apply(&mut self, patch: CommunicationPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(response) = patch.response {
            self.response = Some(response);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(controller) = patch.controller {
            self.controller = controller;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
    }
}

impl Searchable for Communication {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.flight_number.as_str(),
            self.call_sign.as_str(),
            self.request.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunicationQuery {
    pub search: String,
    pub status: Filter<ClearanceStatus>,
    pub kind: Filter<RequestType>,
}

impl Criteria<Communication> for CommunicationQuery {
    fn matches(&self, communication: &Communication) -> bool {
        communication.matches_term(&self.search)
            && self.status.accepts(&communication.status)
            && self.kind.accepts(&communication.kind)
    }
}

/// An aircraft currently in contact with the facility, keyed by flight
/// number.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightContact {
    pub flight_number: String,
    pub call_sign: String,
    pub aircraft: String,
    pub altitude: u32,
    pub speed: u32,
    pub heading: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub origin: String,
    pub destination: String,
    pub status: ContactStatus,
    pub frequency: String,
    pub last_contact: DateTime<Utc>,
}

/// Air traffic control: the communications log (newest first) and the
/// tracked flight contacts.
#[derive(Debug, Clone)]
pub struct AirTrafficControl {
    communications: EntityStore<Communication>,
    contacts: Vec<FlightContact>,
    selected_contact: Selection,
}

impl Default for AirTrafficControl {
    fn default() -> Self {
        Self::new()
    }
}

impl AirTrafficControl {
    pub fn new() -> Self {
        let now = Utc::now();
        Self::with_records(sample_communications(now), sample_contacts(now))
    }

    pub fn with_records(communications: Vec<Communication>, contacts: Vec<FlightContact>) -> Self {
        AirTrafficControl {
            communications: EntityStore::seeded(communications, InsertOrder::Prepend),
            contacts,
            selected_contact: Selection::new(),
        }
    }

    pub fn communications(&self) -> &[Communication] {
        self.communications.records()
    }

    pub fn get(&self, id: &str) -> Option<&Communication> {
        self.communications.get(id)
    }

    /// Logs a new communication at the head of the log.
    pub fn add_communication(&mut self, draft: CommunicationDraft) -> &Communication {
        self.communications.add(draft)
    }

    pub fn update_communication(&mut self, id: &str, patch: CommunicationPatch) -> bool {
        self.communications.update(id, patch)
    }

    pub fn approve(&mut self, id: &str, response: &str) -> bool {
        self.resolve(id, ClearanceStatus::Approved, response)
    }

    pub fn deny(&mut self, id: &str, response: &str) -> bool {
        self.resolve(id, ClearanceStatus::Denied, response)
    }

    fn resolve(&mut self, id: &str, status: ClearanceStatus, response: &str) -> bool {
        self.update_communication(
            id,
            CommunicationPatch {
                status: Some(status),
                response: Some(response.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn pending(&self) -> Vec<&Communication> {
        self.communications.project(&|communication: &Communication| {
            communication.status == ClearanceStatus::Pending
        })
    }

    pub fn filtered(&self, query: &CommunicationQuery) -> Vec<&Communication> {
        self.communications.project(query)
    }

    pub fn history_for(&self, flight_number: &str) -> Vec<&Communication> {
        self.communications.project(&|communication: &Communication| {
            communication.flight_number.eq_ignore_ascii_case(flight_number)
        })
    }

    pub fn contacts(&self) -> &[FlightContact] {
        &self.contacts
    }

    pub fn contact(&self, flight_number: &str) -> Option<&FlightContact> {
        self.contacts
            .iter()
            .find(|contact| contact.flight_number == flight_number)
    }

    /// Selects a tracked contact. Unknown flight numbers are ignored.
    pub fn select_contact(&mut self, flight_number: &str) -> bool {
        if self.contact(flight_number).is_none() {
            return false;
        }
        self.selected_contact.select(flight_number);
        true
    }

    /// Selects the contact, or deselects it when it already was.
    pub fn toggle_contact(&mut self, flight_number: &str) {
        if self.contact(flight_number).is_some() {
            self.selected_contact.toggle(flight_number);
        }
    }

    pub fn clear_contact_selection(&mut self) {
        self.selected_contact.clear();
    }

    pub fn selected_contact(&self) -> Option<&FlightContact> {
        self.selected_contact
            .selected_id()
            .and_then(|flight_number| self.contact(flight_number))
    }
}

fn logged(id: &str, draft: CommunicationDraft, timestamp: DateTime<Utc>) -> Communication {
    let mut communication = Communication::from_draft(id.to_string(), draft);
    communication.timestamp = timestamp;
    communication
}

pub fn sample_communications(now: DateTime<Utc>) -> Vec<Communication> {
    let mut landing = CommunicationDraft::request(
        "UA456",
        "United 456",
        RequestType::Landing,
        "Request landing clearance, runway 06R",
        "Approach",
        "119.9",
    )
    .with_priority(CommunicationPriority::High);
    landing.status = ClearanceStatus::Approved;
    landing.response = Some("United 456, cleared to land runway 06R, wind 070 at 8".to_string());

    vec![
        logged(
            "1",
            CommunicationDraft::request(
                "AA123",
                "American 123",
                RequestType::Takeoff,
                "Request takeoff clearance, runway 24L",
                "Tower",
                "118.1",
            ),
            now - Duration::minutes(5),
        ),
        logged("2", landing, now - Duration::minutes(10)),
        logged(
            "3",
            CommunicationDraft::request(
                "DL789",
                "Delta 789",
                RequestType::Altitude,
                "Request climb to FL350",
                "Center",
                "124.5",
            ),
            now - Duration::minutes(2),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn contact(
    flight_number: &str,
    call_sign: &str,
    aircraft: &str,
    motion: (u32, u32, u32),
    position: (f64, f64),
    route: (&str, &str),
    status: ContactStatus,
    frequency: &str,
    last_contact: DateTime<Utc>,
) -> FlightContact {
    let (altitude, speed, heading) = motion;
    FlightContact {
        flight_number: flight_number.to_string(),
        call_sign: call_sign.to_string(),
        aircraft: aircraft.to_string(),
        altitude,
        speed,
        heading,
        latitude: position.0,
        longitude: position.1,
        origin: route.0.to_string(),
        destination: route.1.to_string(),
        status,
        frequency: frequency.to_string(),
        last_contact,
    }
}

pub fn sample_contacts(now: DateTime<Utc>) -> Vec<FlightContact> {
    vec![
        contact(
            "AA123",
            "American 123",
            "Boeing 737-800",
            (0, 0, 240),
            (40.6413, -73.7781),
            ("JFK", "LAX"),
            ContactStatus::Taxiing,
            "118.1",
            now - Duration::minutes(5),
        ),
        contact(
            "UA456",
            "United 456",
            "Airbus A320",
            (3500, 180, 60),
            (40.6892, -73.837),
            ("ORD", "JFK"),
            ContactStatus::Approach,
            "119.9",
            now - Duration::minutes(1),
        ),
        contact(
            "DL789",
            "Delta 789",
            "Boeing 757-200",
            (31000, 480, 90),
            (41.2033, -77.2945),
            ("JFK", "ATL"),
            ContactStatus::Airborne,
            "124.5",
            now - Duration::minutes(2),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_communication_goes_first() {
        let mut atc = AirTrafficControl::new();
        let id = atc
            .add_communication(CommunicationDraft::request(
                "SW3456",
                "Southwest 3456",
                RequestType::Course,
                "Request direct PHX",
                "Center",
                "124.5",
            ))
            .id
            .clone();

        assert_eq!(atc.communications()[0].id, id);
        assert_eq!(atc.communications().len(), 4);
        assert_eq!(atc.pending().len(), 3);
    }

    #[test]
    fn test_approve_and_deny() {
        let mut atc = AirTrafficControl::new();
        assert!(atc.approve("1", "American 123, runway 24L, cleared for takeoff"));
        assert!(atc.deny("3", "Delta 789, unable, traffic"));

        let takeoff = atc.get("1").expect("takeoff request");
        assert_eq!(takeoff.status, ClearanceStatus::Approved);
        assert_eq!(
            takeoff.response.as_deref(),
            Some("American 123, runway 24L, cleared for takeoff")
        );
        assert_eq!(atc.get("3").map(|c| c.status), Some(ClearanceStatus::Denied));
        assert!(atc.pending().is_empty());
    }

    #[test]
    fn test_resolving_unknown_id_is_silent() {
        let mut atc = AirTrafficControl::new();
        assert!(!atc.approve("99", "cleared"));
        assert_eq!(atc.pending().len(), 2);
    }

    #[test]
    fn test_update_keeps_request_text() {
        let mut atc = AirTrafficControl::new();
        atc.update_communication(
            "3",
            CommunicationPatch {
                status: Some(ClearanceStatus::Completed),
                ..Default::default()
            },
        );
        let comm = atc.get("3").expect("altitude request");
        assert_eq!(comm.status, ClearanceStatus::Completed);
        assert_eq!(comm.request, "Request climb to FL350");
        assert!(comm.response.is_none());
    }

    #[test]
    fn test_contact_selection() {
        let mut atc = AirTrafficControl::new();
        assert!(atc.selected_contact().is_none());

        assert!(!atc.select_contact("ZZ999"));
        assert!(atc.select_contact("UA456"));
        assert_eq!(atc.selected_contact().map(|c| c.status), Some(ContactStatus::Approach));

        atc.toggle_contact("UA456");
        assert!(atc.selected_contact().is_none());

        atc.toggle_contact("DL789");
        assert_eq!(atc.selected_contact().map(|c| c.altitude), Some(31000));
        atc.clear_contact_selection();
        assert!(atc.selected_contact().is_none());
    }

    #[test]
    fn test_query_and_history() {
        let atc = AirTrafficControl::new();
        let runway_requests = atc.filtered(&CommunicationQuery {
            search: "runway".to_string(),
            status: Filter::Only(ClearanceStatus::Pending),
            kind: Filter::All,
        });
        assert_eq!(runway_requests.len(), 1);
        assert_eq!(runway_requests[0].flight_number, "AA123");
        assert_eq!(atc.history_for("ua456").len(), 1);
    }
}
