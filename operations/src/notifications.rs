use chrono::{DateTime, Duration, Utc};
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable};

labelled_enum! {
    pub enum NotificationType ("notification type") {
        Emergency => "emergency",
        Weather => "weather",
        Delay => "delay",
        Security => "security",
        Maintenance => "maintenance",
        Info => "info",
    }
}

labelled_enum! {
    /// Ordered from least to most urgent.
    #[derive(PartialOrd, Ord)]
    pub enum Priority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationType,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub flight_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub acknowledged: bool,
}

/// A notification as raised by its producer. Identity, timestamp and the
/// read/acknowledged flags are assigned by the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationType,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub flight_number: Option<String>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationType, priority: Priority, title: &str, message: &str) -> Self {
        NotificationDraft {
            kind,
            priority,
            title: title.to_string(),
            message: message.to_string(),
            flight_number: None,
        }
    }

    pub fn for_flight(mut self, flight_number: &str) -> Self {
        self.flight_number = Some(flight_number.to_string());
        self
    }
}

/// The only transitions a notification accepts. Acknowledging always marks
/// the notification read as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationMark {
    Read,
    Acknowledged,
}

impl Entity for Notification {
    type Draft = NotificationDraft;
    type Patch = NotificationMark;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NotificationDraft) -> Self {
        Notification {
            id,
            kind: draft.kind,
            priority: draft.priority,
            title: draft.title,
            message: draft.message,
            flight_number: draft.flight_number,
            timestamp: Utc::now(),
            read: false,
            acknowledged: false,
        }
    }

    fn apply(&mut self, mark: NotificationMark) {
        match mark {
            NotificationMark::Read => self.read = true,
            NotificationMark::Acknowledged => {
                self.read = true;
                self.acknowledged = true;
            }
        }
    }
}

impl Searchable for Notification {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.message.as_str()];
        if let Some(flight) = &self.flight_number {
            fields.push(flight);
        }
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationQuery {
    pub search: String,
    pub kind: Filter<NotificationType>,
    pub priority: Filter<Priority>,
    pub unread_only: bool,
}

impl Criteria<Notification> for NotificationQuery {
    fn matches(&self, notification: &Notification) -> bool {
        notification.matches_term(&self.search)
            && self.kind.accepts(&notification.kind)
            && self.priority.accepts(&notification.priority)
            && (!self.unread_only || !notification.read)
    }
}

/// Notification/alert channel. Most recent notifications come first.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    notifications: EntityStore<Notification>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::with_notifications(sample_notifications(Utc::now()))
    }

    pub fn with_notifications(notifications: Vec<Notification>) -> Self {
        NotificationChannel {
            notifications: EntityStore::seeded(notifications, InsertOrder::Prepend),
        }
    }

    pub fn empty() -> Self {
        Self::with_notifications(Vec::new())
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.records()
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.get(id)
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Prepends a new unread, unacknowledged notification.
    pub fn add(&mut self, draft: NotificationDraft) -> &Notification {
        self.notifications.add(draft)
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        self.notifications.update(id, NotificationMark::Read)
    }

    /// Marks the notification acknowledged and read in one step.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        self.notifications.update(id, NotificationMark::Acknowledged)
    }

    pub fn mark_all_read(&mut self) {
        self.notifications
            .modify_all(|notification| notification.apply(NotificationMark::Read));
    }

    pub fn clear(&mut self, id: &str) -> Option<Notification> {
        self.notifications.delete(id)
    }

    pub fn clear_all(&mut self) {
        self.notifications.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    /// Critical notifications still waiting for an explicit acknowledgement.
    pub fn critical_unacknowledged(&self) -> Vec<&Notification> {
        self.notifications.project(&|notification: &Notification| {
            notification.priority == Priority::Critical && !notification.acknowledged
        })
    }

    pub fn high_unread(&self) -> Vec<&Notification> {
        self.notifications.project(&|notification: &Notification| {
            notification.priority == Priority::High && !notification.read
        })
    }

    pub fn filtered(&self, query: &NotificationQuery) -> Vec<&Notification> {
        self.notifications.project(query)
    }
}

fn seeded(
    id: &str,
    draft: NotificationDraft,
    timestamp: DateTime<Utc>,
    handled: bool,
) -> Notification {
    let mut notification = Notification::from_draft(id.to_string(), draft);
    notification.timestamp = timestamp;
    if handled {
        notification.apply(NotificationMark::Acknowledged);
    }
    notification
}

/// The sample notifications, timestamped relative to `now`.
pub fn sample_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    use NotificationType::*;

    vec![
        seeded(
            "1",
            NotificationDraft::new(
                Emergency,
                Priority::Critical,
                "Emergency Landing",
                "Flight UA1234 requesting emergency landing due to engine failure",
            )
            .for_flight("UA1234"),
            now - Duration::minutes(5),
            false,
        ),
        seeded(
            "2",
            NotificationDraft::new(
                Weather,
                Priority::High,
                "Severe Weather Alert",
                "Thunderstorms approaching JFK Airport. Expect delays.",
            ),
            now - Duration::minutes(15),
            false,
        ),
        seeded(
            "3",
            NotificationDraft::new(
                Delay,
                Priority::Medium,
                "Flight Delay",
                "AA5678 delayed by 45 minutes due to air traffic congestion",
            )
            .for_flight("AA5678"),
            now - Duration::minutes(30),
            true,
        ),
        seeded(
            "4",
            NotificationDraft::new(
                Security,
                Priority::High,
                "Security Alert",
                "Unattended baggage reported at Gate B12",
            ),
            now - Duration::minutes(45),
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_prepends_unread_notification() {
        let mut channel = NotificationChannel::new();
        let before = channel.unread_count();

        let id = channel
            .add(NotificationDraft::new(NotificationType::Weather, Priority::High, "X", "Y"))
            .id
            .clone();

        assert_eq!(channel.unread_count(), before + 1);
        let first = &channel.notifications()[0];
        assert_eq!(first.id, id);
        assert!(!first.read);
        assert!(!first.acknowledged);
    }

    #[test]
    fn test_acknowledge_implies_read() {
        let mut channel = NotificationChannel::new();
        for id in ["1", "2", "3", "4"] {
            assert!(channel.acknowledge(id));
            let notification = channel.get(id).expect("seeded notification");
            assert!(notification.read && notification.acknowledged);
        }
        assert_eq!(channel.unread_count(), 0);
    }

    #[test]
    fn test_read_does_not_acknowledge() {
        let mut channel = NotificationChannel::new();
        channel.mark_read("1");
        let notification = channel.get("1").expect("seeded notification");
        assert!(notification.read);
        assert!(!notification.acknowledged);
        assert_eq!(channel.critical_unacknowledged().len(), 1);

        channel.acknowledge("1");
        assert!(channel.critical_unacknowledged().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_silent() {
        let mut channel = NotificationChannel::new();
        assert!(!channel.mark_read("nope"));
        assert!(!channel.acknowledge("nope"));
        assert!(channel.clear("nope").is_none());
        assert_eq!(channel.len(), 4);
    }

    #[test]
    fn test_clear_and_clear_all() {
        let mut channel = NotificationChannel::new();
        assert!(channel.clear("2").is_some());
        assert_eq!(channel.high_unread().len(), 1);

        channel.clear_all();
        assert!(channel.is_empty());
        assert_eq!(channel.unread_count(), 0);
    }

    #[test]
    fn test_mark_all_read() {
        let mut channel = NotificationChannel::new();
        channel.mark_all_read();
        assert_eq!(channel.unread_count(), 0);
        assert_eq!(channel.critical_unacknowledged().len(), 1);
    }

    #[test]
    fn test_query() {
        let channel = NotificationChannel::new();
        let flights: Vec<_> = channel
            .filtered(&NotificationQuery {
                search: "ua1234".to_string(),
                ..Default::default()
            })
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(flights, vec!["1"]);

        let unread_high = channel.filtered(&NotificationQuery {
            priority: Filter::Only(Priority::High),
            unread_only: true,
            ..Default::default()
        });
        assert_eq!(unread_high.len(), 2);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::Low < Priority::Medium);
    }
}
