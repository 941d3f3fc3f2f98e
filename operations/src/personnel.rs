use chrono::{NaiveDate, Weekday};
use store::{Criteria, Entity, EntityStore, Filter, InsertOrder, Searchable};

labelled_enum! {
    pub enum Role ("role") {
        Admin => "admin",
        Controller => "controller",
        Supervisor => "supervisor",
        Technician => "technician",
        Pilot => "pilot",
        Crew => "crew",
    }
}

labelled_enum! {
    pub enum PersonnelStatus ("personnel status") {
        Active => "active",
        Inactive => "inactive",
        OnLeave => "on-leave",
        Training => "training",
    }
}

labelled_enum! {
    pub enum Shift ("shift") {
        Day => "day",
        Evening => "evening",
        Night => "night",
        Rotating => "rotating",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelMember {
    pub id: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub role: Role,
    pub status: PersonnelStatus,
    pub hire_date: NaiveDate,
    pub certifications: Vec<String>,
    pub shift: Shift,
    pub location: String,
    pub supervisor: String,
    pub avatar: Option<String>,
    pub emergency_contact: EmergencyContact,
    /// Weekdays the member is scheduled to work.
    pub schedule: Vec<Weekday>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelDraft {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub role: Role,
    pub status: PersonnelStatus,
    pub hire_date: NaiveDate,
    pub certifications: Vec<String>,
    pub shift: Shift,
    pub location: String,
    pub supervisor: String,
    pub avatar: Option<String>,
    pub emergency_contact: EmergencyContact,
    pub schedule: Vec<Weekday>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonnelPatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
    pub status: Option<PersonnelStatus>,
    pub certifications: Option<Vec<String>>,
    pub shift: Option<Shift>,
    pub location: Option<String>,
    pub supervisor: Option<String>,
    pub avatar: Option<Option<String>>,
    pub emergency_contact: Option<EmergencyContact>,
    pub schedule: Option<Vec<Weekday>>,
}

impl PersonnelMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }

    pub fn works_on(&self, day: Weekday) -> bool {
        self.schedule.contains(&day)
    }
}

impl Entity for PersonnelMember {
    type Draft = PersonnelDraft;
    type Patch = PersonnelPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: PersonnelDraft) -> Self {
        PersonnelMember {
            id,
            employee_id: draft.employee_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            position: draft.position,
            department: draft.department,
            role: draft.role,
            status: draft.status,
            hire_date: draft.hire_date,
            certifications: draft.certifications,
            shift: draft.shift,
            location: draft.location,
            supervisor: draft.supervisor,
            avatar: draft.avatar,
            emergency_contact: draft.emergency_contact,
            schedule: draft.schedule,
        }
    }

    fn apply(&mut self, patch: PersonnelPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(certifications) = patch.certifications {
            self.certifications = certifications;
        }
        if let Some(shift) = patch.shift {
            self.shift = shift;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(supervisor) = patch.supervisor {
            self.supervisor = supervisor;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(contact) = patch.emergency_contact {
            self.emergency_contact = contact;
        }
        if let Some(schedule) = patch.schedule {
            self.schedule = schedule;
        }
    }
}

impl Searchable for PersonnelMember {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.employee_id.as_str(),
            self.position.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonnelQuery {
    pub search: String,
    pub department: Filter<String>,
    pub role: Filter<Role>,
    pub status: Filter<PersonnelStatus>,
}

impl Criteria<PersonnelMember> for PersonnelQuery {
    fn matches(&self, member: &PersonnelMember) -> bool {
        member.matches_term(&self.search)
            && self.department.accepts(&member.department)
            && self.role.accepts(&member.role)
            && self.status.accepts(&member.status)
    }
}

/// Personnel directory. The first seeded member starts out selected.
#[derive(Debug, Clone)]
pub struct Personnel {
    members: EntityStore<PersonnelMember>,
}

impl Default for Personnel {
    fn default() -> Self {
        Self::new()
    }
}

impl Personnel {
    pub fn new() -> Self {
        let mut personnel = Self::with_members(sample_personnel());
        personnel.select("1");
        personnel
    }

    pub fn with_members(members: Vec<PersonnelMember>) -> Self {
        Personnel {
            members: EntityStore::seeded(members, InsertOrder::Append),
        }
    }

    pub fn members(&self) -> &[PersonnelMember] {
        self.members.records()
    }

    pub fn get(&self, id: &str) -> Option<&PersonnelMember> {
        self.members.get(id)
    }

    pub fn add(&mut self, draft: PersonnelDraft) -> &PersonnelMember {
        self.members.add(draft)
    }

    pub fn update(&mut self, id: &str, patch: PersonnelPatch) -> bool {
        self.members.update(id, patch)
    }

    pub fn delete(&mut self, id: &str) -> Option<PersonnelMember> {
        self.members.delete(id)
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.members.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.members.clear_selection();
    }

    pub fn selected(&self) -> Option<&PersonnelMember> {
        self.members.selected()
    }

    pub fn filtered(&self, query: &PersonnelQuery) -> Vec<&PersonnelMember> {
        self.members.project(query)
    }

    /// Active or training members scheduled on `day`.
    pub fn on_duty(&self, day: Weekday) -> Vec<&PersonnelMember> {
        self.members.project(&|member: &PersonnelMember| {
            matches!(
                member.status,
                PersonnelStatus::Active | PersonnelStatus::Training
            ) && member.works_on(day)
        })
    }

    /// Distinct departments in directory order.
    pub fn departments(&self) -> Vec<&str> {
        let mut departments: Vec<&str> = Vec::new();
        for member in self.members.iter() {
            if !departments.contains(&member.department.as_str()) {
                departments.push(&member.department);
            }
        }
        departments
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn emergency(name: &str, relationship: &str, phone: &str) -> EmergencyContact {
    EmergencyContact {
        name: name.to_string(),
        relationship: relationship.to_string(),
        phone: phone.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    employee_id: &str,
    name: (&str, &str),
    phone: &str,
    position: &str,
    department: &str,
    role: Role,
    status: PersonnelStatus,
    hire_date: NaiveDate,
    certifications: &[&str],
    shift: Shift,
    location: &str,
    supervisor: &str,
    emergency_contact: EmergencyContact,
    schedule: &[Weekday],
) -> PersonnelMember {
    let (first_name, last_name) = name;
    PersonnelMember::from_draft(
        id.to_string(),
        PersonnelDraft {
            employee_id: employee_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!(
                "{}.{}@flightcontrol.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ),
            phone: phone.to_string(),
            position: position.to_string(),
            department: department.to_string(),
            role,
            status,
            hire_date,
            certifications: strings(certifications),
            shift,
            location: location.to_string(),
            supervisor: supervisor.to_string(),
            avatar: None,
            emergency_contact,
            schedule: schedule.to_vec(),
        },
    )
}

pub fn sample_personnel() -> Vec<PersonnelMember> {
    use Weekday::*;

    vec![
        member(
            "1",
            "EMP001",
            ("John", "Smith"),
            "+1 (555) 123-4567",
            "Senior Air Traffic Controller",
            "Air Traffic Control",
            Role::Controller,
            PersonnelStatus::Active,
            date(2020, 3, 15),
            &["ATC License", "Radar Endorsement", "Tower Rating"],
            Shift::Day,
            "Tower",
            "Jane Doe",
            emergency("Mary Smith", "Spouse", "+1 (555) 987-6543"),
            &[Mon, Tue, Wed, Thu, Fri],
        ),
        member(
            "2",
            "EMP002",
            ("Sarah", "Johnson"),
            "+1 (555) 234-5678",
            "ATC Supervisor",
            "Air Traffic Control",
            Role::Supervisor,
            PersonnelStatus::Active,
            date(2018, 7, 22),
            &["ATC License", "Supervisor Rating", "Emergency Procedures"],
            Shift::Rotating,
            "Control Center",
            "Mike Wilson",
            emergency("Robert Johnson", "Father", "+1 (555) 876-5432"),
            &[Mon, Wed, Fri, Sat],
        ),
        member(
            "3",
            "EMP003",
            ("Michael", "Brown"),
            "+1 (555) 345-6789",
            "Radar Technician",
            "Technical Services",
            Role::Technician,
            PersonnelStatus::Active,
            date(2021, 11, 8),
            &["Electronics Certification", "Radar Systems", "Safety Training"],
            Shift::Evening,
            "Equipment Room",
            "Sarah Johnson",
            emergency("Lisa Brown", "Sister", "+1 (555) 765-4321"),
            &[Tue, Wed, Thu, Fri, Sun],
        ),
        member(
            "4",
            "EMP004",
            ("Emily", "Davis"),
            "+1 (555) 456-7890",
            "Flight Data Coordinator",
            "Flight Operations",
            Role::Controller,
            PersonnelStatus::Training,
            date(2024, 1, 15),
            &["Basic ATC Training", "Flight Data Systems"],
            Shift::Day,
            "Operations Center",
            "John Smith",
            emergency("David Davis", "Husband", "+1 (555) 654-3210"),
            &[Mon, Tue, Thu, Fri],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_hire() -> PersonnelDraft {
        PersonnelDraft {
            employee_id: "EMP005".to_string(),
            first_name: "Lucia".to_string(),
            last_name: "Fernandez".to_string(),
            email: "lucia.fernandez@flightcontrol.com".to_string(),
            phone: "+1 (555) 567-8901".to_string(),
            position: "Ground Controller".to_string(),
            department: "Air Traffic Control".to_string(),
            role: Role::Controller,
            status: PersonnelStatus::Training,
            hire_date: date(2024, 3, 1),
            certifications: strings(&["Basic ATC Training"]),
            shift: Shift::Night,
            location: "Tower".to_string(),
            supervisor: "Sarah Johnson".to_string(),
            avatar: None,
            emergency_contact: EmergencyContact::default(),
            schedule: vec![Weekday::Sat, Weekday::Sun],
        }
    }

    #[test]
    fn test_first_member_starts_selected() {
        let personnel = Personnel::new();
        assert_eq!(personnel.selected().map(|m| m.employee_id.as_str()), Some("EMP001"));
    }

    #[test]
    fn test_add_then_update_merges_fields() {
        let mut personnel = Personnel::new();
        let id = personnel.add(new_hire()).id.clone();

        assert!(personnel.update(
            &id,
            PersonnelPatch {
                status: Some(PersonnelStatus::Active),
                shift: Some(Shift::Day),
                ..Default::default()
            },
        ));

        let member = personnel.get(&id).expect("new member");
        assert_eq!(member.status, PersonnelStatus::Active);
        assert_eq!(member.shift, Shift::Day);
        assert_eq!(member.first_name, "Lucia");
        assert_eq!(member.schedule, vec![Weekday::Sat, Weekday::Sun]);
        assert_eq!(personnel.members().last().map(|m| m.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn test_delete_selected_member_clears_selection() {
        let mut personnel = Personnel::new();
        assert!(personnel.delete("1").is_some());
        assert!(personnel.selected().is_none());
        assert!(personnel.delete("1").is_none());
    }

    #[test]
    fn test_delete_other_member_keeps_selection() {
        let mut personnel = Personnel::new();
        personnel.delete("3");
        assert_eq!(personnel.selected().map(|m| m.id.as_str()), Some("1"));
    }

    #[test]
    fn test_query_filters() {
        let personnel = Personnel::new();
        let controllers: Vec<_> = personnel
            .filtered(&PersonnelQuery {
                role: Filter::Only(Role::Controller),
                ..Default::default()
            })
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(controllers, vec!["1", "4"]);

        let atc_active = personnel.filtered(&PersonnelQuery {
            search: "emp00".to_string(),
            department: Filter::Only("Air Traffic Control".to_string()),
            role: Filter::All,
            status: Filter::Only(PersonnelStatus::Active),
        });
        assert_eq!(atc_active.len(), 2);

        let by_position = personnel.filtered(&PersonnelQuery {
            search: "RADAR".to_string(),
            ..Default::default()
        });
        assert_eq!(by_position.len(), 1);
        assert_eq!(by_position[0].last_name, "Brown");
    }

    #[test]
    fn test_search_ignores_email() {
        let personnel = Personnel::new();
        let search = |term: &str| {
            personnel
                .filtered(&PersonnelQuery {
                    search: term.to_string(),
                    ..Default::default()
                })
                .len()
        };

        assert_eq!(search("flightcontrol.com"), 0);
        assert_eq!(search("john.smith@"), 0);
        assert_eq!(search("Smith"), 1);
    }

    #[test]
    fn test_on_duty() {
        let personnel = Personnel::new();
        let sunday: Vec<_> = personnel.on_duty(Weekday::Sun).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(sunday, vec!["3"]);
        assert_eq!(personnel.on_duty(Weekday::Mon).len(), 3);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!("ON-LEAVE".parse::<PersonnelStatus>(), Ok(PersonnelStatus::OnLeave));
        assert_eq!(PersonnelStatus::OnLeave.to_string(), "on-leave");
        assert!("retired".parse::<PersonnelStatus>().is_err());
    }

    #[test]
    fn test_departments_and_initials() {
        let personnel = Personnel::new();
        assert_eq!(
            personnel.departments(),
            vec!["Air Traffic Control", "Technical Services", "Flight Operations"]
        );
        assert_eq!(personnel.get("4").map(|m| m.initials()), Some("ED".to_string()));
    }
}
