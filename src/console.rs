use std::fmt::{Display, Write as _};
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use operations::airports::{AirportQuery, AirportStatus, GateStatus, RunwayStatus};
use operations::atc::CommunicationQuery;
use operations::fleet::FleetQuery;
use operations::live_flights::{FlightStatus, LiveFlight, LiveFlightQuery};
use operations::notifications::{Notification, NotificationQuery};
use operations::personnel::PersonnelQuery;
use operations::schedule::ScheduleQuery;
use operations::settings::SettingsCategory;
use store::Filter;

use crate::dashboard::{Dashboard, UpdaterState};
use crate::errors::DashboardError;

pub const HELP: &str = "\
Live flights
  flights [term] [--status <s|all>]  list live flights
  flight <id>                        select a flight and show it
  set-status <id> <status>           change a flight status
  stats                              summary counters
Schedule, fleet, airports, personnel (listings take [--status <s|all>])
  schedule [term] | schedule-on <yyyy-mm-dd>
  fleet [term] | maintenance <aircraft-id> | due <yyyy-mm-dd> | delete-aircraft <id>
  airports [term] | airport-status <id> <status>
  runway <airport-id> <runway-id> <status> | gate <airport-id> <gate-id> <status>
  personnel [term] | on-duty <weekday>
Notifications
  alerts [unread] | read <id> | ack <id> | read-all | dismiss <id> | clear-alerts
Air traffic control
  atc [term] | approve <id> <response> | deny <id> <response> | contact <flight-number>
Settings and account
  export-settings [dir] | import-settings <file> | reset-settings [category]
  login <email> <password> | register <email> <password> <name> | logout | whoami
  passwd <current> <new> <confirm>
Live feed
  start | pause | resume | stop
  help | exit";

/// Result of a console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Output(String),
    Exit,
}

/// Parses and runs one console line against the dashboard.
///
/// # Returns
/// The text to print, or [`Reply::Exit`] when the session should end.
pub fn execute(dashboard: &mut Dashboard, line: &str) -> Result<Reply, DashboardError> {
    let args: Vec<&str> = line.split_whitespace().collect();
    let command = match args.first() {
        Some(command) => command.to_lowercase(),
        None => return Ok(Reply::Output(String::new())),
    };
    let rest = &args[1..];

    let output = match command.as_str() {
        "help" => HELP.to_string(),
        "exit" | "quit" => return Ok(Reply::Exit),

        "flights" => {
            let (term, status) = listing_args(rest)?;
            list_flights(dashboard, &LiveFlightQuery::search(&term).with_status(status))?
        }
        "flight" => {
            let id = arg(rest, 0, "flight <id>")?;
            let mut flights = dashboard.live_flights_mut()?;
            if !flights.select(id) {
                return Err(not_found("flight", id));
            }
            match flights.selected() {
                Some(flight) => describe_flight(flight),
                None => String::new(),
            }
        }
        "set-status" => {
            let id = arg(rest, 0, "set-status <id> <status>")?;
            let status: FlightStatus = parse(&tail(rest, 1, "set-status <id> <status>")?)?;
            if !dashboard.live_flights_mut()?.update_status(id, status) {
                return Err(not_found("flight", id));
            }
            dashboard.log_info(&format!("Flight {} set to {}", id, status));
            format!("Flight {} is now {}", id, status)
        }
        "stats" => stats(dashboard)?,

        "schedule" => {
            let (search, status) = listing_args(rest)?;
            let query = ScheduleQuery {
                search,
                status,
                ..Default::default()
            };
            table(dashboard.schedule.filtered(&query), |f| {
                format!(
                    "{:<4} {:<8} {:<22} {}->{} {:<10} {}",
                    f.id, f.flight_number, f.airline, f.departure.code, f.arrival.code, f.status, f.frequency
                )
            })
        }
        "schedule-on" => {
            let date: NaiveDate = parse(arg(rest, 0, "schedule-on <yyyy-mm-dd>")?)?;
            table(dashboard.schedule.flights_on(date), |f| {
                format!("{:<8} {} {}->{}", f.flight_number, f.departure.time, f.departure.code, f.arrival.code)
            })
        }

        "fleet" => {
            let (search, status) = listing_args(rest)?;
            let query = FleetQuery {
                search,
                status,
                ..Default::default()
            };
            table(dashboard.fleet.filtered(&query), |a| {
                format!(
                    "{:<4} {:<8} {:<18} {:<12} {:<20} next maintenance {}",
                    a.id, a.registration, a.model, a.status, a.location, a.next_maintenance
                )
            })
        }
        "maintenance" => {
            let id = arg(rest, 0, "maintenance <aircraft-id>")?;
            table(dashboard.fleet.maintenance_for(id), |m| {
                format!("{:<4} {:<12} {:<12} {:<8} {}", m.id, m.kind, m.status, m.priority, m.description)
            })
        }
        "due" => {
            let date: NaiveDate = parse(arg(rest, 0, "due <yyyy-mm-dd>")?)?;
            table(dashboard.fleet.maintenance_due(date), |a| {
                format!("{:<8} {:<18} due {}", a.registration, a.model, a.next_maintenance)
            })
        }
        "delete-aircraft" => {
            let id = arg(rest, 0, "delete-aircraft <id>")?;
            if dashboard.fleet.get(id).is_none() {
                return Err(not_found("aircraft", id));
            }
            let removed = dashboard.fleet.delete_aircraft(id);
            dashboard.log_info(&format!(
                "Deleted aircraft {} and {} maintenance record(s)",
                id, removed
            ));
            format!("Aircraft {} deleted with {} maintenance record(s)", id, removed)
        }

        "airports" => {
            let (search, status) = listing_args(rest)?;
            let query = AirportQuery {
                search,
                status,
                ..Default::default()
            };
            table(dashboard.airports.filtered(&query), |a| {
                format!(
                    "{:<4} {:<4} {:<40} {:<12} gates {:.0}% busy",
                    a.id,
                    a.code,
                    a.name,
                    a.status,
                    a.gate_utilization()
                )
            })
        }
        "airport-status" => {
            let id = arg(rest, 0, "airport-status <id> <status>")?;
            let status: AirportStatus = parse(arg(rest, 1, "airport-status <id> <status>")?)?;
            if !dashboard.airports.update_status(id, status) {
                return Err(not_found("airport", id));
            }
            dashboard.log_info(&format!("Airport {} set to {}", id, status));
            format!("Airport {} is now {}", id, status)
        }
        "runway" => {
            let usage = "runway <airport-id> <runway-id> <status>";
            let (airport, runway) = (arg(rest, 0, usage)?, arg(rest, 1, usage)?);
            let status: RunwayStatus = parse(arg(rest, 2, usage)?)?;
            if !dashboard.airports.update_runway_status(airport, runway, status) {
                return Err(not_found("runway", runway));
            }
            dashboard.log_info(&format!("Runway {} at {} set to {}", runway, airport, status));
            format!("Runway {} is now {}", runway, status)
        }
        "gate" => {
            let usage = "gate <airport-id> <gate-id> <status>";
            let (airport, gate) = (arg(rest, 0, usage)?, arg(rest, 1, usage)?);
            let status: GateStatus = parse(arg(rest, 2, usage)?)?;
            if !dashboard.airports.update_gate_status(airport, gate, status) {
                return Err(not_found("gate", gate));
            }
            dashboard.log_info(&format!("Gate {} at {} set to {}", gate, airport, status));
            format!("Gate {} is now {}", gate, status)
        }

        "personnel" => {
            let (search, status) = listing_args(rest)?;
            let query = PersonnelQuery {
                search,
                status,
                ..Default::default()
            };
            table(dashboard.personnel.filtered(&query), |p| {
                format!(
                    "{:<4} {:<8} {:<20} {:<28} {:<10} {}",
                    p.id,
                    p.employee_id,
                    p.full_name(),
                    p.position,
                    p.status,
                    p.shift
                )
            })
        }
        "on-duty" => {
            let day: Weekday = arg(rest, 0, "on-duty <weekday>")?
                .parse()
                .map_err(|_| DashboardError::InvalidInput(format!("not a weekday: {}", rest[0])))?;
            table(dashboard.personnel.on_duty(day), |p| {
                format!("{:<20} {:<28} {}", p.full_name(), p.position, p.shift)
            })
        }

        "alerts" => {
            let query = NotificationQuery {
                unread_only: rest.first().is_some_and(|a| a.eq_ignore_ascii_case("unread")),
                ..Default::default()
            };
            let channel = dashboard.notifications()?;
            let mut out = format!("{} unread\n", channel.unread_count());
            out.push_str(&table(channel.filtered(&query), describe_notification));
            out
        }
        "read" | "ack" | "dismiss" => {
            let id = arg(rest, 0, "read|ack|dismiss <id>")?;
            let mut channel = dashboard.notifications_mut()?;
            let found = match command.as_str() {
                "read" => channel.mark_read(id),
                "ack" => channel.acknowledge(id),
                _ => channel.clear(id).is_some(),
            };
            if !found {
                return Err(not_found("notification", id));
            }
            format!("{} unread", channel.unread_count())
        }
        "read-all" => {
            dashboard.notifications_mut()?.mark_all_read();
            "All notifications read".to_string()
        }
        "clear-alerts" => {
            dashboard.notifications_mut()?.clear_all();
            dashboard.log_info("Notifications cleared");
            "All notifications cleared".to_string()
        }

        "atc" => {
            let query = CommunicationQuery {
                search: rest.join(" "),
                ..Default::default()
            };
            let mut out = table(dashboard.atc.filtered(&query), |c| {
                format!(
                    "{:<4} {:<8} {:<12} {:<10} {:<8} {}",
                    c.id, c.flight_number, c.kind, c.status, c.priority, c.request
                )
            });
            if let Some(contact) = dashboard.atc.selected_contact() {
                let _ = write!(
                    out,
                    "\nTracking {} ({}) {} ft {} kts on {}",
                    contact.flight_number, contact.call_sign, contact.altitude, contact.speed, contact.frequency
                );
            }
            out
        }
        "approve" | "deny" => {
            let id = arg(rest, 0, "approve|deny <id> <response>")?;
            let response = tail(rest, 1, "approve|deny <id> <response>")?;
            let (done, outcome) = if command == "approve" {
                (dashboard.atc.approve(id, &response), "approved")
            } else {
                (dashboard.atc.deny(id, &response), "denied")
            };
            if !done {
                return Err(not_found("communication", id));
            }
            dashboard.log_info(&format!("Communication {} {}: {}", id, outcome, response));
            format!("Communication {} {}", id, outcome)
        }
        "contact" => {
            let flight_number = arg(rest, 0, "contact <flight-number>")?;
            if dashboard.atc.contact(flight_number).is_none() {
                return Err(not_found("contact", flight_number));
            }
            dashboard.atc.toggle_contact(flight_number);
            match dashboard.atc.selected_contact() {
                Some(contact) => format!("Tracking {}", contact.flight_number),
                None => "No contact selected".to_string(),
            }
        }

        "export-settings" => {
            let dir = rest.first().copied().unwrap_or(".");
            let path = dashboard.settings.export_to(Path::new(dir))?;
            dashboard.log_info(&format!("Settings exported to {}", path.display()));
            format!("Settings exported to {}", path.display())
        }
        "import-settings" => {
            let file = arg(rest, 0, "import-settings <file>")?;
            let categories = dashboard.settings.import_from(Path::new(file))?;
            let names: Vec<&str> = categories.iter().map(SettingsCategory::as_str).collect();
            dashboard.log_info(&format!("Settings imported from {}", file));
            format!("Imported {}", names.join(", "))
        }
        "reset-settings" => {
            let category: Option<SettingsCategory> = match rest.first() {
                Some(name) => Some(parse(name)?),
                None => None,
            };
            dashboard.settings.reset(category);
            match category {
                Some(category) => format!("{} settings reset", category),
                None => "All settings reset".to_string(),
            }
        }

        "login" => {
            let usage = "login <email> <password>";
            let user = dashboard.login(arg(rest, 0, usage)?, arg(rest, 1, usage)?)?;
            format!("Welcome, {} ({})", user.name, user.role)
        }
        "register" => {
            let usage = "register <email> <password> <name>";
            let (email, password) = (arg(rest, 0, usage)?, arg(rest, 1, usage)?);
            let user = dashboard.register(email, password, &tail(rest, 2, usage)?)?;
            format!("Welcome, {} ({})", user.name, user.role)
        }
        "logout" => {
            dashboard.logout()?;
            "Signed out".to_string()
        }
        "whoami" => match dashboard.current_user() {
            Some(user) => format!("{} <{}> {}", user.name, user.email, user.role),
            None => "Not signed in".to_string(),
        },
        "passwd" => {
            let usage = "passwd <current> <new> <confirm>";
            dashboard.require_user()?;
            dashboard.profile.change_password(
                arg(rest, 0, usage)?,
                arg(rest, 1, usage)?,
                arg(rest, 2, usage)?,
            )?;
            dashboard.log_info("Password changed");
            "Password changed".to_string()
        }

        "start" => {
            dashboard.start_updater()?;
            "Live feed running".to_string()
        }
        "pause" | "resume" => {
            let done = if command == "pause" {
                dashboard.pause_updater()
            } else {
                dashboard.resume_updater()
            };
            if !done {
                return Err(DashboardError::InvalidInput("the live feed is not running".to_string()));
            }
            format!("Live feed {}", describe_state(dashboard.updater_state()))
        }
        "stop" => {
            dashboard.stop_updater();
            "Live feed stopped".to_string()
        }

        other => return Err(DashboardError::InvalidInput(format!("unknown command: {}", other))),
    };

    Ok(Reply::Output(output))
}

fn list_flights(dashboard: &Dashboard, query: &LiveFlightQuery) -> Result<String, DashboardError> {
    let flights = dashboard.live_flights()?;
    let selected = flights.selected().map(|flight| flight.id.clone());
    Ok(table(flights.filtered(query), |f| {
        let marker = if selected.as_deref() == Some(f.id.as_str()) { '*' } else { ' ' };
        format!(
            "{}{:<3} {:<8} {:<20} {}->{} {:<12} {:>5.1}% fuel {:>5.1}%",
            marker, f.id, f.flight_number, f.airline, f.departure.code, f.arrival.code, f.status, f.progress, f.fuel
        )
    }))
}

fn stats(dashboard: &Dashboard) -> Result<String, DashboardError> {
    let live = dashboard.live_flights()?.stats();
    let schedule = dashboard.schedule.stats();
    let fleet = dashboard.fleet.stats(Utc::now().year());
    let unread = dashboard.notifications()?.unread_count();

    Ok(format!(
        "Live: {} flights, {} airborne, {} delayed, {} low on fuel, {} passengers, {:.1}% average progress\n\
         Schedule: {} flights, {} confirmed, {} delayed, {} cancelled, {:.1}% load factor\n\
         Fleet: {} aircraft, {} active, {} in maintenance, {} grounded, {:.1} years average age\n\
         Notifications: {} unread\n\
         Live feed: {}",
        live.total,
        live.airborne,
        live.delayed,
        live.low_fuel,
        live.passengers,
        live.average_progress,
        schedule.total,
        schedule.confirmed,
        schedule.delayed,
        schedule.cancelled,
        schedule.load_factor,
        fleet.total,
        fleet.active,
        fleet.maintenance,
        fleet.grounded,
        fleet.average_age,
        unread,
        describe_state(dashboard.updater_state()),
    ))
}

fn describe_flight(flight: &LiveFlight) -> String {
    format!(
        "{} {} ({})\n{} {} -> {} {}\nStatus {}, {:.1}% complete, ETA {}, delay {} min\n\
         Position {:.3}, {:.3} at {:.0} ft, {:.0} kts, heading {:.0}\nFuel {:.1}%, {} passengers, {} crew",
        flight.flight_number,
        flight.airline,
        flight.aircraft,
        flight.departure.code,
        flight.departure.time,
        flight.arrival.code,
        flight.arrival.time,
        flight.status,
        flight.progress,
        flight.estimated_arrival,
        flight.delay,
        flight.position.latitude,
        flight.position.longitude,
        flight.position.altitude,
        flight.position.speed,
        flight.position.heading,
        flight.fuel,
        flight.passengers,
        flight.crew
    )
}

fn describe_notification(notification: &Notification) -> String {
    let flag = match (notification.read, notification.acknowledged) {
        (_, true) => "ack ",
        (true, false) => "read",
        (false, false) => "new ",
    };
    format!(
        "{:<4} [{}] {:<8} {:<12} {}: {}",
        notification.id,
        flag,
        notification.priority,
        notification.kind,
        notification.title,
        notification.message
    )
}

fn describe_state(state: UpdaterState) -> &'static str {
    match state {
        UpdaterState::Stopped => "stopped",
        UpdaterState::Running => "running",
        UpdaterState::Paused => "paused",
    }
}

fn table<T>(rows: Vec<&T>, line: impl Fn(&T) -> String) -> String {
    if rows.is_empty() {
        return "No results".to_string();
    }
    rows.into_iter().map(line).collect::<Vec<_>>().join("\n")
}

fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, DashboardError> {
    args.get(index)
        .copied()
        .ok_or_else(|| DashboardError::InvalidInput(format!("usage: {}", usage)))
}

/// Splits a listing's arguments into the search term and an optional
/// `--status <label>` filter; the label may span several words.
fn listing_args<V>(args: &[&str]) -> Result<(String, Filter<V>), DashboardError>
where
    V: FromStr,
    V::Err: Display,
{
    match args.iter().position(|a| a.eq_ignore_ascii_case("--status")) {
        None => Ok((args.join(" "), Filter::All)),
        Some(at) => {
            let label = tail(args, at + 1, "--status <status|all>")?;
            Ok((args[..at].join(" "), parse(&label)?))
        }
    }
}

/// The arguments from `index` on, joined back with single spaces.
fn tail(args: &[&str], index: usize, usage: &str) -> Result<String, DashboardError> {
    arg(args, index, usage)?;
    Ok(args[index..].join(" "))
}

fn parse<T>(value: &str) -> Result<T, DashboardError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e: T::Err| DashboardError::InvalidInput(e.to_string()))
}

fn not_found(kind: &str, id: &str) -> DashboardError {
    DashboardError::InvalidInput(format!("no {} with id {}", kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use operations::session::MemorySlot;
    use std::env;

    fn dashboard(name: &str) -> Dashboard {
        let config = DashboardConfig {
            log_dir: env::temp_dir().join(format!("flight-control-console-{}-{}", name, std::process::id())),
            simulated_delay_ms: 0,
            ..DashboardConfig::default()
        };
        Dashboard::with_session_slot(config, Box::new(MemorySlot::new())).expect("dashboard")
    }

    fn output(dashboard: &mut Dashboard, line: &str) -> String {
        match execute(dashboard, line).expect(line) {
            Reply::Output(text) => text,
            Reply::Exit => panic!("{} exited", line),
        }
    }

    #[test]
    fn test_exit_and_blank_lines() {
        let mut dashboard = dashboard("exit");
        assert_eq!(execute(&mut dashboard, "   ").expect("blank"), Reply::Output(String::new()));
        assert_eq!(execute(&mut dashboard, "QUIT").expect("quit"), Reply::Exit);
    }

    #[test]
    fn test_flight_search_and_selection() {
        let mut dashboard = dashboard("flights");
        let listing = output(&mut dashboard, "flights jfk");
        assert!(listing.contains("AA1234"));
        assert!(output(&mut dashboard, "flights nothing-like-this").contains("No results"));

        assert!(output(&mut dashboard, "flight 1").contains("AA1234"));
        assert!(output(&mut dashboard, "flights").contains("*1"));
        assert!(matches!(
            execute(&mut dashboard, "flight 99"),
            Err(DashboardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_set_status_accepts_multi_word_labels() {
        let mut dashboard = dashboard("status");
        output(&mut dashboard, "set-status 2 en route");
        let status = dashboard.live_flights().expect("flights").get("2").map(|f| f.status);
        assert_eq!(status, Some(FlightStatus::EnRoute));
        assert!(execute(&mut dashboard, "set-status 2 hovering").is_err());
    }

    #[test]
    fn test_listings_filter_by_status() {
        let mut dashboard = dashboard("listing-status");
        let en_route = output(&mut dashboard, "flights --status en route");
        assert!(en_route.contains("AA1234"));
        assert!(!en_route.contains("UA5678"));
        assert!(output(&mut dashboard, "flights ua --status ALL").contains("UA5678"));
        assert!(output(&mut dashboard, "flights jfk --status delayed").contains("No results"));

        let in_maintenance = output(&mut dashboard, "fleet --status maintenance");
        assert!(in_maintenance.contains("N456UA"));
        assert_eq!(in_maintenance.lines().count(), 1);

        for line in ["flights --status hovering", "fleet --status", "personnel --status on-leave-forever"] {
            assert!(
                matches!(execute(&mut dashboard, line), Err(DashboardError::InvalidInput(_))),
                "{}",
                line
            );
        }
    }

    #[test]
    fn test_acknowledge_updates_unread_count() {
        let mut dashboard = dashboard("alerts");
        let (id, unread) = {
            let channel = dashboard.notifications().expect("notifications");
            let first = channel
                .notifications()
                .iter()
                .find(|n| !n.read)
                .map(|n| n.id.clone())
                .expect("an unread notification");
            (first, channel.unread_count())
        };

        let reply = output(&mut dashboard, &format!("ack {}", id));
        assert_eq!(reply, format!("{} unread", unread - 1));
        let channel = dashboard.notifications().expect("notifications");
        let notification = channel.get(&id).expect("still there");
        assert!(notification.read && notification.acknowledged);
    }

    #[test]
    fn test_unknown_command() {
        let mut dashboard = dashboard("unknown");
        assert!(matches!(
            execute(&mut dashboard, "launch"),
            Err(DashboardError::InvalidInput(_))
        ));
        assert!(matches!(
            execute(&mut dashboard, "runway 1"),
            Err(DashboardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_password_change_requires_sign_in() {
        let mut dashboard = dashboard("passwd");
        assert!(matches!(
            execute(&mut dashboard, "passwd admin123 newpassword newpassword"),
            Err(DashboardError::SessionError(_))
        ));

        output(&mut dashboard, "login admin@flightcontrol.com admin123");
        assert!(matches!(
            execute(&mut dashboard, "passwd admin123 short short"),
            Err(DashboardError::ProfileError(_))
        ));
        assert_eq!(
            output(&mut dashboard, "passwd admin123 newpassword newpassword"),
            "Password changed"
        );
    }
}
