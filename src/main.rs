use std::env;
use std::io::{self, Write};

use flight_control::console::{self, Reply};
use flight_control::{Dashboard, DashboardConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = match DashboardConfig::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    let mut dashboard = match Dashboard::new(config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            eprintln!("Failed to start the dashboard: {}", e);
            return;
        }
    };

    match dashboard.restore_session() {
        Ok(Some(user)) => println!("Welcome back, {}", user.name),
        Ok(None) => println!("Not signed in. Use `login <email> <password>`."),
        Err(e) => eprintln!("{}", e),
    }

    if let Err(e) = dashboard.start_updater() {
        eprintln!("Live feed unavailable: {}", e);
    }
    println!("Type `help` for the list of commands.");

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        match console::execute(&mut dashboard, input.trim()) {
            Ok(Reply::Output(text)) if text.is_empty() => {}
            Ok(Reply::Output(text)) => println!("{}", text),
            Ok(Reply::Exit) => break,
            Err(e) => eprintln!("{}", e),
        }
    }

    dashboard.stop_updater();
}
