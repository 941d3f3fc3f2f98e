use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::generate_id;

use crate::errors::SessionError;

/// Key under which the signed-in user is kept between runs.
pub const SESSION_KEY: &str = "flight-control-user";
/// Password shared by the seeded non-administrator accounts.
pub const DEMO_PASSWORD: &str = "password123";

labelled_enum! {
    pub enum UserRole ("user role") {
        Admin => "admin",
        Controller => "controller",
        Operator => "operator",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub last_login: DateTime<Utc>,
}

/// A single-string persistence slot for the session token.
pub trait SessionSlot: Send {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn store(&mut self, token: &str) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Keeps the token in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        MemorySlot {
            value: Some(token.to_string()),
        }
    }
}

impl SessionSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.value.clone())
    }

    fn store(&mut self, token: &str) -> Result<(), SessionError> {
        self.value = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.value = None;
        Ok(())
    }
}

/// Keeps the token in a file. A missing file is an empty slot.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: &Path) -> Self {
        FileSlot {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSlot for FileSlot {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(token) => Ok(Some(token)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::IoError(e)),
        }
    }

    fn store(&mut self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(SessionError::IoError(e)),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Mock sign-in flow. The signed-in user is serialized into the slot on
/// login or registration and removed on logout.
pub struct Session {
    slot: Box<dyn SessionSlot>,
    accounts: Vec<Account>,
    current: Option<User>,
    delay: Duration,
}

impl Session {
    pub fn new(slot: Box<dyn SessionSlot>, delay: Duration) -> Self {
        Session {
            slot,
            accounts: sample_accounts(),
            current: None,
            delay,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Reads the slot at startup. A token that is not a valid user document
    /// is removed from the slot and reported as [`SessionError::Corrupt`].
    pub fn restore(&mut self) -> Result<Option<&User>, SessionError> {
        let token = match self.slot.load()? {
            Some(token) => token,
            None => return Ok(None),
        };

        match serde_json::from_str::<User>(&token) {
            Ok(user) => {
                self.current = Some(user);
                Ok(self.current.as_ref())
            }
            Err(e) => {
                self.slot.clear()?;
                Err(SessionError::Corrupt(e))
            }
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, SessionError> {
        self.wait();

        let mut user = self
            .accounts
            .iter()
            .find(|account| account.user.email == email && account.password == password)
            .map(|account| account.user.clone())
            .ok_or(SessionError::InvalidCredentials)?;
        user.last_login = Utc::now();

        self.sign_in(user)
    }

    /// Creates an operator account and signs it in.
    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<&User, SessionError> {
        self.wait();

        if self.accounts.iter().any(|account| account.user.email == email) {
            return Err(SessionError::UserExists(email.to_string()));
        }

        let user = User {
            id: generate_id(),
            email: email.to_string(),
            name: name.to_string(),
            role: UserRole::Operator,
            avatar: None,
            last_login: Utc::now(),
        };
        self.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });

        self.sign_in(user)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.slot.clear()
    }

    fn sign_in(&mut self, user: User) -> Result<&User, SessionError> {
        self.slot.store(&serde_json::to_string(&user)?)?;
        Ok(&*self.current.insert(user))
    }

    fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

fn account(id: &str, email: &str, name: &str, role: UserRole, password: &str) -> Account {
    Account {
        user: User {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            avatar: Some("/placeholder.svg?height=32&width=32".to_string()),
            last_login: Utc::now(),
        },
        password: password.to_string(),
    }
}

fn sample_accounts() -> Vec<Account> {
    vec![
        account(
            "1",
            "admin@flightcontrol.com",
            "Flight Control Admin",
            UserRole::Admin,
            crate::profile::DEFAULT_PASSWORD,
        ),
        account(
            "2",
            "controller@flightcontrol.com",
            "Air Traffic Controller",
            UserRole::Controller,
            DEMO_PASSWORD,
        ),
        account(
            "3",
            "operator@flightcontrol.com",
            "Flight Operator",
            UserRole::Operator,
            DEMO_PASSWORD,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn session() -> Session {
        Session::new(Box::new(MemorySlot::new()), Duration::ZERO)
    }

    #[test]
    fn test_admin_login() {
        let mut session = session();
        let user = session
            .login("admin@flightcontrol.com", "admin123")
            .expect("admin login");
        assert_eq!(user.role, UserRole::Admin);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_demo_accounts_use_shared_password() {
        let mut session = session();
        assert!(session.login("controller@flightcontrol.com", DEMO_PASSWORD).is_ok());
        assert!(matches!(
            session.login("controller@flightcontrol.com", "admin123"),
            Err(SessionError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_invalid_credentials() {
        let mut session = session();
        let error = session.login("nobody@flightcontrol.com", "admin123").unwrap_err();
        assert_eq!(error.to_string(), "Invalid email or password");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_register_rejects_existing_email() {
        let mut session = session();
        assert!(matches!(
            session.register("operator@flightcontrol.com", "whatever", "Dup"),
            Err(SessionError::UserExists(_))
        ));

        let user = session
            .register("new@flightcontrol.com", "secret-pass", "New Operator")
            .expect("registration")
            .clone();
        assert_eq!(user.role, UserRole::Operator);

        session.logout().expect("logout");
        assert!(session.login("new@flightcontrol.com", "secret-pass").is_ok());
    }

    #[test]
    fn test_token_survives_restart_until_logout() {
        let path = env::temp_dir().join(format!("flight-control-session-{}.json", std::process::id()));

        let mut first = Session::new(Box::new(FileSlot::new(&path)), Duration::ZERO);
        let email = first
            .login("operator@flightcontrol.com", DEMO_PASSWORD)
            .expect("login")
            .email
            .clone();

        let mut second = Session::new(Box::new(FileSlot::new(&path)), Duration::ZERO);
        let restored = second.restore().expect("restore").map(|u| u.email.clone());
        assert_eq!(restored, Some(email));

        second.logout().expect("logout");
        let mut third = Session::new(Box::new(FileSlot::new(&path)), Duration::ZERO);
        assert!(third.restore().expect("restore").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_token_is_cleared() {
        let mut session = Session::new(Box::new(MemorySlot::with_token("{broken")), Duration::ZERO);
        assert!(matches!(session.restore(), Err(SessionError::Corrupt(_))));
        assert!(!session.is_authenticated());
        assert!(session.restore().expect("empty slot").is_none());
    }
}
