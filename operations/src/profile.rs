use std::thread;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ProfileError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;
/// Password of the seeded administrator profile.
pub const DEFAULT_PASSWORD: &str = "admin123";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactChannels {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    pub desktop: bool,
}

impl Default for ContactChannels {
    fn default() -> Self {
        ContactChannels {
            email: true,
            sms: false,
            push: true,
            desktop: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPreferences {
    pub default_view: String,
    pub refresh_rate: u32,
    pub compact_mode: bool,
    pub show_tutorials: bool,
}

impl Default for DashboardPreferences {
    fn default() -> Self {
        DashboardPreferences {
            default_view: "overview".to_string(),
            refresh_rate: 30,
            compact_mode: false,
            show_tutorials: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub date: NaiveDateTime,
    pub location: String,
    pub device: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityQuestion {
    pub question: String,
    pub answer: String,
}

fn login(day: u32, hour: u32, minute: u32) -> LoginRecord {
    LoginRecord {
        date: date(2024, 1, day).and_hms_opt(hour, minute, 0).unwrap_or_default(),
        location: "San Francisco, CA".to_string(),
        device: "Chrome on Windows".to_string(),
        success: true,
    }
}

fn question(text: &str) -> SecurityQuestion {
    SecurityQuestion {
        question: text.to_string(),
        answer: "Encrypted Answer".to_string(),
    }
}

section! {
    pub struct PersonalInfo / PersonalInfoPatch {
        first_name: String = "Flight Control".to_string(),
        last_name: String = "Admin".to_string(),
        email: String = "admin@flightcontrol.com".to_string(),
        phone: String = "+1 (555) 123-4567".to_string(),
        date_of_birth: NaiveDate = date(1985, 6, 15),
        address: String = "123 Airport Blvd".to_string(),
        city: String = "Aviation City".to_string(),
        state: String = "CA".to_string(),
        zip_code: String = "90210".to_string(),
        country: String = "United States".to_string(),
    }
}

section! {
    pub struct Professional / ProfessionalPatch {
        employee_id: String = "FC001".to_string(),
        department: String = "Air Traffic Control".to_string(),
        position: String = "Senior Controller".to_string(),
        hire_date: NaiveDate = date(2020, 1, 15),
        supervisor: String = "John Smith".to_string(),
        work_location: String = "Control Tower".to_string(),
        shift_schedule: String = "Day Shift (06:00-14:00)".to_string(),
        certifications: Vec<String> = strings(&[
            "ATC License",
            "Radar Endorsement",
            "Tower Rating",
            "Approach Control",
        ]),
        license_number: String = "ATC-123456".to_string(),
        license_expiry: NaiveDate = date(2025, 12, 31),
    }
}

section! {
    pub struct Preferences / PreferencesPatch {
        language: String = "en".to_string(),
        timezone: String = "UTC".to_string(),
        date_format: String = "MM/DD/YYYY".to_string(),
        time_format: String = "24h".to_string(),
        notifications: ContactChannels = ContactChannels::default(),
        dashboard: DashboardPreferences = DashboardPreferences::default(),
    }
}

section! {
    pub struct AccountSecurity / AccountSecurityPatch {
        two_factor_enabled: bool = false,
        last_password_change: NaiveDate = date(2024, 1, 15),
        /// Most recent first.
        login_history: Vec<LoginRecord> = vec![login(25, 9, 30), login(24, 8, 15), login(23, 9, 45)],
        security_questions: Vec<SecurityQuestion> = vec![
            question("What was the name of your first pet?"),
            question("What city were you born in?"),
        ],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub personal_info: PersonalInfo,
    pub professional: Professional,
    pub preferences: Preferences,
    pub security: AccountSecurity,
}

/// A partial update of one profile section.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfilePatch {
    PersonalInfo(PersonalInfoPatch),
    Professional(ProfessionalPatch),
    Preferences(PreferencesPatch),
    Security(AccountSecurityPatch),
}

/// The signed-in operator's profile and the account operations behind the
/// profile forms. Each account operation waits `delay` before checking the
/// credentials, standing in for a round trip to an account service.
#[derive(Debug, Clone)]
pub struct Profile {
    profile: UserProfile,
    password: String,
    avatar: Option<String>,
    delay: Duration,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Profile {
    pub fn new(delay: Duration) -> Self {
        Profile {
            profile: UserProfile::default(),
            password: DEFAULT_PASSWORD.to_string(),
            avatar: None,
            delay,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.profile.personal_info.first_name, self.profile.personal_info.last_name
        )
    }

    pub fn update(&mut self, patch: ProfilePatch) {
        match patch {
            ProfilePatch::PersonalInfo(p) => self.profile.personal_info.merge(p),
            ProfilePatch::Professional(p) => self.profile.professional.merge(p),
            ProfilePatch::Preferences(p) => self.profile.preferences.merge(p),
            ProfilePatch::Security(p) => self.profile.security.merge(p),
        }
    }

    /// Validates the form, then checks the current password. On success
    /// the new password is in effect and the change date is today.
    pub fn change_password(
        &mut self,
        current: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), ProfileError> {
        if new_password != confirmation {
            return Err(ProfileError::PasswordMismatch);
        }
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ProfileError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }

        self.wait();
        if current != self.password {
            return Err(ProfileError::IncorrectCurrentPassword);
        }

        self.password = new_password.to_string();
        self.profile.security.last_password_change = Utc::now().date_naive();
        Ok(())
    }

    /// Accepts an avatar image of at most [`MAX_AVATAR_BYTES`] and returns
    /// the location it is served from.
    pub fn upload_avatar(&mut self, file_name: &str, size_bytes: u64) -> Result<String, ProfileError> {
        self.wait();
        if size_bytes > MAX_AVATAR_BYTES {
            return Err(ProfileError::FileTooLarge(MAX_AVATAR_BYTES));
        }

        let url = format!("/avatars/{}/{}", self.profile.professional.employee_id, file_name);
        self.avatar = Some(url.clone());
        Ok(url)
    }

    pub fn delete_account(&self, password: &str) -> Result<(), ProfileError> {
        self.wait();
        if password != self.password {
            return Err(ProfileError::IncorrectPassword);
        }
        Ok(())
    }

    /// Prepends an entry to the login history.
    pub fn record_login(&mut self, location: &str, device: &str, success: bool) {
        self.profile.security.login_history.insert(
            0,
            LoginRecord {
                date: Utc::now().naive_utc(),
                location: location.to_string(),
                device: device.to_string(),
                success,
            },
        );
    }

    fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
