use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// Name of the file written by [`Settings::export_to`].
pub const EXPORT_FILE_NAME: &str = "flightcontrol-settings.json";

labelled_enum! {
    pub enum Theme ("theme") {
        Light => "light",
        Dark => "dark",
        System => "system",
    }
}

labelled_enum! {
    pub enum NotificationFrequency ("notification frequency") {
        Immediate => "immediate",
        Hourly => "hourly",
        Daily => "daily",
    }
}

labelled_enum! {
    pub enum DefaultView ("view") {
        Table => "table",
        Grid => "grid",
        Map => "map",
    }
}

labelled_enum! {
    pub enum BackupFrequency ("backup frequency") {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

labelled_enum! {
    pub enum SettingsCategory ("settings category") {
        General => "general",
        Notifications => "notifications",
        Security => "security",
        Display => "display",
        Communication => "communication",
        Backup => "backup",
    }
}

section! {
    pub struct GeneralSettings / GeneralPatch {
        system_name: String = "FlightControl Dashboard".to_string(),
        timezone: String = "UTC".to_string(),
        date_format: String = "MM/DD/YYYY".to_string(),
        time_format: String = "24h".to_string(),
        language: String = "en".to_string(),
        theme: Theme = Theme::System,
    }
}

section! {
    pub struct NotificationSettings / NotificationSettingsPatch {
        email_notifications: bool = true,
        push_notifications: bool = true,
        sms_notifications: bool = false,
        alert_sounds: bool = true,
        notification_frequency: NotificationFrequency = NotificationFrequency::Immediate,
        critical_alerts_only: bool = false,
    }
}

section! {
    pub struct SecuritySettings / SecurityPatch {
        /// Minutes.
        session_timeout: u32 = 30,
        /// Days.
        password_expiry: u32 = 90,
        two_factor_auth: bool = false,
        login_attempts: u32 = 5,
        ip_whitelist: Vec<String> = Vec::new(),
        audit_logging: bool = true,
    }
}

section! {
    pub struct DisplaySettings / DisplayPatch {
        /// Seconds.
        refresh_rate: u32 = 30,
        auto_refresh: bool = true,
        compact_mode: bool = false,
        show_grid: bool = true,
        default_view: DefaultView = DefaultView::Table,
        items_per_page: u32 = 25,
    }
}

section! {
    pub struct CommunicationSettings / CommunicationSettingsPatch {
        default_frequency: String = "118.1".to_string(),
        emergency_frequency: String = "121.5".to_string(),
        backup_frequency: String = "119.9".to_string(),
        record_communications: bool = true,
        auto_transcription: bool = false,
        voice_alerts: bool = true,
    }
}

section! {
    pub struct BackupSettings / BackupPatch {
        auto_backup: bool = true,
        backup_frequency: BackupFrequency = BackupFrequency::Daily,
        /// Days.
        retention_period: u32 = 30,
        backup_location: String = "/backups".to_string(),
        encrypt_backups: bool = true,
    }
}

/// The full settings document, as exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub general: GeneralSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
    pub display: DisplaySettings,
    pub communication: CommunicationSettings,
    pub backup: BackupSettings,
}

/// A partial update of exactly one category.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsPatch {
    General(GeneralPatch),
    Notifications(NotificationSettingsPatch),
    Security(SecurityPatch),
    Display(DisplayPatch),
    Communication(CommunicationSettingsPatch),
    Backup(BackupPatch),
}

impl SettingsPatch {
    pub fn category(&self) -> SettingsCategory {
        match self {
            SettingsPatch::General(_) => SettingsCategory::General,
            SettingsPatch::Notifications(_) => SettingsCategory::Notifications,
            SettingsPatch::Security(_) => SettingsCategory::Security,
            SettingsPatch::Display(_) => SettingsCategory::Display,
            SettingsPatch::Communication(_) => SettingsCategory::Communication,
            SettingsPatch::Backup(_) => SettingsCategory::Backup,
        }
    }
}

/// An imported document: any category may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsImport {
    general: Option<GeneralSettings>,
    notifications: Option<NotificationSettings>,
    security: Option<SecuritySettings>,
    display: Option<DisplaySettings>,
    communication: Option<CommunicationSettings>,
    backup: Option<BackupSettings>,
}

/// Holds the current system settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    current: SystemSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &SystemSettings {
        &self.current
    }

    /// Merges the given fields into their category. Other categories and
    /// fields left as `None` keep their value.
    pub fn update(&mut self, patch: SettingsPatch) {
        match patch {
            SettingsPatch::General(p) => self.current.general.merge(p),
            SettingsPatch::Notifications(p) => self.current.notifications.merge(p),
            SettingsPatch::Security(p) => self.current.security.merge(p),
            SettingsPatch::Display(p) => self.current.display.merge(p),
            SettingsPatch::Communication(p) => self.current.communication.merge(p),
            SettingsPatch::Backup(p) => self.current.backup.merge(p),
        }
    }

    /// Restores the defaults of one category, or of everything when no
    /// category is given.
    pub fn reset(&mut self, category: Option<SettingsCategory>) {
        let defaults = SystemSettings::default();
        match category {
            None => self.current = defaults,
            Some(SettingsCategory::General) => self.current.general = defaults.general,
            Some(SettingsCategory::Notifications) => {
                self.current.notifications = defaults.notifications
            }
            Some(SettingsCategory::Security) => self.current.security = defaults.security,
            Some(SettingsCategory::Display) => self.current.display = defaults.display,
            Some(SettingsCategory::Communication) => {
                self.current.communication = defaults.communication
            }
            Some(SettingsCategory::Backup) => self.current.backup = defaults.backup,
        }
    }

    pub fn export_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(&self.current)?)
    }

    /// Writes the exported document as [`EXPORT_FILE_NAME`] inside `dir`
    /// and returns the path of the written file.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, SettingsError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        fs::write(&path, self.export_json()?)?;
        Ok(path)
    }

    /// Shallow merge of an exported document: every category present in
    /// `json` replaces the current one, missing categories are kept. Returns
    /// the categories that were replaced.
    pub fn import_json(&mut self, json: &str) -> Result<Vec<SettingsCategory>, SettingsError> {
        let import: SettingsImport = serde_json::from_str(json)?;
        let mut replaced = Vec::new();

        if let Some(general) = import.general {
            self.current.general = general;
            replaced.push(SettingsCategory::General);
        }
        if let Some(notifications) = import.notifications {
            self.current.notifications = notifications;
            replaced.push(SettingsCategory::Notifications);
        }
        if let Some(security) = import.security {
            self.current.security = security;
            replaced.push(SettingsCategory::Security);
        }
        if let Some(display) = import.display {
            self.current.display = display;
            replaced.push(SettingsCategory::Display);
        }
        if let Some(communication) = import.communication {
            self.current.communication = communication;
            replaced.push(SettingsCategory::Communication);
        }
        if let Some(backup) = import.backup {
            self.current.backup = backup;
            replaced.push(SettingsCategory::Backup);
        }

        Ok(replaced)
    }

    pub fn import_from(&mut self, path: &Path) -> Result<Vec<SettingsCategory>, SettingsError> {
        let json = fs::read_to_string(path)?;
        self.import_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        let current = settings.current();
        assert_eq!(current.general.system_name, "FlightControl Dashboard");
        assert_eq!(current.general.theme, Theme::System);
        assert_eq!(current.security.session_timeout, 30);
        assert_eq!(current.communication.emergency_frequency, "121.5");
        assert_eq!(current.backup.backup_frequency, BackupFrequency::Daily);
    }

    #[test]
    fn test_update_merges_one_category() {
        let mut settings = Settings::new();
        settings.update(SettingsPatch::Display(DisplayPatch {
            compact_mode: Some(true),
            items_per_page: Some(50),
            ..Default::default()
        }));

        let display = &settings.current().display;
        assert!(display.compact_mode);
        assert_eq!(display.items_per_page, 50);
        assert_eq!(display.refresh_rate, 30);
        assert_eq!(settings.current().general, GeneralSettings::default());
    }

    #[test]
    fn test_reset_one_category_or_all() {
        let mut settings = Settings::new();
        settings.update(SettingsPatch::Security(SecurityPatch {
            two_factor_auth: Some(true),
            ..Default::default()
        }));
        settings.update(SettingsPatch::General(GeneralPatch {
            theme: Some(Theme::Dark),
            ..Default::default()
        }));

        settings.reset(Some(SettingsCategory::Security));
        assert!(!settings.current().security.two_factor_auth);
        assert_eq!(settings.current().general.theme, Theme::Dark);

        settings.reset(None);
        assert_eq!(settings.current(), &SystemSettings::default());
    }

    #[test]
    fn test_export_uses_camel_case_keys() {
        let json = Settings::new().export_json().expect("export");
        assert!(json.contains("\"systemName\": \"FlightControl Dashboard\""));
        assert!(json.contains("\"ipWhitelist\": []"));
        assert!(json.contains("\"defaultView\": \"table\""));
    }

    #[test]
    fn test_import_replaces_present_categories_only() {
        let mut settings = Settings::new();
        settings.update(SettingsPatch::Backup(BackupPatch {
            retention_period: Some(7),
            ..Default::default()
        }));

        let replaced = settings
            .import_json(r#"{"general": {"systemName": "Ops Center", "theme": "dark"}}"#)
            .expect("import");

        assert_eq!(replaced, vec![SettingsCategory::General]);
        assert_eq!(settings.current().general.system_name, "Ops Center");
        assert_eq!(settings.current().general.theme, Theme::Dark);
        assert_eq!(settings.current().general.timezone, "UTC");
        assert_eq!(settings.current().backup.retention_period, 7);
    }

    #[test]
    fn test_malformed_import_is_an_error() {
        let mut settings = Settings::new();
        assert!(matches!(
            settings.import_json("{not json"),
            Err(SettingsError::Json(_))
        ));
        assert!(settings
            .import_json(r#"{"display": {"defaultView": "radar"}}"#)
            .is_err());
        assert_eq!(settings, Settings::new());
    }

    #[test]
    fn test_export_to_file_and_import_back() {
        let dir = env::temp_dir().join(format!("flight-control-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");

        let mut exported = Settings::new();
        exported.update(SettingsPatch::Communication(CommunicationSettingsPatch {
            voice_alerts: Some(false),
            ..Default::default()
        }));
        let path = exported.export_to(&dir).expect("export");
        assert!(path.ends_with(EXPORT_FILE_NAME));

        let mut imported = Settings::new();
        let replaced = imported.import_from(&path).expect("import");
        assert_eq!(replaced.len(), SettingsCategory::ALL.len());
        assert_eq!(imported, exported);

        fs::remove_dir_all(&dir).ok();
    }
}
