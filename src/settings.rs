//! Persisted user preferences
//!
//! One JSON document stored under a fixed key:
//!
//! ```json
//! { "volume": 75, "soundType": "water", "timer": 30, "darkMode": false }
//! ```
//!
//! Loading is tolerant field by field. A missing or malformed field takes its
//! default while the others are kept; a document that is not a JSON object at
//! all is treated as absent. Numbers stored as strings (`"60"`) are accepted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::SettingsError;
use crate::sound::SoundClass;

/// Key the document is stored under.
pub const STORAGE_KEY: &str = "toilet-sound-device-settings";

/// Timer durations offered to the user, in seconds. `0` disables the timer.
pub const TIMER_CHOICES: [u32; 9] = [0, 10, 15, 30, 60, 90, 120, 180, 300];

pub const DEFAULT_VOLUME: u8 = 75;
pub const DEFAULT_TIMER: u32 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Percent, 0-100.
    pub volume: u8,
    /// Always an ambience class.
    pub sound_type: SoundClass,
    /// Seconds; one of [`TIMER_CHOICES`].
    pub timer: u32,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            sound_type: SoundClass::Water,
            timer: DEFAULT_TIMER,
            dark_mode: false,
        }
    }
}

impl Settings {
    /// Linear gain for [`volume`](Self::volume).
    pub fn gain(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    /// Parse a stored document, substituting defaults per field.
    pub fn from_json(doc: &str) -> Self {
        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(doc) else {
            tracing::warn!("stored settings unreadable, using defaults");
            return Self::default();
        };
        let defaults = Self::default();

        let volume = fields
            .get("volume")
            .and_then(as_u64)
            .filter(|v| *v <= 100)
            .map_or(defaults.volume, |v| v as u8);

        let sound_type = fields
            .get("soundType")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<SoundClass>().ok())
            .filter(|class| class.is_ambience())
            .unwrap_or(defaults.sound_type);

        let timer = fields
            .get("timer")
            .and_then(as_u64)
            .and_then(|t| u32::try_from(t).ok())
            .filter(|t| TIMER_CHOICES.contains(t))
            .unwrap_or(defaults.timer);

        let dark_mode = fields
            .get("darkMode")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.dark_mode);

        Self { volume, sound_type, timer, dark_mode }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load from `store`. Never fails: any problem yields defaults.
    pub fn load(store: &impl SettingsStore) -> Self {
        match store.read() {
            Ok(Some(doc)) => Self::from_json(&doc),
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!(%err, "failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl SettingsStore) -> Result<(), SettingsError> {
        store.write(&self.to_json()?)
    }
}

/// Integers, or strings holding one.
fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Where the settings document lives.
pub trait SettingsStore {
    /// The stored document, or `None` if nothing was ever saved.
    fn read(&self) -> Result<Option<String>, SettingsError>;
    fn write(&mut self, doc: &str) -> Result<(), SettingsError>;
}

/// Stores the document as `<dir>/toilet-sound-device-settings.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn read(&self) -> Result<Option<String>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(doc) => Ok(Some(doc)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, doc: &str) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, doc)?;
        Ok(())
    }
}

/// In-memory store, for tests and sessions without a settings directory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    doc: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: impl Into<String>) -> Self {
        Self { doc: Some(doc.into()) }
    }
}

impl SettingsStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.doc.clone())
    }

    fn write(&mut self, doc: &str) -> Result<(), SettingsError> {
        self.doc = Some(doc.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.volume, 75);
        assert_eq!(settings.sound_type, SoundClass::Water);
        assert_eq!(settings.timer, 30);
        assert!(!settings.dark_mode);
        assert_eq!(Settings::load(&MemoryStore::new()), settings);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            volume: 40,
            sound_type: SoundClass::WhiteNoise,
            timer: 120,
            dark_mode: true,
        };
        settings.save(&mut FileStore::new(dir.path())).unwrap();

        let fresh = FileStore::new(dir.path());
        assert!(fresh.path().ends_with("toilet-sound-device-settings.json"));
        assert_eq!(Settings::load(&fresh), settings);
    }

    #[test]
    fn writes_camel_case_keys() {
        let json = Settings::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["soundType"], "water");
        assert_eq!(value["darkMode"], false);
        assert_eq!(value["timer"], 30);
        assert_eq!(value["volume"], 75);
    }

    #[test]
    fn string_numbers_are_accepted() {
        let settings = Settings::from_json(r#"{"volume":"20","soundType":"rain","timer":"60"}"#);
        assert_eq!(settings.volume, 20);
        assert_eq!(settings.sound_type, SoundClass::Rain);
        assert_eq!(settings.timer, 60);
        assert!(!settings.dark_mode);
    }

    #[test]
    fn bad_fields_fall_back_individually() {
        let settings = Settings::from_json(
            r#"{"volume":250,"soundType":"warning","timer":45,"darkMode":true}"#,
        );
        assert_eq!(settings.volume, DEFAULT_VOLUME);
        assert_eq!(settings.sound_type, SoundClass::Water);
        assert_eq!(settings.timer, DEFAULT_TIMER);
        assert!(settings.dark_mode);

        let settings = Settings::from_json(r#"{"volume":0,"soundType":"ocean","timer":0}"#);
        assert_eq!(settings.volume, 0);
        assert_eq!(settings.sound_type, SoundClass::Water);
        assert_eq!(settings.timer, 0);
    }

    #[test]
    fn garbage_document_is_treated_as_absent() {
        for doc in ["", "not json", "[1,2,3]", "null", "{\"volume\":"] {
            assert_eq!(Settings::from_json(doc), Settings::default(), "{doc:?}");
        }
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("{STORAGE_KEY}.json"));
        fs::write(&path, "\u{0}\u{1}garbage").unwrap();
        assert_eq!(Settings::load(&FileStore::new(dir.path())), Settings::default());
    }
}
