//! Zone settings
//!
//! Names the container, the marker class and the storage slot. The page can
//! override any of them by passing JSON to `init_with_settings`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Rejected settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Malformed(String),
    #[error("`{0}` must not be empty")]
    Empty(&'static str),
    #[error("marker class `{0}` contains whitespace")]
    MarkerWhitespace(String),
}

/// Identifiers the zone works against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Id of the element whose inner markup is persisted
    pub container_id: String,
    /// Class that marks an element as user-editable
    pub marker_class: String,
    /// Storage key of the persisted slot
    pub storage_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_id: consts::CONTAINER_ID.to_string(),
            marker_class: consts::MARKER_CLASS.to_string(),
            storage_key: consts::STORAGE_KEY.to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| SettingsError::Malformed(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from JSON, falling back to the defaults when the JSON
    /// is rejected. The page keeps working with the stock identifiers.
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("Ignoring settings ({}), using defaults", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.container_id.is_empty() {
            return Err(SettingsError::Empty("container_id"));
        }
        if self.marker_class.is_empty() {
            return Err(SettingsError::Empty("marker_class"));
        }
        if self.marker_class.chars().any(char::is_whitespace) {
            return Err(SettingsError::MarkerWhitespace(self.marker_class.clone()));
        }
        if self.storage_key.is_empty() {
            return Err(SettingsError::Empty("storage_key"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_markup() {
        let settings = Settings::default();
        assert_eq!(settings.container_id, "state-zone");
        assert_eq!(settings.marker_class, "stateful");
        assert_eq!(settings.storage_key, "state");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"storage_key":"notes"}"#).unwrap();
        assert_eq!(settings.storage_key, "notes");
        assert_eq!(settings.container_id, "state-zone");
        assert_eq!(settings.marker_class, "stateful");
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Malformed(_))
        ));
        assert_eq!(
            Settings::from_json(r#"{"container_id":""}"#),
            Err(SettingsError::Empty("container_id"))
        );
        assert_eq!(
            Settings::from_json(r#"{"marker_class":"two words"}"#),
            Err(SettingsError::MarkerWhitespace("two words".to_string()))
        );
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            container_id: "notes".to_string(),
            marker_class: "editable".to_string(),
            storage_key: "notes_state".to_string(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejected_settings_fall_back_to_defaults() {
        assert_eq!(Settings::from_json_or_default("{not json"), Settings::default());
        assert_eq!(
            Settings::from_json_or_default(r#"{"storage_key":""}"#),
            Settings::default()
        );
        assert_eq!(
            Settings::from_json_or_default(r#"{"storage_key":"notes"}"#).storage_key,
            "notes"
        );
    }
}
