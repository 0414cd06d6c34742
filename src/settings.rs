//! Shared viewer settings with TOML preset support.
//!
//! One instance per session. Only the UI layer (slider, lock toggle)
//! writes it, through the session's setter funnel; every viewer reads it
//! on its own update path. Serializes to/from TOML for deployment
//! presets, and exports a JSON Schema for the settings UI.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::colormap::ColorMap;
use crate::error::CrossviewError;

/// Global, shared viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewerSettings {
    /// When true, any one viewer's drag moves every camera in concert.
    #[schemars(title = "Camera Lock")]
    pub camera_lock: bool,
    /// `[min, max]` intensity range mapped onto the colormap ends.
    #[schemars(title = "Color Limits")]
    pub color_limits: [f32; 2],
    /// Active colormap name.
    #[schemars(title = "Color Map")]
    pub color_map: ColorMap,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            camera_lock: true,
            color_limits: [-1.0, 2.0],
            color_map: ColorMap::Turbo,
        }
    }
}

impl ViewerSettings {
    /// Check the `min < max` color-limit invariant.
    ///
    /// # Errors
    ///
    /// Returns [`CrossviewError::InvalidColorLimits`] when violated.
    pub fn validate(&self) -> Result<(), CrossviewError> {
        let [min, max] = self.color_limits;
        if min >= max {
            return Err(CrossviewError::InvalidColorLimits { min, max });
        }
        Ok(())
    }

    /// Generate the JSON Schema describing the UI-exposed settings.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ViewerSettings)
    }

    /// Load settings from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// I/O failure, TOML parse failure, or invalid color limits.
    pub fn load(path: &Path) -> Result<Self, CrossviewError> {
        let content =
            std::fs::read_to_string(path).map_err(CrossviewError::Io)?;
        let settings: Self = toml::from_str(&content)
            .map_err(|e| CrossviewError::SettingsParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// I/O failure or TOML serialization failure.
    pub fn save(&self, path: &Path) -> Result<(), CrossviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CrossviewError::SettingsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CrossviewError::Io)?;
        }
        std::fs::write(path, content).map_err(CrossviewError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let settings = ViewerSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: ViewerSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: ViewerSettings =
            toml::from_str("camera_lock = false\n").unwrap();
        assert!(!settings.camera_lock);
        // Everything else should be default
        assert_eq!(settings.color_limits, [-1.0, 2.0]);
        assert_eq!(settings.color_map, ColorMap::Turbo);
    }

    #[test]
    fn inverted_limits_fail_validation() {
        let settings = ViewerSettings {
            color_limits: [2.0, -1.0],
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CrossviewError::InvalidColorLimits { .. })
        ));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(ViewerSettings::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("camera_lock"));
        assert!(props.contains_key("color_limits"));
        assert!(props.contains_key("color_map"));
    }
}
