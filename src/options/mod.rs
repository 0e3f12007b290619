//! Runtime options with TOML preset support.
//!
//! Everything tunable about a session (layout timing, highlighting,
//! camera choreography, ambient animation, compositor values, key
//! bindings) lives here and round-trips through TOML.

mod ambient;
mod camera;
mod interaction;
mod keybindings;
mod layout;
mod post_processing;

use std::path::Path;

pub use ambient::AmbientOptions;
pub use camera::CameraOptions;
pub use interaction::InteractionOptions;
pub use keybindings::KeybindingOptions;
pub use layout::LayoutOptions;
pub use post_processing::PostProcessingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::AtlasError;

/// Top-level options. Every section is `#[serde(default)]`, so a preset
/// that only overrides `[camera]` is valid.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Layout selection and transitions.
    pub layout: LayoutOptions,
    /// Highlighting, search, and picking.
    pub interaction: InteractionOptions,
    /// Camera projection and choreography.
    pub camera: CameraOptions,
    /// Living and Aurora parameters.
    pub ambient: AmbientOptions,
    /// Compositor values.
    pub post_processing: PostProcessingOptions,
    /// Keyboard bindings.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// JSON Schema of the UI-exposed options.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`AtlasError::OptionsParse`] when the text is not valid TOML for
    /// these options.
    pub fn from_toml(text: &str) -> Result<Self, AtlasError> {
        let mut opts: Self = toml::from_str(text)
            .map_err(|e| AtlasError::OptionsParse(e.to_string()))?;
        opts.validate()?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Check the numeric fields that feed timers and scales.
    ///
    /// # Errors
    ///
    /// [`AtlasError::OptionsParse`] naming the first field that is
    /// non-finite, a negative duration, or a non-positive scale.
    pub fn validate(&self) -> Result<(), AtlasError> {
        let durations = [
            ("layout.transition_ms", self.layout.transition_ms),
            ("camera.fly_duration_ms", self.camera.fly_duration_ms),
            ("camera.drift_delay_secs", self.camera.drift_delay_secs),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(AtlasError::OptionsParse(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        let factors = [
            ("layout.scale", self.layout.scale),
            ("interaction.hover_scale", self.interaction.hover_scale),
            ("interaction.selection_scale", self.interaction.selection_scale),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 {
                return Err(AtlasError::OptionsParse(format!(
                    "{name} must be a finite, positive number (got {value})"
                )));
            }
        }
        Ok(())
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    ///
    /// I/O failures and parse failures.
    pub fn load(path: &Path) -> Result<Self, AtlasError> {
        let content = std::fs::read_to_string(path)?;
        let opts = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(opts)
    }

    /// Save options as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Serialization and I/O failures.
    pub fn save(&self, path: &Path) -> Result<(), AtlasError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AtlasError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Preset names (TOML file stems) in `dir`, sorted.
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_owned)
            })
            .collect();
        names.sort();
        names
    }
}

/// `ms` milliseconds as a [`Duration`]. Negative, NaN and
/// unrepresentable values give zero.
pub fn millis(ms: f32) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(ms / 1000.0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;
    use crate::layout::LayoutKind;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let text = toml::to_string_pretty(&opts).unwrap();
        assert_eq!(Options::from_toml(&text).unwrap(), opts);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let opts = Options::from_toml(
            r#"
[layout]
initial = "galaxy"

[interaction]
similarity_top_n = 5
"#,
        )
        .unwrap();
        assert_eq!(opts.layout.initial, LayoutKind::Galaxy);
        assert_eq!(opts.interaction.similarity_top_n, 5);
        assert_eq!(opts.interaction.search_debounce_ms, 150);
        assert_eq!(opts.camera, CameraOptions::default());
    }

    #[test]
    fn keybindings_survive_loading() {
        let opts = Options::from_toml(
            r#"
[keybindings.bindings]
next_layout = "Space"
"#,
        )
        .unwrap();
        assert_eq!(opts.keybindings.lookup("Space"), Some(KeyAction::NextLayout));
        assert_eq!(opts.keybindings.lookup("KeyL"), None);
    }

    #[test]
    fn default_bindings() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("KeyA"), Some(KeyAction::ToggleAurora));
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Cancel));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[layout\n").unwrap_err();
        assert!(matches!(err, AtlasError::OptionsParse(_)));
    }

    #[test]
    fn non_finite_and_negative_values_are_rejected() {
        for text in [
            "[layout]\ntransition_ms = inf",
            "[layout]\ntransition_ms = nan",
            "[layout]\ntransition_ms = -5.0",
            "[camera]\nfly_duration_ms = inf",
            "[camera]\ndrift_delay_secs = -inf",
            "[interaction]\nselection_scale = 0.0",
        ] {
            let err = Options::from_toml(text).unwrap_err();
            assert!(matches!(err, AtlasError::OptionsParse(_)), "{text}");
        }
        assert!(Options::from_toml("[layout]\ntransition_ms = 0.0").is_ok());
    }

    #[test]
    fn millis_saturates_to_zero() {
        assert_eq!(millis(1500.0), Duration::from_millis(1500));
        assert_eq!(millis(-1.0), Duration::ZERO);
        assert_eq!(millis(f32::NAN), Duration::ZERO);
        assert_eq!(millis(f32::INFINITY), Duration::ZERO);
        assert_eq!(millis(f32::MAX), Duration::ZERO);
    }

    #[test]
    fn schema_exposes_ui_sections_only() {
        let schema = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema["properties"].as_object().unwrap();
        for section in ["layout", "interaction", "camera", "ambient", "post_processing"] {
            assert!(props.contains_key(section), "{section}");
        }
        assert!(!props.contains_key("keybindings"));
        let interaction = &props["interaction"]["properties"];
        assert!(interaction.get("search_debounce_ms").is_some());
        assert!(interaction.get("dim").is_none());
    }
}
