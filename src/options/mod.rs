//! Viewer options with TOML preset support.
//!
//! Camera framing, motion feel, lighting and debug toggles are consolidated
//! here. Options serialize to/from TOML so a preset can tune the spring or
//! the framing padding without a rebuild.

mod camera;
mod debug;
mod lighting;
mod motion;

use std::path::Path;

pub use camera::CameraOptions;
pub use debug::DebugOptions;
pub use lighting::LightingOptions;
pub use motion::MotionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TiltError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[motion]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and framing parameters.
    pub camera: CameraOptions,
    /// Drag and spring-return parameters.
    pub motion: MotionOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Debug visualization options.
    pub debug: DebugOptions,
}

impl Options {
    /// Generate JSON Schema describing the tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TiltError::Io`] if the file cannot be read and
    /// [`TiltError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, TiltError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TiltError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`TiltError`] on serialization or I/O failure.
    pub fn save(&self, path: &Path) -> Result<(), TiltError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TiltError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(TiltError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[motion]
damping = 12.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.motion.damping, 12.0);
        // Everything else should be default
        assert_eq!(opts.motion.stiffness, 120.0);
        assert_eq!(opts.camera.padding, 1.08);
        assert_eq!(opts.lighting.background, "#090D18");
    }

    #[test]
    fn motion_defaults_match_spring_constants() {
        let motion = MotionOptions::default();
        assert!((motion.max_deviation() - 40.0_f32.to_radians()).abs() < 1e-7);
        let rest = motion.rest_pose().orientation();
        assert!((rest.x - 10.0_f32.to_radians()).abs() < 1e-7);
        assert_eq!(rest.y, 0.0);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("tilt-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.motion.rotate_speed = 0.01;
        opts.save(&dir.join("snappy.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["snappy".to_owned()]);
        let loaded = Options::load(&dir.join("snappy.toml")).unwrap();
        assert_eq!(loaded, opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_toml_is_an_options_error() {
        let dir = std::env::temp_dir()
            .join(format!("tilt-bad-preset-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[motion]\ndamping = \"soft\"\n").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(TiltError::OptionsParse(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("motion"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("debug"));

        // Exposed fields present, skipped ones absent
        let motion = &props["motion"]["properties"];
        assert!(motion.get("damping").is_some());
        assert!(motion.get("rotate_speed").is_some());
        assert!(motion.get("settle_angle").is_none());
        assert!(motion.get("rest_deg").is_none());
    }
}
