//! Centralized runtime options with TOML file support.
//!
//! Backend location, chart geometry, transition timing, marker style and
//! playback defaults are consolidated here. Options serialize to/from TOML so
//! a partial file (e.g. only overriding `[backend]`) is enough to configure a
//! session.

mod animation;
mod backend;
mod chart;
mod playback;
mod style;

use std::path::Path;

pub use animation::AnimationOptions;
pub use backend::BackendOptions;
pub use chart::ChartOptions;
pub use playback::PlaybackOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use style::StyleOptions;

use crate::error::ScopeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Clustering service location and timeout.
    pub backend: BackendOptions,
    /// Canvas size and margins.
    pub chart: ChartOptions,
    /// Transition durations and easing.
    pub animation: AnimationOptions,
    /// Marker appearance.
    pub style: StyleOptions,
    /// Run defaults.
    pub playback: PlaybackOptions,
}

impl Options {
    /// Generate JSON Schema describing the user-facing options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Io`] if the file cannot be read and
    /// [`ScopeError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ScopeError> {
        let content = std::fs::read_to_string(path).map_err(ScopeError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ScopeError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::OptionsParse`] if serialization fails and
    /// [`ScopeError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ScopeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScopeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ScopeError::Io)?;
        }
        std::fs::write(path, content).map_err(ScopeError::Io)
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
        let toml_str = r#"
[backend]
base_url = "http://kmeans.internal:9000"

[animation]
centroid_move_ms = 250
easing = "linear"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.backend.base_url, "http://kmeans.internal:9000");
        assert_eq!(opts.backend.run_path, "/api/run_kmeans");
        assert_eq!(opts.animation.centroid_move_ms, 250);
        assert_eq!(
            opts.animation.easing,
            crate::util::easing::EasingFunction::Linear
        );
        // Everything else should be default
        assert_eq!(opts.animation.assignment_ms, 800);
        assert_eq!(opts.style.point_radius, 5.0);
        assert_eq!(opts.playback.default_k, 3);
    }

    #[test]
    fn default_chart_matches_reference_layout() {
        let chart = ChartOptions::default();
        assert_eq!(chart.inner_size(), (740.0, 460.0));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("clusterscope-options-{}", std::process::id()));
        let path = dir.join("session.toml");
        let mut opts = Options::default();
        opts.playback.default_k = 5;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = std::env::temp_dir()
            .join(format!("clusterscope-bad-options-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[chart]\nwidth = \"wide\"\n").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(ScopeError::OptionsParse(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("backend"));
        assert!(props.contains_key("chart"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("playback"));

        // Colors are skipped from the schema
        let style = &props["style"]["properties"];
        assert!(style.get("point_radius").is_some());
        assert!(style.get("palette").is_none());
        assert!(style.get("neutral_fill").is_none());
    }
}
