use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
/// Run defaults.
pub struct PlaybackOptions {
    /// Cluster count used when a run command does not name one.
    #[schemars(title = "Default k", range(min = 1, max = 10))]
    pub default_k: usize,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self { default_k: 3 }
    }
}
