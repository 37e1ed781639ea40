use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Transition timing for step playback.
pub struct AnimationOptions {
    /// Point recolor duration when a new assignment is shown.
    #[schemars(title = "Assignment (ms)", range(min = 0, max = 10_000))]
    pub assignment_ms: u64,
    /// Centroid travel duration between iterations.
    #[schemars(title = "Centroid Move (ms)", range(min = 0, max = 10_000))]
    pub centroid_move_ms: u64,
    /// Fade-in duration for newly appearing centroids.
    #[schemars(title = "Centroid Fade (ms)", range(min = 0, max = 10_000))]
    pub centroid_fade_ms: u64,
    /// Easing applied to every scene transition.
    #[schemars(title = "Easing")]
    pub easing: EasingFunction,
}

impl AnimationOptions {
    /// Point recolor duration.
    #[must_use]
    pub fn assignment(&self) -> Duration {
        Duration::from_millis(self.assignment_ms)
    }

    /// Centroid travel duration.
    #[must_use]
    pub fn centroid_move(&self) -> Duration {
        Duration::from_millis(self.centroid_move_ms)
    }

    /// Centroid fade-in duration.
    #[must_use]
    pub fn centroid_fade(&self) -> Duration {
        Duration::from_millis(self.centroid_fade_ms)
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            assignment_ms: 800,
            centroid_move_ms: 1500,
            centroid_fade_ms: 800,
            easing: EasingFunction::CubicInOut,
        }
    }
}
