//! Shared utilities: easing curves and cluster color palettes.

pub mod easing;
pub mod palette;
