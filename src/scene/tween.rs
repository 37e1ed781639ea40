//! Timed transition of a single visual attribute.
//!
//! A [`Tween`] interpolates from a start value to a target over a duration
//! with an easing curve. Retargeting mid-flight starts the new transition
//! from the value currently on screen. Retargeting to the value already
//! being approached is a no-op, which keeps repeated identical updates from
//! restarting animations.

use glam::Vec2;
use web_time::{Duration, Instant};

use crate::util::easing::EasingFunction;
use crate::util::palette::Rgb;

/// Values a [`Tween`] can animate.
pub trait Interpolate: Copy + PartialEq {
    /// Value at fraction `t` between `self` (t = 0) and `to` (t = 1).
    #[must_use]
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Rgb {
    fn interpolate(self, to: Self, t: f32) -> Self {
        [
            self[0].interpolate(to[0], t),
            self[1].interpolate(to[1], t),
            self[2].interpolate(to[2], t),
        ]
    }
}

/// One attribute in transition.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    easing: EasingFunction,
}

impl<T: Interpolate> Tween<T> {
    /// A value at rest.
    #[must_use]
    pub fn fixed(value: T) -> Self {
        Self {
            from: value,
            to: value,
            start: Instant::now(),
            duration: Duration::ZERO,
            easing: EasingFunction::Linear,
        }
    }

    /// A transition from `from` to `to` starting at `now`.
    #[must_use]
    pub fn animate(
        from: T,
        to: T,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            start: now,
            duration,
            easing,
        }
    }

    /// Normalized progress (0.0 to 1.0). Zero-length transitions are always
    /// complete.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);

        if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Value on screen at `now`.
    #[must_use]
    pub fn value_at(&self, now: Instant) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.interpolate(self.to, self.easing.evaluate(t))
    }

    /// Whether the transition has finished at `now`.
    #[must_use]
    pub fn is_settled(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Head for a new target, starting from the current on-screen value.
    ///
    /// Returns `false` (and leaves the running transition alone) when `to`
    /// is already the target.
    pub fn retarget(
        &mut self,
        to: T,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> bool {
        if self.to == to {
            return false;
        }
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
        self.easing = easing;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn fixed_value_is_settled() {
        let t = Tween::fixed(3.0_f32);
        let now = Instant::now();
        assert!(t.is_settled(now));
        assert_eq!(t.value_at(now), 3.0);
    }

    #[test]
    fn linear_tween_midpoint_and_end() {
        let start = Instant::now();
        let t = Tween::animate(0.0_f32, 10.0, start, MS_100, EasingFunction::Linear);
        assert_eq!(t.value_at(start), 0.0);
        let mid = t.value_at(start + Duration::from_millis(50));
        assert!((mid - 5.0).abs() < 1e-4);
        assert_eq!(t.value_at(start + MS_100), 10.0);
        assert_eq!(t.value_at(start + Duration::from_secs(5)), 10.0);
        assert!(!t.is_settled(start + Duration::from_millis(99)));
        assert!(t.is_settled(start + MS_100));
    }

    #[test]
    fn progress_before_start_is_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        let t = Tween::animate(0.0_f32, 1.0, start, MS_100, EasingFunction::Linear);
        assert_eq!(t.progress(Instant::now()), 0.0);
    }

    #[test]
    fn retarget_to_same_value_is_noop() {
        let start = Instant::now();
        let mut t =
            Tween::animate(Vec2::ZERO, Vec2::ONE, start, MS_100, EasingFunction::Linear);
        let later = start + Duration::from_millis(40);
        assert!(!t.retarget(Vec2::ONE, later, MS_100, EasingFunction::Linear));
        // Still finishes on the original schedule.
        assert!(t.is_settled(start + MS_100));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let start = Instant::now();
        let mut t = Tween::animate(0.0_f32, 10.0, start, MS_100, EasingFunction::Linear);
        let half = start + Duration::from_millis(50);
        assert!(t.retarget(0.0, half, MS_100, EasingFunction::Linear));
        assert!((t.value_at(half) - 5.0).abs() < 1e-4);
        let quarter = t.value_at(half + Duration::from_millis(50));
        assert!((quarter - 2.5).abs() < 1e-4);
        assert_eq!(t.value_at(half + MS_100), 0.0);
    }

    #[test]
    fn rgb_interpolates_per_channel() {
        let from: Rgb = [0.0, 0.5, 1.0];
        let mid = from.interpolate([1.0, 0.5, 0.0], 0.5);
        assert_eq!(mid, [0.5, 0.5, 0.5]);
    }
}
