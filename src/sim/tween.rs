//! Timed transitions
//!
//! A [`Tween`] is a clock: an optional start delay followed by a duration.
//! Callers sample [`Tween::progress`] and blend their own values, so one
//! clock can drive several properties with different [`Ease`] curves.

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out
    #[default]
    QuadOut,
    /// Cubic ease-out
    CubicOut,
}

impl Ease {
    /// Map linear progress t ∈ [0, 1] to eased progress
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t).powi(2),
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Linear blend between two values
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Delay + duration clock, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tween {
    pub delay: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Tween {
    pub fn new(duration: f32, delay: f32) -> Self {
        Self {
            delay: delay.max(0.0),
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.total());
    }

    /// Delay plus duration
    #[inline]
    pub fn total(&self) -> f32 {
        self.delay + self.duration
    }

    /// Linear progress of the delayed segment, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    /// Linear progress ignoring the delay (segment starting at t = 0)
    pub fn progress_undelayed(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total()
    }
}
