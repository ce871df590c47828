use serde::{Deserialize, Serialize};

use crate::animation::cubic_in_out;
use crate::core::Transform;
use crate::render::Color;

/// Values that can be blended between two endpoints.
pub trait Interpolate: Copy {
    fn interpolate(self, target: Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(self, target: Self, t: f64) -> Self {
        self + (target - self) * t
    }
}

impl Interpolate for Transform {
    fn interpolate(self, target: Self, t: f64) -> Self {
        self.lerp(target, t)
    }
}

impl Interpolate for Color {
    fn interpolate(self, target: Self, t: f64) -> Self {
        self.lerp(target, t)
    }
}

/// How a visual attribute change is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Timing {
    /// Jump to the target immediately.
    Instant,
    /// Ease from the current value to the target over `duration_ms`.
    Animated { duration_ms: f64 },
}

impl Timing {
    #[must_use]
    pub fn animated(duration_ms: f64) -> Self {
        Self::Animated { duration_ms }
    }

    #[must_use]
    pub fn duration_ms(self) -> f64 {
        match self {
            Self::Instant => 0.0,
            Self::Animated { duration_ms } => duration_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween<T> {
    from: T,
    start_ms: f64,
    duration_ms: f64,
}

/// One visual attribute with at most one in-flight transition.
///
/// Every write supersedes whatever transition was running: an animated write
/// starts from the value sampled at the write time, an instant write cancels
/// the running tween outright. Sampling after a transition ends always
/// yields exactly the last written target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated<T> {
    target: T,
    tween: Option<Tween<T>>,
}

impl<T: Interpolate> Animated<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            target: value,
            tween: None,
        }
    }

    /// Final value of the most recent write.
    #[must_use]
    pub fn target(&self) -> T {
        self.target
    }

    #[must_use]
    pub fn value_at(&self, now_ms: f64) -> T {
        let Some(tween) = self.tween else {
            return self.target;
        };
        let elapsed = now_ms - tween.start_ms;
        if elapsed >= tween.duration_ms {
            return self.target;
        }
        if elapsed <= 0.0 {
            return tween.from;
        }
        let t = cubic_in_out(elapsed / tween.duration_ms);
        tween.from.interpolate(self.target, t)
    }

    #[must_use]
    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.tween
            .is_some_and(|tween| now_ms < tween.start_ms + tween.duration_ms)
    }

    pub fn set(&mut self, value: T) {
        self.target = value;
        self.tween = None;
    }

    pub fn transition_to(&mut self, target: T, now_ms: f64, timing: Timing) {
        match timing {
            Timing::Animated { duration_ms } if duration_ms > 0.0 => {
                let from = self.value_at(now_ms);
                self.target = target;
                self.tween = Some(Tween {
                    from,
                    start_ms: now_ms,
                    duration_ms,
                });
            }
            _ => self.set(target),
        }
    }
}

impl<T: Interpolate + Default> Default for Animated<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
