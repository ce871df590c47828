//! Interruptible, time-sampled attribute transitions.
//!
//! Time is supplied by the caller in milliseconds so that every frame is a
//! pure function of the write history and the sample time.

mod animated;
mod easing;

pub use animated::{Animated, Interpolate, Timing};
pub use easing::cubic_in_out;
