//! # Turntable Animation
//!
//! [`AnimationDetector`] decides whether authored animation is kept, and
//! [`TurntableAnimator`] writes the single rotation track otherwise.

pub mod detector;
pub mod turntable;

pub use detector::{AnimationDetector, AnimationPlan};
pub use turntable::{TurntableAnimator, TURNTABLE_CHANNEL};
