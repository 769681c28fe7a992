//! Shared utilities: frame timing for the viewer loop and easing curves for
//! animated samples.

pub mod easing;
pub mod frame_timing;
