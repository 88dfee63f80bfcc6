//! Color math, the inversion policy, and the named-color table.

pub mod classify;
pub mod math;
pub mod named;

pub use math::Hsl;
