//! Platform layer
//!
//! Pieces that touch the outside world and stay out of the simulation:
//! - `clock`: wall-clock frame pacing
//! - `replay`: recorded board sessions as a [`crate::sensor::CellSource`]

pub mod clock;
pub mod replay;

pub use clock::FrameLimiter;
pub use replay::ReplaySource;
