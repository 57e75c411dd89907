//! Balance Arcade - weight-shift arcade games for a balance board
//!
//! Core modules:
//! - `sensor`: Raw cell normalization and the sensor adapter contract
//! - `sim`: Session engine (motion model, selection, game modes, state machine)
//! - `persistence`: Per-profile best time, win count and high score records
//! - `cues`: Discrete audio/presentation cues emitted by the session
//! - `platform`: Frame pacing and recorded sensor sources
//! - `settings`: Runtime configuration

pub mod cues;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod sensor;
pub mod settings;
pub mod sim;

pub use cues::{Cue, Soundtrack};
pub use error::{PersistenceError, SensorError, SettingsError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 1920.0;
    pub const FIELD_HEIGHT: f32 = 1080.0;
    /// Player, target and coin sprite size
    pub const GAME_OBJECT_SIZE: f32 = 150.0;

    /// Below this the board is treated as unoccupied
    pub const MIN_TOTAL_WEIGHT: f32 = 2000.0;
    /// CoB magnitudes under this are clamped to zero
    pub const DEAD_ZONE: f32 = 400.0;
    /// CoB to field-fraction scale for Balance-Hold and Coin-Collector
    pub const COB_SCALE_GENERAL: f32 = 0.00015;
    /// Dodge uses a more sensitive mapping
    pub const COB_SCALE_DODGE: f32 = 0.00025;

    /// Damped spring constants for the player (unit mass)
    pub const SPRING_CONSTANT: f32 = 10.0;
    pub const DAMPING_FACTOR: f32 = 5.0;
    pub const TRAIL_LENGTH: usize = 60;

    /// Dwell needed to commit a menu selection (seconds)
    pub const SELECT_DWELL_SECS: f32 = 1.5;
    /// Connect-screen shake/transition length (seconds)
    pub const TRANSITION_SECS: f32 = 1.5;
    /// Win screen length before returning to player select (seconds)
    pub const WIN_SCREEN_SECS: f32 = 2.5;
    /// Empty board for this long drops back to the connect screen (seconds)
    pub const INACTIVITY_TIMEOUT_SECS: f32 = 15.0;

    /// Consecutive empty polls before the board counts as gone
    pub const POLL_TIMEOUT_THRESHOLD: u32 = 100;
    /// Max wait per poll (milliseconds)
    pub const POLL_TIMEOUT_MS: u64 = 100;
}

/// Centre of the playfield
#[inline]
pub fn field_center() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH / 2.0, consts::FIELD_HEIGHT / 2.0)
}

/// Map a center-of-balance reading to a point on the field.
///
/// Screen y grows downward, so leaning forward (positive y) moves up.
#[inline]
pub fn cob_to_field(x_cob: f32, y_cob: f32, scale: f32) -> Vec2 {
    field_center()
        + Vec2::new(
            x_cob * scale * consts::FIELD_WIDTH,
            -y_cob * scale * consts::FIELD_HEIGHT,
        )
}

/// Axis-aligned rectangle overlap (edges touching do not count)
#[inline]
pub fn rects_overlap(a_min: Vec2, a_size: Vec2, b_min: Vec2, b_size: Vec2) -> bool {
    a_min.x < b_min.x + b_size.x
        && b_min.x < a_min.x + a_size.x
        && a_min.y < b_min.y + b_size.y
        && b_min.y < a_min.y + a_size.y
}
