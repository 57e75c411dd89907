//! Session simulation
//!
//! All gameplay logic lives here, independent of the board transport and of
//! any rendering:
//! - Time only advances through the `dt` passed to [`tick`]
//! - Randomness comes from the session's seeded RNG
//! - Persistence goes through a [`crate::persistence::RecordStore`]

pub mod modes;
pub mod motion;
pub mod selection;
pub mod state;
pub mod tick;

pub use modes::{Difficulty, GameType, ModeEngine, ModeOutcome, ModeView};
pub use motion::{Player, Trail};
pub use selection::{SelectionDebouncer, Zone, ZoneThresholds};
pub use state::{Profile, SelectionView, Session, SessionSnapshot, SessionState};
pub use tick::tick;
