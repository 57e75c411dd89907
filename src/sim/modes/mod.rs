//! Game mode rule engines
//!
//! Each mode owns its objects, scoring and end condition and plugs into the
//! session through [`ModeEngine`]. The session hands every call a
//! [`ModeContext`] borrowing the shared pieces (player, RNG, cue queue,
//! profile, record store) instead of modes reaching for global state.

pub mod balance_hold;
pub mod coin_collector;
pub mod dodge;

pub use balance_hold::{BalanceHold, Target};
pub use coin_collector::{Coin, CoinCollector};
pub use dodge::{Dodge, DodgeBlock};

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::Player;
use super::state::Profile;
use crate::cues::Cue;
use crate::persistence::RecordStore;
use crate::sensor::BalanceSample;

/// Game picked on the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    BalanceHold,
    CoinCollector,
    Dodge,
}

impl GameType {
    /// Main menu layout: left, center, right
    pub const MENU: [GameType; 3] = [GameType::BalanceHold, GameType::Dodge, GameType::CoinCollector];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::BalanceHold => "Balance Hold",
            GameType::CoinCollector => "Coin Collector",
            GameType::Dodge => "Dodge",
        }
    }

    /// Dodge starts straight from the menu; the others ask for a difficulty
    pub fn needs_difficulty(&self) -> bool {
        !matches!(self, GameType::Dodge)
    }
}

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Difficulty screen layout: left, center, right
    pub const MENU: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Result of one mode update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    Continue,
    /// Goal reached; the win is recorded
    Won,
    /// Round over without a win (goes to the win screen, nothing recorded)
    Lost,
    /// Round thrown away; back to the main menu
    Aborted,
}

/// Shared session pieces lent to a mode for one call
pub struct ModeContext<'a> {
    pub player: &'a mut Player,
    pub rng: &'a mut Pcg32,
    pub cues: &'a mut Vec<Cue>,
    pub profile: Option<&'a mut Profile>,
    pub store: &'a mut dyn RecordStore,
}

/// Render-facing view of a Dodge block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Per-mode render state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModeView {
    BalanceHold {
        target: Vec2,
        hold_timer: f32,
        hold_progress: f32,
        coins: u32,
        goal: u32,
    },
    CoinCollector {
        coin: Option<Vec2>,
        coins: u32,
        goal: u32,
        /// Hard mode countdown
        time_left: Option<f32>,
    },
    Dodge {
        blocks: Vec<BlockView>,
        score: u32,
        high_score: u32,
        speed: f32,
    },
}

/// Capability set every game mode provides
pub trait ModeEngine: std::fmt::Debug {
    fn game_type(&self) -> GameType;

    /// Zero all mode state and place the opening objects
    fn init(&mut self, ctx: &mut ModeContext<'_>);

    /// Advance one frame
    fn update(&mut self, ctx: &mut ModeContext<'_>, sample: &BalanceSample, dt: f32) -> ModeOutcome;

    fn render_state(&self) -> ModeView;

    /// Seconds since `init`
    fn elapsed(&self) -> f32;
}

/// Build the engine for a game type
pub fn create(game: GameType, difficulty: Difficulty) -> Box<dyn ModeEngine> {
    match game {
        GameType::BalanceHold => Box::new(BalanceHold::new(difficulty)),
        GameType::CoinCollector => Box::new(CoinCollector::new(difficulty)),
        GameType::Dodge => Box::new(Dodge::new()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_layouts() {
        assert_eq!(GameType::MENU[0], GameType::BalanceHold);
        assert_eq!(GameType::MENU[1], GameType::Dodge);
        assert_eq!(GameType::MENU[2], GameType::CoinCollector);
        assert_eq!(Difficulty::MENU[2], Difficulty::Hard);
    }

    #[test]
    fn test_create_dispatch() {
        assert_eq!(create(GameType::Dodge, Difficulty::Hard).game_type(), GameType::Dodge);
        assert_eq!(
            create(GameType::CoinCollector, Difficulty::Easy).game_type(),
            GameType::CoinCollector
        );
        assert!(!GameType::Dodge.needs_difficulty());
    }
}
