//! Session state and core types
//!
//! A single [`Session`] owns everything that changes from frame to frame:
//! which screen is up, the player, the active selector or mode engine, the
//! loaded profile and the queue of cues for the presentation layer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::modes::{Difficulty, GameType, ModeEngine, ModeView};
use super::motion::Player;
use super::selection::{SelectionDebouncer, Zone};
use crate::cues::{Cue, Soundtrack};
use crate::persistence::{ProfileRecord, RecordStore};
use crate::sensor::BalanceSample;
use crate::settings::Settings;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the board
    Connecting,
    /// Short intro after connecting
    Transitioning,
    PlayerSelect,
    MainMenu,
    DifficultySelect,
    BalanceHold,
    CoinCollector,
    Dodge,
    /// Round-over screen (wins and Dodge crashes alike)
    Winning,
}

impl SessionState {
    pub fn for_game(game: GameType) -> Self {
        match game {
            GameType::BalanceHold => SessionState::BalanceHold,
            GameType::CoinCollector => SessionState::CoinCollector,
            GameType::Dodge => SessionState::Dodge,
        }
    }

    /// Screens driven by a selection debouncer
    pub fn is_menu(&self) -> bool {
        matches!(
            self,
            SessionState::PlayerSelect | SessionState::MainMenu | SessionState::DifficultySelect
        )
    }

    /// Screens driven by a mode engine
    pub fn is_gameplay(&self) -> bool {
        matches!(
            self,
            SessionState::BalanceHold | SessionState::CoinCollector | SessionState::Dodge
        )
    }

    pub fn soundtrack(&self) -> Soundtrack {
        match self {
            SessionState::Connecting => Soundtrack::ConnectionIntro,
            SessionState::Transitioning => Soundtrack::Transition,
            _ => Soundtrack::MainLoop,
        }
    }
}

/// The selected player and their stored records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub record: ProfileRecord,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record: ProfileRecord::default(),
        }
    }

    /// Load records for `name`; misses read as "no record"
    pub fn load(name: impl Into<String>, store: &dyn RecordStore) -> Self {
        let name = name.into();
        let record = ProfileRecord {
            best_time: store.read_best_time(&name),
            wins: store.read_win_count(&name),
            high_score: store.read_high_score(&name),
        };
        log::info!(
            "Loaded profile '{}': best={:?} wins={} dodge={}",
            name,
            record.best_time,
            record.wins,
            record.high_score
        );
        Self { name, record }
    }

    /// Count a win taking `secs`. Returns true when it set a new best time.
    ///
    /// Write failures are logged; the in-memory record stays updated.
    pub fn record_win(&mut self, secs: f32, store: &mut dyn RecordStore) -> bool {
        let new_best = self.record.best_time.is_none_or(|best| secs < best);
        if new_best {
            self.record.best_time = Some(secs);
            if let Err(e) = store.write_best_time(&self.name, secs) {
                log::warn!("Failed to save best time for '{}': {}", self.name, e);
            }
        }

        self.record.wins += 1;
        if let Err(e) = store.write_win_count(&self.name, self.record.wins) {
            log::warn!("Failed to save win count for '{}': {}", self.name, e);
        }
        new_best
    }

    /// Store a new Dodge high score
    pub fn record_high_score(&mut self, score: u32, store: &mut dyn RecordStore) {
        self.record.high_score = score;
        if let Err(e) = store.write_high_score(&self.name, score) {
            log::warn!("Failed to save dodge high score for '{}': {}", self.name, e);
        }
    }
}

/// Menu highlight for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionView {
    pub candidate: Option<Zone>,
    pub progress: f32,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub frame: u64,
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    /// Newest first
    pub trail: Vec<Vec2>,
    pub selection: Option<SelectionView>,
    pub mode: Option<ModeView>,
    pub profile: Option<Profile>,
    pub profiles: Vec<String>,
    pub pending_game: Option<GameType>,
    /// Transition / win screen progress in [0, 1]
    pub screen_progress: f32,
    pub soundtrack: Soundtrack,
    pub sample: BalanceSample,
}

/// The one session instance driven by [`super::tick`]
#[derive(Debug)]
pub struct Session {
    pub(crate) state: SessionState,
    pub(crate) player: Player,
    pub(crate) rng: Pcg32,
    seed: u64,
    pub(crate) cues: Vec<Cue>,
    /// Names offered on player select, left to right
    pub(crate) profiles: [String; 3],
    pub(crate) profile: Option<Profile>,
    pub(crate) selection: SelectionDebouncer,
    /// Game chosen on the main menu, waiting for a difficulty
    pub(crate) pending_game: Option<GameType>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) mode: Option<Box<dyn ModeEngine>>,
    /// Latest reading; empty polls keep the previous one
    pub(crate) sample: BalanceSample,
    /// Time on the current timed screen (Transitioning, Winning)
    pub(crate) screen_timer: f32,
    /// Time the board has been continuously unloaded
    pub(crate) idle_timer: f32,
    pub(crate) frame: u64,
}

impl Session {
    pub fn new(profiles: [String; 3], seed: u64) -> Self {
        Self {
            state: SessionState::Connecting,
            player: Player::default(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            cues: Vec::new(),
            profiles,
            profile: None,
            selection: SelectionDebouncer::default(),
            pending_game: None,
            difficulty: None,
            mode: None,
            sample: BalanceSample::default(),
            screen_timer: 0.0,
            idle_timer: 0.0,
            frame: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::new(settings.profile_names(), seed)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn pending_game(&self) -> Option<GameType> {
        self.pending_game
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn mode(&self) -> Option<&dyn ModeEngine> {
        self.mode.as_deref()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Cues emitted since the last drain, oldest first
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Switch screens. Timed screens and selectors start fresh.
    pub(crate) fn enter(&mut self, next: SessionState) {
        if next != self.state {
            log::info!("Session {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        self.screen_timer = 0.0;
        self.selection.reset();
    }

    /// Drop all per-round state (mode engine, menu picks)
    pub(crate) fn clear_round(&mut self) {
        self.mode = None;
        self.pending_game = None;
        self.difficulty = None;
        self.player.reset();
    }

    /// Back to the connect screen with everything zeroed
    pub(crate) fn reset_to_connecting(&mut self) {
        self.clear_round();
        self.profile = None;
        self.sample = BalanceSample::default();
        self.idle_timer = 0.0;
        self.enter(SessionState::Connecting);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let screen_progress = match self.state {
            SessionState::Transitioning => self.screen_timer / crate::consts::TRANSITION_SECS,
            SessionState::Winning => self.screen_timer / crate::consts::WIN_SCREEN_SECS,
            _ => 0.0,
        }
        .clamp(0.0, 1.0);

        SessionSnapshot {
            state: self.state,
            frame: self.frame,
            player_pos: self.player.pos,
            player_vel: self.player.vel,
            trail: self.player.trail.iter().collect(),
            selection: self.state.is_menu().then(|| SelectionView {
                candidate: self.selection.candidate(),
                progress: self.selection.progress(),
            }),
            mode: self.mode.as_ref().map(|m| m.render_state()),
            profile: self.profile.clone(),
            profiles: self.profiles.to_vec(),
            pending_game: self.pending_game,
            screen_progress,
            soundtrack: self.state.soundtrack(),
            sample: self.sample,
        }
    }
}
