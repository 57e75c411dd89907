//! Coin-Collector: pick up coins one at a time
//!
//! Coins live in a pool sized to the difficulty goal. Exactly one coin is
//! live; collecting it spawns the next away from the player. On Hard each
//! coin must be reached within [`HARD_COIN_TIMER_SECS`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{Difficulty, GameType, ModeContext, ModeEngine, ModeOutcome, ModeView};
use crate::consts::*;
use crate::cob_to_field;
use crate::cues::Cue;
use crate::sensor::BalanceSample;
use crate::sim::motion;

/// Coin sprite radius
pub const COIN_RADIUS: f32 = 150.0;
/// Pickup reach as a multiple of the coin radius
pub const COLLECT_REACH: f32 = 1.2;
/// Coins never spawn closer than this to the field edge
pub const COIN_SAFE_MARGIN: f32 = 300.0;
/// New coins spawn at least this far from the player
pub const COIN_MIN_PLAYER_DIST: f32 = 250.0;
/// Per-coin countdown on Hard
pub const HARD_COIN_TIMER_SECS: f32 = 10.0;
/// Resampling budget for a coin spawn
const MAX_SPAWN_ATTEMPTS: u32 = 1000;

impl Difficulty {
    /// Coins needed to win (also the pool size)
    pub fn coin_goal(&self) -> u32 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

/// Pool slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub active: bool,
}

/// Random spot inside the safe margin, farther than the minimum distance
/// from `player`. Falls back to the farthest sample if the budget runs out.
fn pick_spawn(rng: &mut Pcg32, player: Vec2) -> Vec2 {
    let mut best = Vec2::new(COIN_SAFE_MARGIN, COIN_SAFE_MARGIN);
    let mut best_dist = -1.0;
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random_range(COIN_SAFE_MARGIN..FIELD_WIDTH - COIN_SAFE_MARGIN),
            rng.random_range(COIN_SAFE_MARGIN..FIELD_HEIGHT - COIN_SAFE_MARGIN),
        );
        let dist = candidate.distance(player);
        if dist > COIN_MIN_PLAYER_DIST {
            return candidate;
        }
        if dist > best_dist {
            best = candidate;
            best_dist = dist;
        }
    }
    best
}

#[derive(Debug, Clone)]
pub struct CoinCollector {
    difficulty: Difficulty,
    pool: Vec<Coin>,
    collected: u32,
    /// Hard only
    countdown: Option<f32>,
    elapsed: f32,
}

impl CoinCollector {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            pool: vec![Coin::default(); difficulty.coin_goal() as usize],
            collected: 0,
            countdown: None,
            elapsed: 0.0,
        }
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    pub fn countdown(&self) -> Option<f32> {
        self.countdown
    }

    /// Index and coin of the live slot
    pub fn active_coin(&self) -> Option<(usize, &Coin)> {
        self.pool.iter().enumerate().find(|(_, c)| c.active)
    }

    /// Activate `slot` somewhere away from the player. Out-of-range slots are ignored.
    fn spawn(&mut self, slot: usize, rng: &mut Pcg32, player: Vec2) {
        let pos = pick_spawn(rng, player);
        if let Some(coin) = self.pool.get_mut(slot) {
            coin.pos = pos;
            coin.active = true;
        }
    }

    fn reset_countdown(&mut self) {
        self.countdown = (self.difficulty == Difficulty::Hard).then_some(HARD_COIN_TIMER_SECS);
    }
}

impl ModeEngine for CoinCollector {
    fn game_type(&self) -> GameType {
        GameType::CoinCollector
    }

    fn init(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.player.reset();
        for coin in &mut self.pool {
            coin.active = false;
        }
        self.collected = 0;
        self.elapsed = 0.0;
        self.reset_countdown();
        self.spawn(0, ctx.rng, ctx.player.pos);
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>, sample: &BalanceSample, dt: f32) -> ModeOutcome {
        self.elapsed += dt;

        let (x_cob, y_cob) = sample.trusted_cob();
        let aim = cob_to_field(x_cob, y_cob, COB_SCALE_GENERAL);
        motion::update(ctx.player, aim, dt);

        if let Some(left) = self.countdown.as_mut() {
            *left -= dt;
            if *left <= 0.0 {
                log::info!("Coin timer expired after {} coins", self.collected);
                ctx.cues.push(Cue::Loss);
                return ModeOutcome::Aborted;
            }
        }

        let reach = COIN_RADIUS * COLLECT_REACH;
        let player = ctx.player.pos;
        let Some(slot) = self
            .pool
            .iter()
            .position(|c| c.active && c.pos.distance(player) <= reach)
        else {
            return ModeOutcome::Continue;
        };

        self.pool[slot].active = false;
        self.collected += 1;
        ctx.cues.push(Cue::CoinCollected);

        if self.collected >= self.difficulty.coin_goal() {
            return ModeOutcome::Won;
        }
        self.spawn(self.collected as usize, ctx.rng, player);
        self.reset_countdown();
        ModeOutcome::Continue
    }

    fn render_state(&self) -> ModeView {
        ModeView::CoinCollector {
            coin: self.active_coin().map(|(_, c)| c.pos),
            coins: self.collected,
            goal: self.difficulty.coin_goal(),
            time_left: self.countdown.map(|t| t.max(0.0)),
        }
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
