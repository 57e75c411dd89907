//! Balance-Hold: keep the player on a (possibly drifting) target
//!
//! Holding within [`HOLD_RADIUS`] of the target for [`HOLD_TIME_SECS`] scores
//! one point and spawns a fresh target. Drifting out resets the hold.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{Difficulty, GameType, ModeContext, ModeEngine, ModeOutcome, ModeView};
use crate::consts::*;
use crate::cues::Cue;
use crate::sensor::BalanceSample;
use crate::sim::motion;
use crate::cob_to_field;

/// Seconds inside the hold radius to score
pub const HOLD_TIME_SECS: f32 = 1.5;
/// Player-to-target distance that counts as holding
pub const HOLD_RADIUS: f32 = 100.0;
/// Moving targets bounce off a border inset by this much
pub const GRACE_ZONE_RADIUS: f32 = 200.0;

impl Difficulty {
    /// Targets needed to win
    pub fn hold_goal(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 25,
        }
    }

    /// Target drift speed per axis (pixels/s)
    pub fn target_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Medium => 25.0,
            Difficulty::Hard => 50.0,
        }
    }
}

/// The spot to hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Target {
    /// Random in-bounds spot with a diagonal drift of `speed`
    pub fn spawn(rng: &mut Pcg32, speed: f32) -> Self {
        let pos = Vec2::new(
            rng.random_range(GAME_OBJECT_SIZE..FIELD_WIDTH - GAME_OBJECT_SIZE),
            rng.random_range(GAME_OBJECT_SIZE..FIELD_HEIGHT - GAME_OBJECT_SIZE),
        );
        let sx = if rng.random_bool(0.5) { speed } else { -speed };
        let sy = if rng.random_bool(0.5) { speed } else { -speed };
        Self {
            pos,
            vel: Vec2::new(sx, sy),
        }
    }

    /// Drift and bounce off the inset border
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;

        let min = Vec2::splat(GRACE_ZONE_RADIUS);
        let max = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT) - min;
        // Velocity always points back inside; a target in the band walks out
        if self.pos.x < min.x {
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > max.x {
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y < min.y {
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y > max.y {
            self.vel.y = -self.vel.y.abs();
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalanceHold {
    difficulty: Difficulty,
    target: Target,
    hold_timer: f32,
    coins: u32,
    elapsed: f32,
}

impl BalanceHold {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            target: Target::default(),
            hold_timer: 0.0,
            coins: 0,
            elapsed: 0.0,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn hold_timer(&self) -> f32 {
        self.hold_timer
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn hold_progress(&self) -> f32 {
        (self.hold_timer / HOLD_TIME_SECS).clamp(0.0, 1.0)
    }
}

impl ModeEngine for BalanceHold {
    fn game_type(&self) -> GameType {
        GameType::BalanceHold
    }

    fn init(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.player.reset();
        self.target = Target::spawn(ctx.rng, self.difficulty.target_speed());
        self.hold_timer = 0.0;
        self.coins = 0;
        self.elapsed = 0.0;
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>, sample: &BalanceSample, dt: f32) -> ModeOutcome {
        self.elapsed += dt;

        let (x_cob, y_cob) = sample.trusted_cob();
        let aim = cob_to_field(x_cob, y_cob, COB_SCALE_GENERAL);
        motion::update(ctx.player, aim, dt);
        self.target.advance(dt);

        if ctx.player.pos.distance(self.target.pos) <= HOLD_RADIUS {
            self.hold_timer += dt;
        } else {
            self.hold_timer = 0.0;
            ctx.cues.push(Cue::Reset);
        }

        if self.hold_timer >= HOLD_TIME_SECS {
            self.coins += 1;
            ctx.cues.push(Cue::TargetReached);
            log::debug!("Target {} of {} held", self.coins, self.difficulty.hold_goal());

            if self.coins >= self.difficulty.hold_goal() {
                return ModeOutcome::Won;
            }
            // Fresh round: player back to center, mode clock keeps running
            ctx.player.reset();
            self.target = Target::spawn(ctx.rng, self.difficulty.target_speed());
            self.hold_timer = 0.0;
        }

        ModeOutcome::Continue
    }

    fn render_state(&self) -> ModeView {
        ModeView::BalanceHold {
            target: self.target.pos,
            hold_timer: self.hold_timer,
            hold_progress: self.hold_progress(),
            coins: self.coins,
            goal: self.difficulty.hold_goal(),
        }
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
