//! Dodge: blocks stream in from the right, faster and more often over time
//!
//! Every block that leaves the left edge scores a point. The first block that
//! touches the player ends the run.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{BlockView, GameType, ModeContext, ModeEngine, ModeOutcome, ModeView};
use crate::consts::*;
use crate::cues::Cue;
use crate::sensor::BalanceSample;
use crate::sim::motion::{self, Player};
use crate::{cob_to_field, rects_overlap};

pub const MAX_DODGE_BLOCKS: usize = 10;
pub const BLOCK_WIDTH: f32 = 50.0;
pub const BLOCK_HEIGHT: f32 = 100.0;
pub const BLOCK_INITIAL_SPEED: f32 = 300.0;
/// Block speed growth (pixels/s per second)
pub const BLOCK_SPEED_INCREMENT: f32 = 50.0;
pub const BLOCK_SPAWN_INTERVAL: f32 = 2.0;
pub const MIN_SPAWN_INTERVAL: f32 = 0.5;
/// Spawn interval shrink (seconds per second)
pub const SPAWN_INTERVAL_DECAY: f32 = 0.01;

#[inline]
fn block_size() -> Vec2 {
    Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT)
}

/// Pool slot. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DodgeBlock {
    pub pos: Vec2,
    pub speed: f32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Dodge {
    blocks: [DodgeBlock; MAX_DODGE_BLOCKS],
    spawn_timer: f32,
    spawn_interval: f32,
    /// Shared by every live block
    speed: f32,
    score: u32,
    /// Best score on record for the current profile
    high_score: u32,
    elapsed: f32,
}

impl Default for Dodge {
    fn default() -> Self {
        Self::new()
    }
}

impl Dodge {
    pub fn new() -> Self {
        Self {
            blocks: [DodgeBlock::default(); MAX_DODGE_BLOCKS],
            spawn_timer: 0.0,
            spawn_interval: BLOCK_SPAWN_INTERVAL,
            speed: BLOCK_INITIAL_SPEED,
            score: 0,
            high_score: 0,
            elapsed: 0.0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn active_blocks(&self) -> impl Iterator<Item = &DodgeBlock> {
        self.blocks.iter().filter(|b| b.active)
    }

    /// Place a block at the right edge in the first free slot.
    /// Returns false (and does nothing) when the pool is full.
    fn spawn_block(&mut self, y: f32) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| !b.active) else {
            log::trace!("Dodge pool full, spawn skipped");
            return false;
        };
        *block = DodgeBlock {
            pos: Vec2::new(FIELD_WIDTH + BLOCK_WIDTH, y),
            speed: self.speed,
            active: true,
        };
        true
    }
}

impl ModeEngine for Dodge {
    fn game_type(&self) -> GameType {
        GameType::Dodge
    }

    fn init(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.player.reset();
        *self = Self::new();
        if let Some(profile) = ctx.profile.as_deref_mut() {
            profile.record.high_score = ctx.store.read_high_score(&profile.name);
            self.high_score = profile.record.high_score;
        }
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>, sample: &BalanceSample, dt: f32) -> ModeOutcome {
        self.elapsed += dt;

        // Hold still unless the player is actually leaning
        if sample.is_leaning() {
            let aim = cob_to_field(sample.x_cob, sample.y_cob, COB_SCALE_DODGE);
            motion::update(ctx.player, aim, dt);
        }

        for block in self.blocks.iter_mut().filter(|b| b.active) {
            block.speed = self.speed;
            block.pos.x -= self.speed * dt;

            if block.pos.x + BLOCK_WIDTH < 0.0 {
                block.active = false;
                self.score += 1;
                if self.score > self.high_score {
                    self.high_score = self.score;
                    if let Some(profile) = ctx.profile.as_deref_mut() {
                        profile.record_high_score(self.score, ctx.store);
                    }
                }
                continue;
            }

            if hits_player(block.pos, ctx.player) {
                log::info!("Dodge run over with {} blocks dodged", self.score);
                ctx.cues.push(Cue::Loss);
                return ModeOutcome::Lost;
            }
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            let y = ctx.rng.random_range(0.0..FIELD_HEIGHT - BLOCK_HEIGHT);
            self.spawn_block(y);
            self.spawn_timer = 0.0;
        }

        self.speed += BLOCK_SPEED_INCREMENT * dt;
        self.spawn_interval = (self.spawn_interval - SPAWN_INTERVAL_DECAY * dt).max(MIN_SPAWN_INTERVAL);

        ModeOutcome::Continue
    }

    fn render_state(&self) -> ModeView {
        ModeView::Dodge {
            blocks: self
                .active_blocks()
                .map(|b| BlockView {
                    pos: b.pos,
                    size: block_size(),
                })
                .collect(),
            score: self.score,
            high_score: self.high_score,
            speed: self.speed,
        }
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Whether a block at `pos` overlaps the player
pub fn hits_player(pos: Vec2, player: &Player) -> bool {
    rects_overlap(pos, block_size(), player.rect_min(), Vec2::splat(GAME_OBJECT_SIZE))
}
