//! Balance board input
//!
//! Four pressure cells are folded into a single [`BalanceSample`]: total
//! weight plus a center-of-balance (CoB) offset on each axis. The transport
//! that produces the cells is external and sits behind [`CellSource`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SensorError;

/// Raw cells are reported in hundredths; this restores board units
const CELL_SCALE: f32 = 100.0;

/// One raw reading from the four corner cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCells {
    /// Top (front) left
    pub tl: f32,
    /// Top (front) right
    pub tr: f32,
    /// Bottom (back) left
    pub bl: f32,
    /// Bottom (back) right
    pub br: f32,
}

/// Normalized balance reading, produced once per poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSample {
    /// Right minus left (dead-zoned)
    pub x_cob: f32,
    /// Front minus back (dead-zoned)
    pub y_cob: f32,
    pub total_weight: f32,
}

impl BalanceSample {
    pub fn new(x_cob: f32, y_cob: f32, total_weight: f32) -> Self {
        Self {
            x_cob,
            y_cob,
            total_weight,
        }
    }

    /// Someone is standing on the board
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.total_weight > MIN_TOTAL_WEIGHT
    }

    /// CoB as consumers should read it: zero on an unloaded board
    #[inline]
    pub fn trusted_cob(&self) -> (f32, f32) {
        if self.is_loaded() {
            (self.x_cob, self.y_cob)
        } else {
            (0.0, 0.0)
        }
    }

    /// Loaded and leaning past the dead zone on at least one axis
    #[inline]
    pub fn is_leaning(&self) -> bool {
        self.is_loaded() && (self.x_cob.abs() > DEAD_ZONE || self.y_cob.abs() > DEAD_ZONE)
    }
}

/// Fold raw cells into a balance sample.
///
/// CoB is zeroed when the board is not loaded, and each axis is clamped to
/// zero inside the dead zone.
pub fn normalize(cells: RawCells) -> BalanceSample {
    let tl = cells.tl / CELL_SCALE;
    let tr = cells.tr / CELL_SCALE;
    let bl = cells.bl / CELL_SCALE;
    let br = cells.br / CELL_SCALE;

    let total_weight = (tl + tr + bl + br) * CELL_SCALE;
    if total_weight <= MIN_TOTAL_WEIGHT {
        return BalanceSample::new(0.0, 0.0, total_weight);
    }

    let mut x_cob = ((tr + br) - (tl + bl)) * CELL_SCALE;
    let mut y_cob = ((tl + tr) - (bl + br)) * CELL_SCALE;
    if x_cob.abs() < DEAD_ZONE {
        x_cob = 0.0;
    }
    if y_cob.abs() < DEAD_ZONE {
        y_cob = 0.0;
    }

    BalanceSample::new(x_cob, y_cob, total_weight)
}

/// Low-level transport delivering raw cells (Bluetooth, replay file, ...)
pub trait CellSource {
    /// Find and open the board
    fn open(&mut self) -> Result<(), SensorError>;

    /// Wait up to `timeout` for a reading. `Ok(None)` means nothing arrived.
    fn read(&mut self, timeout: Duration) -> Result<Option<RawCells>, SensorError>;
}

/// What the session engine needs from the board
pub trait BalanceSensor {
    /// Try to (re)connect. Called every frame while on the connect screen.
    fn connect(&mut self) -> Result<(), SensorError>;

    /// Poll once. `Ok(None)` is an empty poll; any error means the board is gone.
    fn poll(&mut self) -> Result<Option<BalanceSample>, SensorError>;
}

/// Sensor adapter over a [`CellSource`] that watches for silent boards
#[derive(Debug)]
pub struct BalanceBoard<S> {
    source: S,
    connected: bool,
    empty_polls: u32,
    poll_timeout: Duration,
}

impl<S: CellSource> BalanceBoard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            connected: false,
            empty_polls: 0,
            poll_timeout: Duration::from_millis(POLL_TIMEOUT_MS),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Consecutive polls that returned nothing
    pub fn empty_polls(&self) -> u32 {
        self.empty_polls
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: CellSource> BalanceSensor for BalanceBoard<S> {
    fn connect(&mut self) -> Result<(), SensorError> {
        self.empty_polls = 0;
        self.source.open()?;
        self.connected = true;
        log::info!("Balance board connected");
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<BalanceSample>, SensorError> {
        if !self.connected {
            return Err(SensorError::Disconnected);
        }

        match self.source.read(self.poll_timeout) {
            Ok(Some(cells)) => {
                self.empty_polls = 0;
                Ok(Some(normalize(cells)))
            }
            Ok(None) => {
                self.empty_polls += 1;
                if self.empty_polls >= POLL_TIMEOUT_THRESHOLD {
                    self.connected = false;
                    log::warn!("Board timeout after {} empty polls", self.empty_polls);
                    Err(SensorError::Timeout {
                        polls: self.empty_polls,
                    })
                } else {
                    Ok(None)
                }
            }
            Err(e) => {
                self.connected = false;
                log::warn!("Balance board lost: {}", e);
                Err(e)
            }
        }
    }
}
