//! Dwell-based menu selection
//!
//! Every menu screen offers three choices laid out left, center and right.
//! The player leans toward one and holds it; a [`SelectionDebouncer`] commits
//! once the same zone has been held continuously for the dwell time.

use serde::{Deserialize, Serialize};

use crate::consts::SELECT_DWELL_SECS;
use crate::sensor::BalanceSample;

/// One of the three selectable screen zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Left,
    Center,
    Right,
}

impl Zone {
    /// Pick the option laid out in this zone (`[left, center, right]`)
    #[inline]
    pub fn pick<T: Copy>(self, options: [T; 3]) -> T {
        match self {
            Zone::Left => options[0],
            Zone::Center => options[1],
            Zone::Right => options[2],
        }
    }

    pub fn index(self) -> usize {
        self.pick([0, 1, 2])
    }
}

/// x-CoB bands for the three zones. The gaps between them select nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneThresholds {
    /// |x| beyond this selects a side
    pub side: f32,
    /// |x| under this selects the center
    pub center: f32,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            side: 200.0,
            center: 150.0,
        }
    }
}

impl ZoneThresholds {
    /// Zone the sample points at, if any. An unloaded board points nowhere.
    pub fn classify(&self, sample: &BalanceSample) -> Option<Zone> {
        if !sample.is_loaded() {
            return None;
        }
        let x = sample.x_cob;
        if x < -self.side {
            Some(Zone::Left)
        } else if x.abs() < self.center {
            Some(Zone::Center)
        } else if x > self.side {
            Some(Zone::Right)
        } else {
            None
        }
    }
}

/// Timed dwell selector shared by all menu screens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionDebouncer {
    thresholds: ZoneThresholds,
    dwell_required: f32,
    candidate: Option<Zone>,
    dwell: f32,
}

impl Default for SelectionDebouncer {
    fn default() -> Self {
        Self::new(ZoneThresholds::default(), SELECT_DWELL_SECS)
    }
}

impl SelectionDebouncer {
    pub fn new(thresholds: ZoneThresholds, dwell_required: f32) -> Self {
        Self {
            thresholds,
            dwell_required,
            candidate: None,
            dwell: 0.0,
        }
    }

    /// Feed one frame. Returns the committed zone on the frame the dwell
    /// completes; the dwell restarts from zero afterwards.
    pub fn update(&mut self, sample: &BalanceSample, dt: f32) -> Option<Zone> {
        let zone = self.thresholds.classify(sample);
        if zone != self.candidate {
            self.candidate = zone;
            self.dwell = 0.0;
        }

        let zone = zone?;
        self.dwell += dt;
        if self.dwell >= self.dwell_required {
            self.dwell = 0.0;
            return Some(zone);
        }
        None
    }

    /// Forget the current candidate (on screen entry)
    pub fn reset(&mut self) {
        self.candidate = None;
        self.dwell = 0.0;
    }

    pub fn candidate(&self) -> Option<Zone> {
        self.candidate
    }

    pub fn dwell(&self) -> f32 {
        self.dwell
    }

    /// Dwell progress in [0, 1] for the highlight bar
    pub fn progress(&self) -> f32 {
        (self.dwell / self.dwell_required).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn lean(x: f32) -> BalanceSample {
        BalanceSample::new(x, 0.0, 2500.0)
    }

    #[test]
    fn test_classify_bands() {
        let t = ZoneThresholds::default();
        assert_eq!(t.classify(&lean(-250.0)), Some(Zone::Left));
        assert_eq!(t.classify(&lean(0.0)), Some(Zone::Center));
        assert_eq!(t.classify(&lean(149.0)), Some(Zone::Center));
        assert_eq!(t.classify(&lean(175.0)), None);
        assert_eq!(t.classify(&lean(-200.0)), None);
        assert_eq!(t.classify(&lean(201.0)), Some(Zone::Right));
        assert_eq!(t.classify(&BalanceSample::new(-900.0, 0.0, 1000.0)), None);
    }

    #[test]
    fn test_commits_once_after_dwell() {
        let mut deb = SelectionDebouncer::default();
        let mut commits = Vec::new();
        // 1.6s of holding left
        for _ in 0..96 {
            if let Some(z) = deb.update(&lean(-250.0), DT) {
                commits.push(z);
            }
        }
        assert_eq!(commits, vec![Zone::Left]);
        assert!(deb.dwell() < 0.2);
    }

    #[test]
    fn test_switch_resets_dwell() {
        let mut deb = SelectionDebouncer::default();
        for _ in 0..80 {
            assert!(deb.update(&lean(-250.0), DT).is_none());
        }
        assert!(deb.progress() > 0.8);

        // Switching to center throws away the left progress
        assert!(deb.update(&lean(0.0), DT).is_none());
        assert_eq!(deb.candidate(), Some(Zone::Center));
        assert!((deb.dwell() - DT).abs() < 1e-6);
    }

    #[test]
    fn test_stepping_off_clears_candidate() {
        let mut deb = SelectionDebouncer::default();
        deb.update(&lean(300.0), 1.0);
        deb.update(&BalanceSample::default(), 1.0);
        assert_eq!(deb.candidate(), None);
        assert_eq!(deb.dwell(), 0.0);
        assert!(deb.update(&lean(300.0), 1.0).is_none());
    }

    #[test]
    fn test_zone_pick() {
        assert_eq!(Zone::Left.pick(["a", "b", "c"]), "a");
        assert_eq!(Zone::Right.index(), 2);
    }

    proptest! {
        #[test]
        fn prop_dwell_bounded_by_time_since_change(
            xs in proptest::collection::vec(-600.0f32..600.0, 1..300),
            dt in 0.005f32..0.1,
        ) {
            let mut deb = SelectionDebouncer::default();
            let mut since_change = 0.0f32;
            let mut last = None;
            for x in xs {
                let sample = lean(x);
                let zone = ZoneThresholds::default().classify(&sample);
                if zone != last {
                    since_change = 0.0;
                    last = zone;
                }
                if zone.is_some() {
                    since_change += dt;
                }
                let committed = deb.update(&sample, dt);
                prop_assert!(deb.dwell() <= since_change + 1e-4);
                prop_assert!(deb.dwell() < SELECT_DWELL_SECS);
                if committed.is_some() {
                    prop_assert_eq!(committed, zone);
                    prop_assert!(since_change + 1e-4 >= SELECT_DWELL_SECS);
                }
            }
        }
    }
}
