//! Presentation/audio cues
//!
//! The session never plays sounds itself. It emits discrete [`Cue`]s and
//! reports which [`Soundtrack`] should be looping; whatever sits on the other
//! side (SDL mixer, web audio, a log) maps them to assets.

use serde::{Deserialize, Serialize};

/// Discrete one-shot cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// A dwell selection committed
    SelectionConfirmed,
    /// Balance-Hold target held long enough
    TargetReached,
    /// A running hold was broken
    Reset,
    /// Coin picked up
    CoinCollected,
    /// Round won
    Win,
    /// Round lost (Dodge collision, Coin-Collector timeout)
    Loss,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::SelectionConfirmed => "selection_confirmed",
            Cue::TargetReached => "target_reached",
            Cue::Reset => "reset",
            Cue::CoinCollected => "coin_collected",
            Cue::Win => "win",
            Cue::Loss => "loss",
        }
    }
}

/// Background music the presentation layer should have playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Soundtrack {
    ConnectionIntro,
    Transition,
    MainLoop,
}

/// Receiver for cues drained from the session each frame
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Cue sink that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogCueSink {
    played: u64,
}

impl LogCueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> u64 {
        self.played
    }
}

impl CueSink for LogCueSink {
    fn play(&mut self, cue: Cue) {
        self.played += 1;
        log::info!("cue: {}", cue.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sink_counts() {
        let mut sink = LogCueSink::new();
        sink.play(Cue::Win);
        sink.play(Cue::Reset);
        assert_eq!(sink.played(), 2);
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(Cue::SelectionConfirmed.as_str(), "selection_confirmed");
        assert_eq!(Cue::CoinCollected.as_str(), "coin_collected");
    }
}
