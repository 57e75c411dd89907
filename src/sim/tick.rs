//! Per-frame session step
//!
//! One call to [`tick`] polls the board, applies the global inactivity rule,
//! then runs whichever screen is active:
//! - Connecting: retry the board until it answers
//! - Transitioning / Winning: timed screens
//! - PlayerSelect / MainMenu / DifficultySelect: lean-and-hold menus
//! - gameplay: hand the frame to the mode engine and act on its outcome

use super::modes::{self, Difficulty, GameType, ModeContext, ModeOutcome};
use super::selection::Zone;
use super::state::{Profile, Session, SessionState};
use crate::consts::*;
use crate::cues::Cue;
use crate::persistence::RecordStore;
use crate::sensor::{BalanceSample, BalanceSensor};

/// Frames between debug telemetry lines
pub const TELEMETRY_INTERVAL_FRAMES: u64 = 60;

/// Advance the session by `dt` seconds
pub fn tick(
    session: &mut Session,
    sensor: &mut dyn BalanceSensor,
    store: &mut dyn RecordStore,
    dt: f32,
) {
    session.frame += 1;

    if session.state == SessionState::Connecting {
        match sensor.connect() {
            Ok(()) => session.enter(SessionState::Transitioning),
            Err(e) => log::trace!("Board not ready: {}", e),
        }
        return;
    }

    match sensor.poll() {
        Ok(Some(sample)) => session.sample = sample,
        Ok(None) => {}
        Err(e) => {
            log::warn!("Sensor lost ({}), back to connect screen", e);
            session.reset_to_connecting();
            return;
        }
    }

    if session.state != SessionState::Transitioning {
        if session.sample.total_weight >= MIN_TOTAL_WEIGHT {
            session.idle_timer = 0.0;
        } else {
            session.idle_timer += dt;
            if session.idle_timer >= INACTIVITY_TIMEOUT_SECS {
                log::info!("Board empty for {:.1}s, resetting", session.idle_timer);
                session.reset_to_connecting();
                return;
            }
        }
    }

    if session.frame % TELEMETRY_INTERVAL_FRAMES == 0 {
        log::debug!(
            "frame={} state={:?} cob=({:.0}, {:.0}) weight={:.0} player=({:.0}, {:.0})",
            session.frame,
            session.state,
            session.sample.x_cob,
            session.sample.y_cob,
            session.sample.total_weight,
            session.player.pos.x,
            session.player.pos.y
        );
    }

    let sample = session.sample;
    match session.state {
        SessionState::Connecting => {}
        SessionState::Transitioning => {
            session.screen_timer += dt;
            if session.screen_timer >= TRANSITION_SECS {
                session.enter(SessionState::PlayerSelect);
            }
        }
        SessionState::PlayerSelect => {
            if let Some(zone) = confirm(session, &sample, dt) {
                let name = session.profiles[zone.index()].clone();
                session.profile = Some(Profile::load(name, store));
                session.enter(SessionState::MainMenu);
            }
        }
        SessionState::MainMenu => {
            if let Some(zone) = confirm(session, &sample, dt) {
                let game = zone.pick(GameType::MENU);
                if game.needs_difficulty() {
                    session.pending_game = Some(game);
                    session.enter(SessionState::DifficultySelect);
                } else {
                    start_mode(session, store, game, Difficulty::default());
                }
            }
        }
        SessionState::DifficultySelect => {
            if let Some(zone) = confirm(session, &sample, dt) {
                let difficulty = zone.pick(Difficulty::MENU);
                match session.pending_game {
                    Some(game) => start_mode(session, store, game, difficulty),
                    None => {
                        log::warn!("Difficulty picked with no game pending");
                        session.enter(SessionState::MainMenu);
                    }
                }
            }
        }
        SessionState::BalanceHold | SessionState::CoinCollector | SessionState::Dodge => {
            step_mode(session, store, &sample, dt);
        }
        SessionState::Winning => {
            session.screen_timer += dt;
            if session.screen_timer >= WIN_SCREEN_SECS {
                session.clear_round();
                session.profile = None;
                session.enter(SessionState::PlayerSelect);
            }
        }
    }
}

/// Feed the menu debouncer; a commit plays the confirm cue
fn confirm(session: &mut Session, sample: &BalanceSample, dt: f32) -> Option<Zone> {
    let zone = session.selection.update(sample, dt)?;
    session.cues.push(Cue::SelectionConfirmed);
    Some(zone)
}

fn start_mode(session: &mut Session, store: &mut dyn RecordStore, game: GameType, difficulty: Difficulty) {
    let mut mode = modes::create(game, difficulty);
    mode.init(&mut ModeContext {
        player: &mut session.player,
        rng: &mut session.rng,
        cues: &mut session.cues,
        profile: session.profile.as_mut(),
        store: &mut *store,
    });

    log::info!("Starting {} ({})", game.as_str(), difficulty.as_str());
    session.mode = Some(mode);
    session.pending_game = None;
    session.difficulty = game.needs_difficulty().then_some(difficulty);
    session.enter(SessionState::for_game(game));
}

fn step_mode(session: &mut Session, store: &mut dyn RecordStore, sample: &BalanceSample, dt: f32) {
    let Some(mode) = session.mode.as_mut() else {
        log::warn!("{:?} without a mode engine", session.state);
        session.enter(SessionState::MainMenu);
        return;
    };

    let outcome = mode.update(
        &mut ModeContext {
            player: &mut session.player,
            rng: &mut session.rng,
            cues: &mut session.cues,
            profile: session.profile.as_mut(),
            store: &mut *store,
        },
        sample,
        dt,
    );
    let elapsed = mode.elapsed();

    match outcome {
        ModeOutcome::Continue => {}
        ModeOutcome::Won => {
            if let Some(profile) = session.profile.as_mut()
                && profile.record_win(elapsed, store)
            {
                log::info!("New best time for '{}': {:.2}s", profile.name, elapsed);
            }
            session.cues.push(Cue::Win);
            session.enter(SessionState::Winning);
        }
        ModeOutcome::Lost => session.enter(SessionState::Winning),
        ModeOutcome::Aborted => {
            session.clear_round();
            session.enter(SessionState::MainMenu);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::error::{PersistenceError, SensorError};
    use crate::persistence::{MemoryStore, ProfileRecord};
    use crate::sim::modes::{ModeEngine, ModeView};

    const DT: f32 = 1.0 / 60.0;

    fn frames(secs: f32) -> u32 {
        (secs / DT).round() as u32
    }

    #[derive(Debug, Default)]
    struct ScriptedSensor {
        sample: Option<BalanceSample>,
        refuse_connect: bool,
        dropped: bool,
    }

    impl BalanceSensor for ScriptedSensor {
        fn connect(&mut self) -> Result<(), SensorError> {
            if self.refuse_connect {
                return Err(SensorError::Unavailable("no board in range".into()));
            }
            Ok(())
        }

        fn poll(&mut self) -> Result<Option<BalanceSample>, SensorError> {
            if self.dropped {
                return Err(SensorError::Disconnected);
            }
            Ok(self.sample)
        }
    }

    /// Ends with a fixed outcome after a number of frames
    #[derive(Debug)]
    struct StubMode {
        outcome: ModeOutcome,
        after: u32,
        frames: u32,
        elapsed: f32,
    }

    impl StubMode {
        fn boxed(outcome: ModeOutcome, after: u32) -> Box<dyn ModeEngine> {
            Box::new(Self {
                outcome,
                after,
                frames: 0,
                elapsed: 0.0,
            })
        }
    }

    impl ModeEngine for StubMode {
        fn game_type(&self) -> GameType {
            GameType::BalanceHold
        }

        fn init(&mut self, _ctx: &mut ModeContext<'_>) {}

        fn update(&mut self, _ctx: &mut ModeContext<'_>, _sample: &BalanceSample, dt: f32) -> ModeOutcome {
            self.frames += 1;
            self.elapsed += dt;
            if self.frames >= self.after {
                self.outcome
            } else {
                ModeOutcome::Continue
            }
        }

        fn render_state(&self) -> ModeView {
            ModeView::BalanceHold {
                target: Vec2::ZERO,
                hold_timer: 0.0,
                hold_progress: 0.0,
                coins: 0,
                goal: 1,
            }
        }

        fn elapsed(&self) -> f32 {
            self.elapsed
        }
    }

    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn load(&self, _profile: &str) -> Option<ProfileRecord> {
            None
        }

        fn save(&mut self, _profile: &str, _record: &ProfileRecord) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("read-only")))
        }
    }

    struct Rig {
        session: Session,
        sensor: ScriptedSensor,
        store: MemoryStore,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                session: Session::new(
                    ["Player 1".into(), "Player 2".into(), "Player 3".into()],
                    11,
                ),
                sensor: ScriptedSensor::default(),
                store: MemoryStore::new(),
            }
        }

        fn step(&mut self) {
            tick(&mut self.session, &mut self.sensor, &mut self.store, DT);
        }

        fn run(&mut self, secs: f32) {
            for _ in 0..frames(secs) {
                self.step();
            }
        }

        /// Tick until `state` is reached; false on running out of time
        fn run_until(&mut self, state: SessionState, max_secs: f32) -> bool {
            for _ in 0..frames(max_secs) {
                if self.session.state() == state {
                    return true;
                }
                self.step();
            }
            self.session.state() == state
        }

        fn lean(&mut self, x_cob: f32) {
            self.sensor.sample = Some(BalanceSample::new(x_cob, 0.0, 2500.0));
        }

        fn step_off(&mut self) {
            self.sensor.sample = Some(BalanceSample::new(0.0, 0.0, 0.0));
        }

        /// Connect, sit through the intro and pick the center player
        fn to_main_menu(&mut self) {
            self.step_off();
            self.step();
            assert_eq!(self.session.state(), SessionState::Transitioning);
            assert!(self.run_until(SessionState::PlayerSelect, 2.0));
            self.lean(0.0);
            assert!(self.run_until(SessionState::MainMenu, 2.0));
        }
    }

    #[test]
    fn test_connect_intro_and_player_select() {
        let mut rig = Rig::new();
        rig.to_main_menu();

        let profile = rig.session.profile().unwrap();
        assert_eq!(profile.name, "Player 2");
        assert_eq!(rig.session.drain_cues(), vec![Cue::SelectionConfirmed]);
    }

    #[test]
    fn test_refused_connect_stays_on_connect_screen() {
        let mut rig = Rig::new();
        rig.sensor.refuse_connect = true;
        rig.run(1.0);
        assert_eq!(rig.session.state(), SessionState::Connecting);
    }

    #[test]
    fn test_left_lean_on_menu_picks_balance_hold() {
        let mut rig = Rig::new();
        rig.to_main_menu();

        rig.lean(-250.0);
        rig.run(1.6);

        assert_eq!(rig.session.state(), SessionState::DifficultySelect);
        assert_eq!(rig.session.pending_game(), Some(GameType::BalanceHold));
        assert_eq!(
            rig.session.drain_cues(),
            vec![Cue::SelectionConfirmed, Cue::SelectionConfirmed]
        );

        let snap = rig.session.snapshot();
        assert!(snap.selection.is_some());
        assert!(serde_json::to_string(&snap).is_ok());
    }

    #[test]
    fn test_center_lean_on_menu_starts_dodge() {
        let mut rig = Rig::new();
        rig.to_main_menu();

        assert!(rig.run_until(SessionState::Dodge, 2.0));
        assert_eq!(rig.session.mode().map(|m| m.game_type()), Some(GameType::Dodge));
        assert_eq!(rig.session.difficulty(), None);
    }

    #[test]
    fn test_empty_board_times_out_to_connecting() {
        let mut rig = Rig::new();
        rig.to_main_menu();

        rig.step_off();
        rig.run(14.9);
        assert_eq!(rig.session.state(), SessionState::MainMenu);
        rig.run(1.1);

        assert_eq!(rig.session.state(), SessionState::Connecting);
        assert!(rig.session.profile().is_none());
    }

    #[test]
    fn test_threshold_weight_is_not_idle() {
        let mut rig = Rig::new();
        rig.to_main_menu();

        rig.sensor.sample = Some(BalanceSample::new(0.0, 0.0, MIN_TOTAL_WEIGHT));
        rig.run(16.0);
        assert_eq!(rig.session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_disconnect_returns_to_connecting() {
        let mut rig = Rig::new();
        rig.to_main_menu();

        rig.sensor.dropped = true;
        rig.step();
        assert_eq!(rig.session.state(), SessionState::Connecting);
        assert!(rig.session.profile().is_none());

        rig.sensor.dropped = false;
        rig.step();
        assert_eq!(rig.session.state(), SessionState::Transitioning);
    }

    #[test]
    fn test_hard_coin_timeout_returns_to_menu() {
        let mut rig = Rig::new();
        rig.store.write_best_time("Player 2", 42.0).unwrap();
        rig.to_main_menu();

        rig.lean(250.0);
        assert!(rig.run_until(SessionState::DifficultySelect, 2.0));
        assert!(rig.run_until(SessionState::CoinCollector, 2.0));
        assert_eq!(rig.session.difficulty(), Some(Difficulty::Hard));

        // Player parks at center; the coin always spawns out of reach
        rig.step_off();
        assert!(rig.run_until(SessionState::MainMenu, 11.0));

        let profile = rig.session.profile().unwrap();
        assert_eq!(profile.name, "Player 2");
        assert_eq!(profile.record.best_time, Some(42.0));
        assert_eq!(rig.store.read_best_time("Player 2"), Some(42.0));
        assert_eq!(rig.store.read_win_count("Player 2"), 0);
        assert!(rig.session.mode().is_none());
        assert!(rig.session.drain_cues().contains(&Cue::Loss));
    }

    #[test]
    fn test_win_is_recorded_then_back_to_player_select() {
        let mut rig = Rig::new();
        rig.to_main_menu();
        rig.session.drain_cues();

        rig.session.mode = Some(StubMode::boxed(ModeOutcome::Won, 30));
        rig.session.enter(SessionState::BalanceHold);
        assert!(rig.run_until(SessionState::Winning, 1.0));

        let best = rig.store.read_best_time("Player 2").unwrap();
        assert!((best - 0.5).abs() < 1e-3);
        assert_eq!(rig.store.read_win_count("Player 2"), 1);
        assert_eq!(rig.session.drain_cues(), vec![Cue::Win]);
        assert!(rig.session.snapshot().mode.is_some());

        assert!(rig.run_until(SessionState::PlayerSelect, 3.0));
        assert!(rig.session.mode().is_none());
        assert!(rig.session.profile().is_none());
    }

    #[test]
    fn test_loss_goes_to_win_screen_without_record() {
        let mut rig = Rig::new();
        rig.to_main_menu();
        rig.session.drain_cues();

        rig.session.mode = Some(StubMode::boxed(ModeOutcome::Lost, 5));
        rig.session.enter(SessionState::Dodge);
        assert!(rig.run_until(SessionState::Winning, 1.0));

        assert_eq!(rig.store.read_win_count("Player 2"), 0);
        assert!(!rig.session.drain_cues().contains(&Cue::Win));
    }

    #[test]
    fn test_failing_store_keeps_session_running() {
        let mut session = Session::new(["a".into(), "b".into(), "c".into()], 3);
        let mut sensor = ScriptedSensor {
            sample: Some(BalanceSample::new(0.0, 0.0, 2500.0)),
            ..Default::default()
        };
        let mut store = BrokenStore;

        tick(&mut session, &mut sensor, &mut store, DT);
        session.profile = Some(Profile::new("a"));
        session.mode = Some(StubMode::boxed(ModeOutcome::Won, 1));
        session.enter(SessionState::CoinCollector);

        tick(&mut session, &mut sensor, &mut store, DT);
        assert_eq!(session.state(), SessionState::Winning);
        assert_eq!(session.profile().map(|p| p.record.wins), Some(1));
    }
}
