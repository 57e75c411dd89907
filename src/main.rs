//! Balance Arcade entry point
//!
//! Drives the session from a recorded board session until the recording
//! runs out. Cues go to the log in place of audio.

use std::path::PathBuf;
use std::process::ExitCode;

use balance_arcade::Settings;
use balance_arcade::cues::{CueSink, LogCueSink};
use balance_arcade::persistence::JsonFileStore;
use balance_arcade::platform::{FrameLimiter, ReplaySource};
use balance_arcade::sensor::BalanceBoard;
use balance_arcade::sim::{Session, SessionState, tick};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Balance Arcade starting...");

    let mut settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = std::env::args_os().nth(1) {
        settings.replay_path = Some(PathBuf::from(path));
    }

    let Some(replay_path) = settings.replay_path.clone() else {
        log::error!("No board session to replay; pass a path or set replay_path");
        return ExitCode::FAILURE;
    };
    let source = match ReplaySource::from_path(&replay_path) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Cannot open {}: {}", replay_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut board = BalanceBoard::new(source);
    let mut store = JsonFileStore::new(settings.data_dir.clone());
    let mut session = Session::from_settings(&settings);
    let mut cues = LogCueSink::new();
    let mut limiter = FrameLimiter::new(settings.target_fps);
    log::info!("Session seed {}", session.seed());

    let mut soundtrack = None;
    loop {
        let dt = limiter.begin_frame();
        tick(&mut session, &mut board, &mut store, dt);

        for cue in session.drain_cues() {
            cues.play(cue);
        }
        let track = session.snapshot().soundtrack;
        if soundtrack != Some(track) {
            log::info!("Music: {:?}", track);
            soundtrack = Some(track);
        }

        if board.source().is_finished() && session.state() == SessionState::Connecting {
            break;
        }
        limiter.end_frame();
    }

    match serde_json::to_string(&session.snapshot()) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not encode final snapshot: {}", e),
    }
    log::info!("Done after {} frames, {} cues", session.frame(), cues.played());
    ExitCode::SUCCESS
}
