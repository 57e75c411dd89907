//! Recorded board sessions
//!
//! One JSON value per line: a `{"tl", "tr", "bl", "br"}` object for a
//! reading, `null` for a poll that saw nothing. End of input is a
//! disconnect. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use crate::error::SensorError;
use crate::sensor::{CellSource, RawCells};

#[derive(Debug)]
pub struct ReplaySource<R> {
    reader: R,
    line: String,
    opened: bool,
    finished: bool,
    frames: u64,
}

impl ReplaySource<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, SensorError> {
        let file = File::open(path)?;
        log::info!("Replaying board session from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            opened: false,
            finished: false,
            frames: 0,
        }
    }

    /// True once the recording has run out
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Lines consumed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<R: BufRead> CellSource for ReplaySource<R> {
    fn open(&mut self) -> Result<(), SensorError> {
        if self.finished {
            return Err(SensorError::Unavailable("replay finished".into()));
        }
        self.opened = true;
        Ok(())
    }

    fn read(&mut self, _timeout: Duration) -> Result<Option<RawCells>, SensorError> {
        if !self.opened || self.finished {
            return Err(SensorError::Disconnected);
        }

        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                self.finished = true;
                log::info!("Replay ended after {} frames", self.frames);
                return Err(SensorError::Disconnected);
            }
            let text = self.line.trim();
            if text.is_empty() {
                continue;
            }

            self.frames += 1;
            return match serde_json::from_str::<Option<RawCells>>(text) {
                Ok(cells) => Ok(cells),
                Err(e) => {
                    log::warn!("Bad replay line {}: {}", self.frames, e);
                    Ok(None)
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const WAIT: Duration = Duration::from_millis(1);

    fn source(text: &str) -> ReplaySource<Cursor<Vec<u8>>> {
        ReplaySource::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_reads_cells_nulls_and_eof() {
        let mut replay = source(
            "{\"tl\":10.0,\"tr\":20.0,\"bl\":30.0,\"br\":40.0}\n\nnull\n",
        );
        replay.open().unwrap();

        let cells = replay.read(WAIT).unwrap().unwrap();
        assert_eq!(cells.br, 40.0);
        assert_eq!(replay.read(WAIT).unwrap(), None);
        assert!(matches!(replay.read(WAIT), Err(SensorError::Disconnected)));
        assert!(replay.is_finished());
        assert_eq!(replay.frames(), 2);
        assert!(replay.open().is_err());
    }

    #[test]
    fn test_read_before_open_is_disconnected() {
        let mut replay = source("null\n");
        assert!(matches!(replay.read(WAIT), Err(SensorError::Disconnected)));
    }

    #[test]
    fn test_bad_line_is_empty_poll() {
        let mut replay = source("{oops}\nnull\n");
        replay.open().unwrap();
        assert_eq!(replay.read(WAIT).unwrap(), None);
        assert_eq!(replay.read(WAIT).unwrap(), None);
    }
}
