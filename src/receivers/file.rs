use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, RouteArtError};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Replays a recorded walk, one payload per line.
pub struct FileReceiver {
    path: PathBuf,
    wait: Duration,
    line: usize,
}

impl FileReceiver {
    pub fn new(path: impl Into<PathBuf>, wait: Duration) -> Self {
        Self {
            path: path.into(),
            wait,
            line: 0,
        }
    }

    /// Next line of the file after the simulated receive latency.
    ///
    /// The file is re-read on every call so a recording that is still
    /// being appended to keeps yielding lines.
    pub async fn get_raw_location_data(&mut self) -> Result<String> {
        log_info!("Retrieving next example gps line from {}", self.path.display());
        log_debug!("Sleeping {:?} to mimic the socket receiver", self.wait);
        tokio::time::sleep(self.wait).await;

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let Some(line) = contents.lines().nth(self.line) else {
            return Err(RouteArtError::DataExhausted {
                file: self.path.clone(),
                line: self.line,
            });
        };

        self.line += 1;
        log_debug!("Retrieved example gps line {}", self.line);
        Ok(line.trim().to_string())
    }
}
