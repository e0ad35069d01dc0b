// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LprError, Result};
use crate::types::{DEFAULT_QUEUE, JobNumbering, LPR_PORT, LineTerminator, MAX_JOB_NUMBER};

/// Settings for an `LprClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Daemon port (default 515).
    pub port: u16,
    /// Upper bound on connection establishment, in seconds.
    pub connect_timeout_secs: u64,
    /// Upper bound on each write + ack exchange. `None` waits forever.
    pub io_timeout_secs: Option<u64>,
    /// Job owner sent in the control file.
    pub username: String,
    /// Send an empty source hostname instead of the local one.
    pub use_empty_hostname: bool,
    pub line_terminator: LineTerminator,
    pub job_numbering: JobNumbering,
    /// Queue used by front ends when none is given.
    pub default_queue: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: LPR_PORT,
            connect_timeout_secs: 30,
            io_timeout_secs: None,
            username: "netlpr".into(),
            use_empty_hostname: false,
            line_terminator: LineTerminator::Literal,
            job_numbering: JobNumbering::Sequential,
            default_queue: DEFAULT_QUEUE.into(),
        }
    }
}

impl ClientConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no daemon exchange could work with.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(LprError::Config("port must be non-zero".into()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(LprError::Config("connect timeout must be at least 1s".into()));
        }
        if self.io_timeout_secs == Some(0) {
            return Err(LprError::Config("I/O timeout must be at least 1s".into()));
        }
        if let JobNumbering::Fixed(n) = self.job_numbering {
            if n == 0 || n > MAX_JOB_NUMBER {
                return Err(LprError::Config(format!(
                    "fixed job number must be between 1 and {MAX_JOB_NUMBER}, got {n}"
                )));
            }
        }
        if self.default_queue.is_empty() {
            return Err(LprError::Config("default queue must not be empty".into()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs.map(Duration::from_secs)
    }
}
