// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the netlpr line-printer client.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default LPD port (RFC 1179).
pub const LPR_PORT: u16 = 515;

/// Queue used when the caller does not name one.
pub const DEFAULT_QUEUE: &str = "raw";

/// Largest job number a control/data file name may carry.
pub const MAX_JOB_NUMBER: u32 = 999;

static NEXT_JOB_NUMBER: AtomicU32 = AtomicU32::new(1);

/// Job number embedded in the `cfA`/`dfA` file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobNumber(pub u32);

impl JobNumber {
    /// Take the next number from the process-wide counter.
    ///
    /// Numbers run from 1 to [`MAX_JOB_NUMBER`] and then wrap back to 1.
    pub fn next() -> Self {
        let prev = NEXT_JOB_NUMBER
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(if n >= MAX_JOB_NUMBER { 1 } else { n + 1 })
            })
            .unwrap_or(1);
        Self(prev)
    }
}

impl std::fmt::Display for JobNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a client picks the job number for each transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobNumbering {
    /// Draw from the process-wide counter.
    Sequential,
    /// Always use the same number (some daemons were only ever tested with `1`).
    Fixed(u32),
}

impl JobNumbering {
    pub fn allocate(&self) -> JobNumber {
        match self {
            Self::Sequential => JobNumber::next(),
            Self::Fixed(n) => JobNumber(*n),
        }
    }
}

/// Terminator appended to command lines and control-file lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTerminator {
    /// The two characters `\` and `n`, as sent by the historical client.
    Literal,
    /// A real line feed (0x0A), as RFC 1179 daemons expect.
    LineFeed,
}

impl LineTerminator {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Literal => b"\\n",
            Self::LineFeed => b"\n",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "\\n",
            Self::LineFeed => "\n",
        }
    }
}

/// Daemon address a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterTarget {
    pub host: String,
    pub port: u16,
}

impl PrinterTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` form used for connecting and in log fields.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything the control and data records are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub job: JobNumber,
    /// Job owner, sent in the `P` line and the control file name.
    pub username: String,
    /// Source host, sent in the `H` line and the data file name. May be empty.
    pub hostname: String,
    pub queue: String,
}

impl JobContext {
    /// Name of the data file (`dfA<job><hostname>`).
    pub fn data_file_name(&self) -> String {
        format!("dfA{}{}", self.job, self.hostname)
    }

    /// Name of the control file (`cfA<job><username>`).
    pub fn control_file_name(&self) -> String {
        format!("cfA{}{}", self.job, self.username)
    }
}

/// Protocol steps of a transmission, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStep {
    Connect,
    /// `0x01` print-waiting-jobs command.
    QueueSelect,
    /// `0x02` receive-job command.
    StartJob,
    ControlHeader,
    ControlBody,
    DataHeader,
    DataBody,
}

impl JobStep {
    /// Step label used in log fields and error text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::QueueSelect => "print waiting jobs",
            Self::StartJob => "receive job",
            Self::ControlHeader => "control file header",
            Self::ControlBody => "control file body",
            Self::DataHeader => "data file header",
            Self::DataBody => "data file body",
        }
    }
}

impl std::fmt::Display for JobStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Message,
    Error,
}

/// One entry in a client's diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl DiagnosticEvent {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            kind: EventKind::Message,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            kind: EventKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == EventKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> JobContext {
        JobContext {
            job: JobNumber(7),
            username: "alice".into(),
            hostname: "desk".into(),
            queue: DEFAULT_QUEUE.into(),
        }
    }

    #[test]
    fn file_names_follow_historical_layout() {
        let ctx = context();
        assert_eq!(ctx.control_file_name(), "cfA7alice");
        assert_eq!(ctx.data_file_name(), "dfA7desk");
    }

    #[test]
    fn fixed_numbering_never_changes() {
        let numbering = JobNumbering::Fixed(1);
        assert_eq!(numbering.allocate(), JobNumber(1));
        assert_eq!(numbering.allocate(), JobNumber(1));
    }

    #[test]
    fn sequential_numbers_stay_in_range() {
        for _ in 0..(MAX_JOB_NUMBER * 2) {
            let n = JobNumbering::Sequential.allocate().0;
            assert!((1..=MAX_JOB_NUMBER).contains(&n));
        }
    }

    #[test]
    fn terminators_render_as_expected() {
        assert_eq!(LineTerminator::Literal.as_bytes(), b"\\n");
        assert_eq!(LineTerminator::Literal.as_bytes().len(), 2);
        assert_eq!(LineTerminator::LineFeed.as_bytes(), b"\n");
    }

    #[test]
    fn target_addr_joins_host_and_port() {
        let target = PrinterTarget::new("192.168.1.136", LPR_PORT);
        assert_eq!(target.addr(), "192.168.1.136:515");
    }

    #[test]
    fn event_constructors_set_kind() {
        assert!(!DiagnosticEvent::message("ok").is_error());
        assert!(DiagnosticEvent::error("bad").is_error());
    }
}
