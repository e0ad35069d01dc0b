// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for netlpr.

use thiserror::Error;

use crate::types::JobStep;

/// Top-level error type for all netlpr operations.
#[derive(Debug, Error)]
pub enum LprError {
    // -- Connection errors --
    #[error("LPR connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("LPR connection to {addr} timed out after {secs}s")]
    ConnectTimeout { addr: String, secs: u64 },

    // -- Protocol errors --
    #[error("printer rejected {step} (ack {code:#04x})")]
    Rejected { step: JobStep, code: u8 },

    #[error("LPR {step}: {source}")]
    Transport {
        step: JobStep,
        #[source]
        source: std::io::Error,
    },

    #[error("LPR {step} timed out after {secs}s")]
    IoTimeout { step: JobStep, secs: u64 },

    #[error("malformed LPR command: {0}")]
    Malformed(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LprError {
    /// Step at which the exchange stopped, if the error came from one.
    pub fn step(&self) -> Option<JobStep> {
        match self {
            Self::Connection { .. } | Self::ConnectTimeout { .. } => Some(JobStep::Connect),
            Self::Rejected { step, .. }
            | Self::Transport { step, .. }
            | Self::IoTimeout { step, .. } => Some(*step),
            Self::Malformed(_) | Self::Config(_) | Self::Io(_) | Self::Serialization(_) => None,
        }
    }

    /// Numeric code for the error: the OS errno of a failed connect, or the
    /// ack byte the daemon answered with.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Connection { source, .. } | Self::Transport { source, .. } => {
                source.raw_os_error()
            }
            Self::Rejected { code, .. } => Some(i32::from(*code)),
            Self::Io(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LprError>;
