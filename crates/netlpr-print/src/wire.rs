// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// LPD command lines (RFC 1179 subset) as spoken by this client.
//
// A transmission is a top-level command (0x01 or 0x02 followed by a queue
// name), optionally followed by receive-job subcommands that announce a
// control or data file by byte length and name.  Each announced file is sent
// right after its subcommand and terminated by a single zero byte.  The daemon
// answers every line and every file with one acknowledgement byte.

use netlpr_core::error::{LprError, Result};
use netlpr_core::types::{JobStep, LineTerminator};

// ---------------------------------------------------------------------------
// Command bytes (RFC 1179 SS5, SS6)
// ---------------------------------------------------------------------------

/// Print any waiting jobs.
pub const CMD_PRINT_WAITING: u8 = 0x01;

/// Receive a printer job.
pub const CMD_RECEIVE_JOB: u8 = 0x02;

/// Receive control file (receive-job subcommand).
pub const SUB_RECEIVE_CONTROL_FILE: u8 = 0x02;

/// Receive data file (receive-job subcommand).
pub const SUB_RECEIVE_DATA_FILE: u8 = 0x03;

/// Positive acknowledgement.
pub const ACK_OK: u8 = 0x00;

/// Byte sent after the last byte of a control or data file.
pub const RECORD_END: u8 = 0x00;

/// One command line of the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    PrintWaitingJobs { queue: String },
    ReceiveJob { queue: String },
    ReceiveControlFile { len: usize, name: String },
    ReceiveDataFile { len: usize, name: String },
}

impl Command {
    /// Encode as it goes on the wire, terminator included.
    pub fn encode(&self, terminator: LineTerminator) -> Vec<u8> {
        let (opcode, operand) = match self {
            Self::PrintWaitingJobs { queue } => (CMD_PRINT_WAITING, queue.clone()),
            Self::ReceiveJob { queue } => (CMD_RECEIVE_JOB, queue.clone()),
            Self::ReceiveControlFile { len, name } => {
                (SUB_RECEIVE_CONTROL_FILE, format!("{len} {name}"))
            }
            Self::ReceiveDataFile { len, name } => (SUB_RECEIVE_DATA_FILE, format!("{len} {name}")),
        };

        let term = terminator.as_bytes();
        let mut buf = Vec::with_capacity(1 + operand.len() + term.len());
        buf.push(opcode);
        buf.extend_from_slice(operand.as_bytes());
        buf.extend_from_slice(term);
        buf
    }

    /// Step this command belongs to.
    pub fn step(&self) -> JobStep {
        match self {
            Self::PrintWaitingJobs { .. } => JobStep::QueueSelect,
            Self::ReceiveJob { .. } => JobStep::StartJob,
            Self::ReceiveControlFile { .. } => JobStep::ControlHeader,
            Self::ReceiveDataFile { .. } => JobStep::DataHeader,
        }
    }

    /// Length of the file this command announces, if any.
    pub fn file_len(&self) -> Option<usize> {
        match self {
            Self::ReceiveControlFile { len, .. } | Self::ReceiveDataFile { len, .. } => Some(*len),
            _ => None,
        }
    }

    /// Parse the first line of a connection.
    pub fn parse_top_level(line: &[u8], terminator: LineTerminator) -> Result<Self> {
        let (opcode, operand) = split_line(line, terminator)?;
        match opcode {
            CMD_PRINT_WAITING => Ok(Self::PrintWaitingJobs { queue: operand }),
            CMD_RECEIVE_JOB => Ok(Self::ReceiveJob { queue: operand }),
            other => Err(LprError::Malformed(format!(
                "unsupported command byte {other:#04x}"
            ))),
        }
    }

    /// Parse a line received after a receive-job command was accepted.
    pub fn parse_subcommand(line: &[u8], terminator: LineTerminator) -> Result<Self> {
        let (opcode, operand) = split_line(line, terminator)?;
        let (len, name) = operand
            .split_once(' ')
            .ok_or_else(|| LprError::Malformed(format!("missing file name in {operand:?}")))?;
        let len: usize = len
            .parse()
            .map_err(|e| LprError::Malformed(format!("bad file length {len:?}: {e}")))?;
        let name = name.to_string();

        match opcode {
            SUB_RECEIVE_CONTROL_FILE => Ok(Self::ReceiveControlFile { len, name }),
            SUB_RECEIVE_DATA_FILE => Ok(Self::ReceiveDataFile { len, name }),
            other => Err(LprError::Malformed(format!(
                "unsupported subcommand byte {other:#04x}"
            ))),
        }
    }
}

/// Split a line into its opcode and UTF-8 operand, dropping the terminator.
fn split_line(line: &[u8], terminator: LineTerminator) -> Result<(u8, String)> {
    let line = line.strip_suffix(terminator.as_bytes()).unwrap_or(line);
    let (&opcode, operand) = line
        .split_first()
        .ok_or_else(|| LprError::Malformed("empty command line".into()))?;
    let operand = std::str::from_utf8(operand)
        .map_err(|e| LprError::Malformed(format!("operand is not UTF-8: {e}")))?;
    Ok((opcode, operand.to_string()))
}
