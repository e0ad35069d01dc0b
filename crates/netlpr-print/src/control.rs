// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Control file (cfA) builder.

use netlpr_core::types::{JobContext, LineTerminator};

/// Text of a control file, ready to be announced and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRecord(String);

impl ControlRecord {
    /// Build the control file for a job.
    ///
    /// Lines, in order: `H` source host, `P` owner, `l` print the data file
    /// verbatim, `U` unlink the data file afterwards.
    pub fn build(ctx: &JobContext, terminator: LineTerminator) -> Self {
        let term = terminator.as_str();
        let data_file = ctx.data_file_name();

        let mut cfa = String::new();
        cfa.push_str(&format!("H{}{term}", ctx.hostname));
        cfa.push_str(&format!("P{}{term}", ctx.username));
        cfa.push_str(&format!("l{data_file}{term}"));
        cfa.push_str(&format!("U{data_file}{term}"));
        Self(cfa)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Byte length announced in the control file header.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ControlRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
