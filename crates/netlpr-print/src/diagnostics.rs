// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-client diagnostic trail.
//
// Every protocol step appends a message; every failure appends exactly one
// error and becomes the client's "last error".  Entries are never removed, so
// the trail can be shown to whoever has to work out why a job did not print.
// Each entry is mirrored to `tracing` as it is recorded.

use tracing::{info, warn};

use netlpr_core::types::{DiagnosticEvent, EventKind};

/// Append-only log of what a client did.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    events: Vec<DiagnosticEvent>,
    last_error: Option<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational step.
    pub fn message(&mut self, message: impl Into<String>) {
        let event = DiagnosticEvent::message(message);
        info!("{}", event.message);
        self.events.push(event);
    }

    /// Record a failure and make it the last error.
    pub fn error(&mut self, message: impl Into<String>) {
        let event = DiagnosticEvent::error(message);
        warn!("{}", event.message);
        self.last_error = Some(event.message.clone());
        self.events.push(event);
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&DiagnosticEvent> {
        self.events.last()
    }

    /// Message of the most recent error, if any step has failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn error_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Plain-text dump, one entry per line.
    pub fn render_text(&self) -> String {
        let mut text = String::new();
        for event in &self.events {
            let kind = match event.kind {
                EventKind::Message => "message",
                EventKind::Error => "error",
            };
            text.push_str(&format!(
                "{} [{kind}] {}\n",
                event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                event.message
            ));
        }
        text
    }
}
