// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// netlpr-print: RFC 1179 job transmission.  This crate bridges between the
// core domain types defined in `netlpr-core` and the line printer daemon on
// the other end of a TCP connection.

pub mod control;
pub mod diagnostics;
pub mod hostname;
pub mod lpr_client;
pub mod transport;
pub mod wire;

pub use control::ControlRecord;
pub use diagnostics::DiagnosticLog;
pub use lpr_client::LprClient;
pub use transport::{Connector, TcpConnector};
pub use wire::Command;
