// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte-stream transport to the print daemon.
//
// The client only needs "give me a stream to host:port within this long".
// Production code uses plain TCP; tests plug in in-memory pipes.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info};

use netlpr_core::error::{LprError, Result};
use netlpr_core::types::PrinterTarget;

/// Opens connections to a print daemon.
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Connect to `target`, giving up after `timeout`.
    ///
    /// The timeout covers connection establishment only.
    fn connect(
        &self,
        target: &PrinterTarget,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// TCP connector used against real daemons.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, target: &PrinterTarget, timeout: Duration) -> Result<TcpStream> {
        let addr = target.addr();
        info!(addr = %addr, timeout_secs = timeout.as_secs(), "connecting via LPR");

        let stream = tokio::time::timeout(timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| LprError::ConnectTimeout {
                addr: addr.clone(),
                secs: timeout.as_secs(),
            })?
            .map_err(|source| LprError::Connection {
                addr: addr.clone(),
                source,
            })?;

        // Every write is followed by a one-byte read; don't let Nagle hold it back.
        if let Err(e) = stream.set_nodelay(true) {
            debug!(addr = %addr, error = %e, "could not set TCP_NODELAY");
        }

        Ok(stream)
    }
}
