// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// LPR/LPD client (RFC 1179) for legacy printers.
//
// One job per connection: open the connection, announce a job for a queue,
// send the control file (metadata), then the data file (document bytes).
// Every line and every file is answered by a single ack byte; anything but
// zero aborts the job and nothing further is written.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use netlpr_core::config::ClientConfig;
use netlpr_core::error::{LprError, Result};
use netlpr_core::types::{JobContext, JobStep, PrinterTarget};

use crate::control::ControlRecord;
use crate::diagnostics::DiagnosticLog;
use crate::hostname::source_hostname;
use crate::transport::{Connector, TcpConnector};
use crate::wire::{ACK_OK, Command, RECORD_END};

/// Client for a single LPD daemon.
///
/// Setters and sends both take `&mut self`, so settings cannot change while a
/// job is on the wire.
pub struct LprClient<C = TcpConnector> {
    target: PrinterTarget,
    config: ClientConfig,
    connector: C,
    log: DiagnosticLog,
    last_error_number: Option<i32>,
}

impl LprClient<TcpConnector> {
    /// Client for `host` on the default port with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_config(host, ClientConfig::default())
    }

    pub fn with_config(host: impl Into<String>, config: ClientConfig) -> Self {
        Self::with_connector(host, config, TcpConnector)
    }
}

impl<C: Connector> LprClient<C> {
    pub fn with_connector(host: impl Into<String>, config: ClientConfig, connector: C) -> Self {
        Self {
            target: PrinterTarget::new(host, config.port),
            config,
            connector,
            log: DiagnosticLog::new(),
            last_error_number: None,
        }
    }

    pub fn target(&self) -> &PrinterTarget {
        &self.target
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -- Settings -------------------------------------------------------------

    pub fn set_port(&mut self, port: u16) {
        self.target.port = port;
        self.config.port = port;
        self.log.message(format!("Setting port: {port}"));
    }

    /// Connect timeout in seconds.
    pub fn set_timeout(&mut self, secs: u64) {
        self.config.connect_timeout_secs = secs;
        self.log.message(format!("Setting time out: {secs}"));
    }

    /// Deadline for each write + ack exchange; `None` waits forever.
    pub fn set_io_timeout(&mut self, secs: Option<u64>) {
        self.config.io_timeout_secs = secs;
        match secs {
            Some(secs) => self.log.message(format!("Setting I/O time out: {secs}")),
            None => self.log.message("Clearing I/O time out"),
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.config.username = username.into();
        self.log
            .message(format!("Setting username: {}", self.config.username));
    }

    // -- Results --------------------------------------------------------------

    /// OS error code of the last failed connect, or the last rejecting ack byte.
    pub fn last_error_number(&self) -> Option<i32> {
        self.last_error_number
    }

    /// Step-specific text of the last failure. The same step always yields
    /// the same text; the cause is carried by the returned `LprError`.
    pub fn last_error(&self) -> Option<&str> {
        self.log.last_error()
    }

    pub fn debug_log(&self) -> &DiagnosticLog {
        &self.log
    }

    // -- Commands -------------------------------------------------------------

    /// Ask the daemon to start printing whatever is waiting in `queue`.
    pub async fn print_waiting_jobs(&mut self, queue: &str) -> Result<()> {
        self.check_config()?;
        let mut stream = self.connect().await?;

        let line = Command::PrintWaitingJobs {
            queue: queue.to_string(),
        }
        .encode(self.config.line_terminator);
        self.log.message("Print any waiting job...");

        let outcome = exchange(
            &mut stream,
            JobStep::QueueSelect,
            &[line.as_slice()],
            self.config.io_timeout(),
        )
        .await;

        if let Err(e) = &outcome {
            self.record_failure(e, queue);
        }
        close(stream).await;
        outcome
    }

    /// Print `text` on `queue`.
    pub async fn print_text(&mut self, text: &str, queue: &str) -> Result<()> {
        self.print_bytes(text.as_bytes(), queue).await
    }

    /// Print an arbitrary payload on `queue`.
    pub async fn print_bytes(&mut self, data: &[u8], queue: &str) -> Result<()> {
        self.check_config()?;
        info!(addr = %self.target.addr(), queue, bytes = data.len(), "sending LPR job");
        let mut stream = self.connect().await?;

        let outcome = self.transmit(&mut stream, data, queue).await;
        match &outcome {
            Ok(()) => {
                self.log.message("Data received!!!");
                info!(queue, "LPR job sent successfully");
            }
            Err(e) => self.record_failure(e, queue),
        }

        close(stream).await;
        outcome
    }

    // -- Internals ------------------------------------------------------------

    /// Nothing reaches the wire unless the current settings are valid.
    fn check_config(&mut self) -> Result<()> {
        if let Err(e) = self.config.validate() {
            warn!(addr = %self.target.addr(), error = %e, "refusing to send with invalid settings");
            self.last_error_number = None;
            self.log.error(format!("Invalid client settings: {e}"));
            return Err(e);
        }
        Ok(())
    }

    async fn connect(&mut self) -> Result<C::Stream> {
        self.log.message(format!(
            "Connecting... Host: {}, Port: {}",
            self.target.host, self.target.port
        ));

        match self
            .connector
            .connect(&self.target, self.config.connect_timeout())
            .await
        {
            Ok(stream) => Ok(stream),
            Err(e) => {
                self.record_failure(&e, "");
                Err(e)
            }
        }
    }

    /// Run the receive-job exchange; stops at the first failing step.
    async fn transmit(&mut self, stream: &mut C::Stream, data: &[u8], queue: &str) -> Result<()> {
        let term = self.config.line_terminator;
        let io_timeout = self.config.io_timeout();

        let start = Command::ReceiveJob {
            queue: queue.to_string(),
        }
        .encode(term);
        self.log.message("Starting printer...");
        exchange(stream, JobStep::StartJob, &[start.as_slice()], io_timeout).await?;

        let ctx = self.job_context(queue);
        let control = ControlRecord::build(&ctx, term);
        let header = Command::ReceiveControlFile {
            len: control.len(),
            name: ctx.control_file_name(),
        }
        .encode(term);
        self.log.message("Sending control file...");
        exchange(stream, JobStep::ControlHeader, &[header.as_slice()], io_timeout).await?;
        self.log.message("Sending control file body...");
        exchange(
            stream,
            JobStep::ControlBody,
            &[control.as_bytes(), &[RECORD_END]],
            io_timeout,
        )
        .await?;

        let header = Command::ReceiveDataFile {
            len: data.len(),
            name: ctx.data_file_name(),
        }
        .encode(term);
        self.log.message("Sending data...");
        exchange(stream, JobStep::DataHeader, &[header.as_slice()], io_timeout).await?;
        self.log.message("Sending data body...");
        exchange(stream, JobStep::DataBody, &[data, &[RECORD_END]], io_timeout).await?;

        Ok(())
    }

    fn job_context(&mut self, queue: &str) -> JobContext {
        self.log.message("Setting cfA control String");
        JobContext {
            job: self.config.job_numbering.allocate(),
            username: self.config.username.clone(),
            hostname: source_hostname(self.config.use_empty_hostname),
            queue: queue.to_string(),
        }
    }

    fn record_failure(&mut self, err: &LprError, queue: &str) {
        warn!(addr = %self.target.addr(), error = %err, "LPR job failed");
        self.last_error_number = err.code();
        self.log.error(failure_message(err.step(), queue));
    }
}

/// User-facing text recorded when `step` fails.
fn failure_message(step: Option<JobStep>, queue: &str) -> String {
    match step {
        Some(JobStep::Connect) => "Error in connection. Please change HOST or PORT.".into(),
        Some(JobStep::QueueSelect) => format!("Error while start print jobs on queue {queue}"),
        Some(JobStep::StartJob) => format!("Error while start printing on queue {queue}"),
        Some(JobStep::ControlHeader) => "Error while start sending control file".into(),
        Some(JobStep::ControlBody) => "Error while sending control file".into(),
        Some(JobStep::DataHeader) => "Error while start sending data file".into(),
        Some(JobStep::DataBody) => "Error while sending data file".into(),
        None => "Error while talking to the printer".into(),
    }
}

/// Write `parts`, then wait for the daemon's ack byte.
async fn exchange<S>(
    stream: &mut S,
    step: JobStep,
    parts: &[&[u8]],
    io_timeout: Option<Duration>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let ack = match io_timeout {
        Some(limit) => tokio::time::timeout(limit, send_and_read_ack(stream, step, parts))
            .await
            .map_err(|_| LprError::IoTimeout {
                step,
                secs: limit.as_secs(),
            })??,
        None => send_and_read_ack(stream, step, parts).await?,
    };

    if ack != ACK_OK {
        warn!(step = %step, code = ack, "LPR printer returned non-zero ack");
        return Err(LprError::Rejected { step, code: ack });
    }
    Ok(())
}

async fn send_and_read_ack<S>(stream: &mut S, step: JobStep, parts: &[&[u8]]) -> Result<u8>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let transport = |source| LprError::Transport { step, source };

    let mut sent = 0;
    for part in parts {
        stream.write_all(part).await.map_err(transport)?;
        sent += part.len();
    }
    stream.flush().await.map_err(transport)?;
    debug!(step = %step, bytes = sent, "LPR step written, awaiting ack");

    let mut ack = [0u8; 1];
    stream.read_exact(&mut ack).await.map_err(transport)?;
    Ok(ack[0])
}

/// Shut the write side down and drop the stream.
async fn close<S: AsyncWrite + Unpin>(mut stream: S) {
    if let Err(e) = stream.shutdown().await {
        debug!(error = %e, "LPR shutdown");
    }
}
