// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// netlpr: send a job to an LPD print queue from the command line.

mod logging;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use netlpr_core::config::ClientConfig;
use netlpr_core::error::{LprError, Result};
use netlpr_core::types::{JobNumbering, LineTerminator};
use netlpr_print::LprClient;

use crate::logging::{LogLevel, init_logging};

/// Exit code for a job the daemon refused or never saw.
const EXIT_SEND_FAILED: u8 = 1;

/// Exit code for bad arguments, configuration or input files.
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "netlpr", version, about = "Send jobs to an LPD (RFC 1179) print queue")]
struct Cli {
    /// Printer host name or IP address.
    host: String,

    #[command(flatten)]
    settings: Settings,

    /// Print the diagnostic trail after the command finishes.
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, require_equals = true, default_missing_value = "text", global = true)]
    debug: Option<DebugFormat>,

    /// Minimum log level (stderr). Defaults to `RUST_LOG`, then `warn`.
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Settings {
    /// JSON file with client settings; flags override it.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Daemon port (default 515).
    #[arg(long, short = 'p', global = true)]
    port: Option<u16>,

    /// Connect timeout in seconds (default 30).
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Deadline for each protocol step in seconds (default: none).
    #[arg(long, value_name = "SECS", global = true)]
    io_timeout: Option<u64>,

    /// Job owner sent to the daemon.
    #[arg(long, short = 'u', global = true)]
    user: Option<String>,

    /// Send an empty source hostname.
    #[arg(long, global = true)]
    empty_hostname: bool,

    /// Terminate lines with a real line feed instead of a literal `\n`.
    #[arg(long, global = true)]
    line_feed: bool,

    /// Use this job number instead of the running counter.
    #[arg(long, value_name = "N", global = true)]
    job_number: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print text from an argument, a file, or stdin.
    Print(PrintArgs),
    /// Ask the daemon to print any jobs waiting in a queue.
    FlushQueue {
        /// Queue name (defaults to the configured queue).
        #[arg(long, short = 'q')]
        queue: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PrintArgs {
    /// Text to print. Reads stdin when neither this nor --file is given.
    #[arg(conflicts_with = "file")]
    text: Option<String>,

    /// File whose bytes are sent as the job.
    #[arg(long, short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,

    /// Queue name (defaults to the configured queue).
    #[arg(long, short = 'q')]
    queue: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DebugFormat {
    Text,
    Json,
}

impl Settings {
    /// Build the client configuration: file (if any), then flags.
    fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_json_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(secs) = self.timeout {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.io_timeout {
            config.io_timeout_secs = Some(secs);
        }
        if let Some(user) = &self.user {
            config.username = user.clone();
        }
        if self.empty_hostname {
            config.use_empty_hostname = true;
        }
        if self.line_feed {
            config.line_terminator = LineTerminator::LineFeed;
        }
        if let Some(n) = self.job_number {
            config.job_numbering = JobNumbering::Fixed(n);
        }

        config.validate()?;
        Ok(config)
    }
}

impl PrintArgs {
    fn payload(&self) -> Result<Vec<u8>> {
        if let Some(text) = &self.text {
            return Ok(text.clone().into_bytes());
        }
        if let Some(path) = &self.file {
            return Ok(std::fs::read(path)?);
        }
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = match cli.settings.resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let default_queue = config.default_queue.clone();
    let mut client = LprClient::with_config(cli.host.clone(), config);

    let outcome = match &cli.command {
        Command::Print(args) => match args.payload() {
            Ok(data) => {
                let queue = args.queue.as_deref().unwrap_or(&default_queue);
                client.print_bytes(&data, queue).await
            }
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(EXIT_USAGE);
            }
        },
        Command::FlushQueue { queue } => {
            let queue = queue.as_deref().unwrap_or(&default_queue);
            client.print_waiting_jobs(queue).await
        }
    };

    if let Some(format) = cli.debug {
        dump_debug(&client, format);
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&client, &err);
            ExitCode::from(EXIT_SEND_FAILED)
        }
    }
}

fn report_failure(client: &LprClient, err: &LprError) {
    match client.last_error() {
        Some(message) => eprintln!("error: {message} ({err})"),
        None => eprintln!("error: {err}"),
    }
    if let Some(code) = client.last_error_number() {
        tracing::debug!(code, "last error number");
    }
}

fn dump_debug(client: &LprClient, format: DebugFormat) {
    match format {
        DebugFormat::Text => print!("{}", client.debug_log().render_text()),
        DebugFormat::Json => match serde_json::to_string_pretty(client.debug_log().events()) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: could not encode debug log: {err}"),
        },
    }
}
