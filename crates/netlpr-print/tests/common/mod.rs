// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted line printer daemon for integration tests.
//
// Accepts one connection, parses every command line with the crate's own
// wire parser, reads announced files by length, and answers each step with
// the next scripted ack byte (zero once the script runs out).  After a
// nonzero ack it only collects whatever else the client writes.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use netlpr_core::types::LineTerminator;
use netlpr_print::Command;

/// One unit the daemon received and answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Command(Command),
    /// File contents, without the trailing byte.
    File { body: Vec<u8>, end: u8 },
}

#[derive(Debug, Default)]
pub struct Transcript {
    pub items: Vec<Received>,
    /// Every byte read up to and including the last answered step.
    pub raw: Vec<u8>,
    /// Bytes the client wrote after a rejection.
    pub after_reject: Vec<u8>,
}

pub struct FakeDaemon {
    pub port: u16,
    handle: JoinHandle<Transcript>,
}

impl FakeDaemon {
    /// Daemon that acks everything.
    pub async fn accepting(terminator: LineTerminator) -> Self {
        Self::scripted(terminator, Vec::new()).await
    }

    /// Daemon answering step `i` with `acks[i]`.
    pub async fn scripted(terminator: LineTerminator, acks: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let handle = tokio::spawn(serve(listener, terminator, acks));
        Self { port, handle }
    }

    pub async fn finish(self) -> Transcript {
        self.handle.await.expect("daemon task")
    }
}

struct Session {
    sock: TcpStream,
    acks: Vec<u8>,
    answered: usize,
    transcript: Transcript,
}

impl Session {
    /// Send the next scripted ack. Returns false when it was a rejection.
    async fn answer(&mut self) -> bool {
        let ack = self.acks.get(self.answered).copied().unwrap_or(0);
        self.answered += 1;
        self.sock.write_all(&[ack]).await.expect("write ack");
        if ack != 0 {
            let mut rest = Vec::new();
            // The client may already have reset the connection; either way we
            // keep whatever arrived.
            let _ = self.sock.read_to_end(&mut rest).await;
            self.transcript.after_reject = rest;
            return false;
        }
        true
    }

    async fn read_line(&mut self, terminator: LineTerminator) -> Option<Vec<u8>> {
        let term = terminator.as_bytes();
        let mut line = Vec::new();
        loop {
            match self.sock.read_u8().await {
                Ok(b) => {
                    line.push(b);
                    self.transcript.raw.push(b);
                    if line.ends_with(term) {
                        return Some(line);
                    }
                }
                Err(_) => return None,
            }
        }
    }
}

async fn serve(listener: TcpListener, terminator: LineTerminator, acks: Vec<u8>) -> Transcript {
    let (sock, _) = listener.accept().await.expect("accept");
    let mut session = Session {
        sock,
        acks,
        answered: 0,
        transcript: Transcript::default(),
    };

    let Some(line) = session.read_line(terminator).await else {
        return session.transcript;
    };
    let first = Command::parse_top_level(&line, terminator).expect("top-level command");
    let receiving = matches!(first, Command::ReceiveJob { .. });
    session.transcript.items.push(Received::Command(first));
    if !session.answer().await || !receiving {
        return session.transcript;
    }

    loop {
        let Some(line) = session.read_line(terminator).await else {
            return session.transcript;
        };
        let sub = Command::parse_subcommand(&line, terminator).expect("subcommand");
        let len = sub.file_len().expect("file announcement");
        session.transcript.items.push(Received::Command(sub));
        if !session.answer().await {
            return session.transcript;
        }

        let mut file = vec![0u8; len + 1];
        if session.sock.read_exact(&mut file).await.is_err() {
            return session.transcript;
        }
        session.transcript.raw.extend_from_slice(&file);
        let end = file.pop().unwrap_or(0xff);
        session
            .transcript
            .items
            .push(Received::File { body: file, end });
        if !session.answer().await {
            return session.transcript;
        }
    }
}
