// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source hostname for the `H` line and the data file name.

use tracing::debug;

/// Name used when the system will not tell us its own.
const FALLBACK_HOSTNAME: &str = "localhost";

/// Hostname to put in a job. Empty when the caller asked for a blank one.
pub fn source_hostname(use_empty_hostname: bool) -> String {
    if use_empty_hostname {
        String::new()
    } else {
        local_hostname()
    }
}

/// Name of this machine.
pub fn local_hostname() -> String {
    match system_hostname() {
        Some(name) => name,
        None => {
            debug!(fallback = FALLBACK_HOSTNAME, "could not read system hostname");
            FALLBACK_HOSTNAME.to_string()
        }
    }
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    let mut buf = [0u8; 256];

    // SAFETY: `buf` is a valid writable buffer of `buf.len()` bytes for the
    // duration of the call; gethostname writes at most that many bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return None;
    }

    // POSIX leaves truncated names unterminated, so fall back to the full buffer.
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..end]).into_owned();
    (!name.is_empty()).then_some(name)
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|name| !name.is_empty())
}
