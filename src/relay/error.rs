//! Failures of the upstream call and how they are reported to callers.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while forwarding a submission upstream.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The deadline fired before the upstream answered.
    #[error("This operation was aborted")]
    Timeout(Duration),

    /// Connection, DNS or protocol failure talking to the upstream.
    #[error("upstream request failed")]
    Transport(#[source] hyper_util::client::legacy::Error),

    /// The inbound body could not be serialized.
    #[error("failed to serialize request body")]
    Encode(#[source] serde_json::Error),

    /// The upstream response body could not be read.
    #[error("failed to read upstream response body")]
    Body(#[source] axum::Error),

    /// The outbound request could not be built.
    #[error("failed to build upstream request")]
    Request(#[source] axum::http::Error),

    /// The configured upstream URL is not a valid URI.
    #[error("invalid upstream url")]
    InvalidUri(#[source] axum::http::uri::InvalidUri),
}

impl RelayError {
    /// Human readable message including the full cause chain.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            detail.push_str(": ");
            detail.push_str(&err.to_string());
            source = err.source();
        }
        detail
    }

    /// Short errno-style code for the failure, if one can be determined.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            RelayError::Timeout(_) => Some("ABORT_ERR"),
            other => code_from_chain(other),
        }
    }
}

/// Walk the source chain looking for an I/O error or a DNS failure.
pub(crate) fn code_from_chain(err: &(dyn StdError + 'static)) -> Option<&'static str> {
    let mut current = err.source();
    while let Some(cause) = current {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if let Some(code) = errno_name(io_err.kind()) {
                return Some(code);
            }
        }
        // hyper-util reports resolver failures with this fixed message
        if cause.to_string() == "dns error" {
            return Some("ENOTFOUND");
        }
        current = cause.source();
    }
    None
}

fn errno_name(kind: io::ErrorKind) -> Option<&'static str> {
    let name = match kind {
        io::ErrorKind::ConnectionRefused => "ECONNREFUSED",
        io::ErrorKind::ConnectionReset => "ECONNRESET",
        io::ErrorKind::ConnectionAborted => "ECONNABORTED",
        io::ErrorKind::TimedOut => "ETIMEDOUT",
        io::ErrorKind::AddrNotAvailable => "EADDRNOTAVAIL",
        io::ErrorKind::BrokenPipe => "EPIPE",
        io::ErrorKind::HostUnreachable => "EHOSTUNREACH",
        io::ErrorKind::NetworkUnreachable => "ENETUNREACH",
        _ => return None,
    };
    Some(name)
}
