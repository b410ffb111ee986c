/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::limits::EXIT_FAILURE;
use super::types::Access;
use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Every way the handshake can fail
///
/// All variants are terminal: the failing process reports the diagnostic and
/// exits with [`EXIT_FAILURE`].
#[derive(Error, Debug, Diagnostic)]
pub enum HandshakeError {
    #[error("Failed to create FIFO at {path}: {source}")]
    #[diagnostic(
        code(fifo::create_failed),
        help("Remove a stale entry left by an earlier failed run, or check directory permissions.")
    )]
    PipeCreate {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to fork: {source}")]
    #[diagnostic(
        code(process::fork_failed),
        help("The system may be out of process slots or memory.")
    )]
    Fork {
        #[source]
        source: io::Error,
    },

    #[error("Failed to open FIFO {path} for {access}: {source}")]
    #[diagnostic(
        code(fifo::open_failed),
        help("The FIFO may have been removed before both ends were opened.")
    )]
    Open {
        access: Access,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read from FIFO: {source}")]
    #[diagnostic(code(fifo::read_failed))]
    Read {
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to FIFO: {source}")]
    #[diagnostic(code(fifo::write_failed))]
    Write {
        #[source]
        source: io::Error,
    },

    #[error("{operation} timed out after {elapsed_ms}ms (timeout: {}ms)", timeout_ms.map(|t| t.to_string()).unwrap_or_else(|| "none".to_string()))]
    #[diagnostic(
        code(fifo::rendezvous_timeout),
        help("The counterpart process never opened its end of the FIFO.")
    )]
    Timeout {
        operation: &'static str,
        elapsed_ms: u64,
        timeout_ms: Option<u64>,
    },

    #[error("Message too large: {len} bytes with terminator, buffer capacity {capacity}")]
    #[diagnostic(
        code(message::too_large),
        help("Shorten the message or raise the buffer capacity.")
    )]
    MessageTooLarge { len: usize, capacity: usize },

    #[error("Invalid message: {0}")]
    #[diagnostic(code(message::invalid))]
    InvalidMessage(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid))]
    InvalidConfig(String),
}

impl HandshakeError {
    /// Process exit status for this error
    ///
    /// Failures are not distinguished by exit code.
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }

    /// The I/O error kind of the OS cause, if there is one
    pub fn kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::PipeCreate { source, .. }
            | Self::Fork { source }
            | Self::Open { source, .. }
            | Self::Read { source }
            | Self::Write { source } => Some(source.kind()),
            Self::Timeout { .. } => Some(io::ErrorKind::TimedOut),
            _ => None,
        }
    }
}

/// Result type alias using HandshakeError
pub type HandshakeResult<T> = Result<T, HandshakeError>;
