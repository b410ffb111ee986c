/*!
 * Process Splitter
 * Forks the workflow into producer and consumer roles
 */

use super::types::{ChildOutcome, Role};
use crate::core::types::Pid;
use crate::core::{HandshakeError, HandshakeResult};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid as NixPid};
use std::io;
use tracing::{info, warn};

/// Fork the current process
///
/// The caller keeps running as [`Role::Producer`]; the new process continues
/// from the same point as [`Role::Consumer`]. Open descriptors are shared, so
/// the FIFO must be opened after the split, by each side on its own.
///
/// Call this only while the process is single-threaded: the child inherits
/// one thread and any locks other threads held at the time of the fork.
pub fn split() -> HandshakeResult<Role> {
    // SAFETY: the handshake binary is single-threaded at this point, and the
    // child only performs file I/O and formatting before it exits.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            let role = Role::Producer {
                child: child.as_raw(),
            };
            info!(child = child.as_raw(), "Forked consumer process");
            Ok(role)
        }
        Ok(ForkResult::Child) => Ok(Role::Consumer),
        Err(errno) => Err(HandshakeError::Fork {
            source: io::Error::from(errno),
        }),
    }
}

/// Wait for the consumer process to finish
///
/// Failures are logged; the producer's own result does not depend on them.
pub fn reap(child: Pid) -> ChildOutcome {
    match waitpid(NixPid::from_raw(child), None) {
        Ok(WaitStatus::Exited(_, code)) => {
            info!(child, code, "Consumer exited");
            ChildOutcome::Exited(code)
        }
        Ok(WaitStatus::Signaled(_, signal, _)) => {
            warn!(child, signal = signal.as_str(), "Consumer killed by signal");
            ChildOutcome::Signaled(signal.as_str().to_string())
        }
        Ok(status) => {
            warn!(child, status = ?status, "Unexpected consumer wait status");
            ChildOutcome::Unknown
        }
        Err(errno) => {
            warn!(child, error = %errno, "Failed to wait for consumer");
            ChildOutcome::Unknown
        }
    }
}
