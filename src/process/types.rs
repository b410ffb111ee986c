/*!
 * Process Types
 * Role discriminant and child outcome
 */

use crate::core::types::Pid;
use std::fmt;

/// Which side of the split the current process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Original process; writes the message and removes the FIFO
    Producer { child: Pid },
    /// Newly created process; reads the message
    Consumer,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Producer { .. } => "producer",
            Self::Consumer => "consumer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the consumer process ended, as seen by the producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildOutcome {
    Exited(i32),
    Signaled(String),
    /// The child could not be waited for
    Unknown,
}

impl ChildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl fmt::Display for ChildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with status {}", code),
            Self::Signaled(signal) => write!(f, "killed by {}", signal),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
