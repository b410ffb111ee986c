/*!
 * Core Types
 * Common types used across the handshake
 */

use std::fmt;

/// Process identifier as reported by the OS
pub type Pid = i32;

/// Byte count
pub type Size = usize;

/// Direction a FIFO end is opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "reading",
            Self::Write => "writing",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
