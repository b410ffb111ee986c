/*!
 * Role Lifecycle
 * Per-role state tracking with logged transitions
 */

use std::fmt;
use tracing::debug;

/// Lifecycle states shared by both roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Created,
    PipeOpened,
    MessageReceived,
    MessageSent,
    Closed,
    PipeRemoved,
    Failed,
}

impl fmt::Display for RoleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::PipeOpened => "pipe_opened",
            Self::MessageReceived => "message_received",
            Self::MessageSent => "message_sent",
            Self::Closed => "closed",
            Self::PipeRemoved => "pipe_removed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks the state a role is in, logging every transition
#[derive(Debug, Clone)]
pub struct Lifecycle {
    role: &'static str,
    current: RoleState,
}

impl Lifecycle {
    pub fn new(role: &'static str) -> Self {
        Self {
            role,
            current: RoleState::Created,
        }
    }

    pub fn current(&self) -> RoleState {
        self.current
    }

    pub fn advance(&mut self, next: RoleState) {
        debug!(role = self.role, from = %self.current, to = %next, "State transition");
        self.current = next;
    }

    pub fn fail(&mut self) {
        self.advance(RoleState::Failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_follows_transitions() {
        let mut lifecycle = Lifecycle::new("consumer");
        assert_eq!(lifecycle.current(), RoleState::Created);

        for next in [
            RoleState::PipeOpened,
            RoleState::MessageReceived,
            RoleState::Closed,
        ] {
            lifecycle.advance(next);
            assert_eq!(lifecycle.current(), next);
        }
    }

    #[test]
    fn test_fail_records_failed_state() {
        let mut lifecycle = Lifecycle::new("producer");
        lifecycle.fail();
        assert_eq!(lifecycle.current(), RoleState::Failed);
        assert_eq!(RoleState::Failed.to_string(), "failed");
    }
}
