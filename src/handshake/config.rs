/*!
 * Handshake Configuration
 * Shared settings for both roles, with a builder
 */

use crate::core::limits::{
    DEFAULT_MESSAGE, DEFAULT_PIPE_MODE, DEFAULT_PIPE_PATH, MESSAGE_BUFFER_CAPACITY,
};
use crate::core::{HandshakeError, HandshakeResult, Size, TimeoutPolicy};
use crate::roles::Message;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings known to both sides of the fork
///
/// The pipe path lives here once and is handed to each role, so producer and
/// consumer can never disagree on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    pub pipe_path: PathBuf,
    pub pipe_mode: u32,
    pub message: String,
    pub buffer_capacity: Size,
    pub open_timeout: TimeoutPolicy,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            pipe_path: PathBuf::from(DEFAULT_PIPE_PATH),
            pipe_mode: DEFAULT_PIPE_MODE,
            message: DEFAULT_MESSAGE.to_string(),
            buffer_capacity: MESSAGE_BUFFER_CAPACITY,
            open_timeout: TimeoutPolicy::None,
        }
    }
}

impl HandshakeConfig {
    pub fn builder() -> HandshakeConfigBuilder {
        HandshakeConfigBuilder::new()
    }

    pub fn pipe_path(&self) -> &Path {
        &self.pipe_path
    }

    /// Check the settings and build the message to send
    ///
    /// Runs before the FIFO is created, so an invalid configuration leaves
    /// nothing behind on disk.
    pub fn validate(&self) -> HandshakeResult<Message> {
        if self.pipe_path.as_os_str().is_empty() {
            return Err(HandshakeError::InvalidConfig("empty pipe path".into()));
        }
        if self.buffer_capacity == 0 {
            return Err(HandshakeError::InvalidConfig(
                "buffer capacity must be non-zero".into(),
            ));
        }

        let message = Message::new(self.message.clone())?;
        message.check_fits(self.buffer_capacity)?;
        Ok(message)
    }
}

/// Builder for HandshakeConfig
#[derive(Debug, Clone, Default)]
pub struct HandshakeConfigBuilder {
    config: HandshakeConfig,
}

impl HandshakeConfigBuilder {
    /// Start from the canonical defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pipe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pipe_path = path.into();
        self
    }

    pub fn with_pipe_mode(mut self, mode: u32) -> Self {
        self.config.pipe_mode = mode;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.config.message = message.into();
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: Size) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// Bound both rendezvous opens by `timeout`
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.config.open_timeout = TimeoutPolicy::Ipc(timeout);
        self
    }

    pub fn build(self) -> HandshakeConfig {
        self.config
    }
}
