/*!
 * Handshake Module
 * Configuration and orchestration of the one-shot FIFO transfer
 */

pub mod config;
pub mod runner;

pub use config::{HandshakeConfig, HandshakeConfigBuilder};
pub use runner::{Handshake, Outcome};
