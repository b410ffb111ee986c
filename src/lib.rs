/*!
 * FIFO Handshake Library
 * One-shot parent-to-child message transfer over a named pipe
 *
 * The parent creates a FIFO, forks, and writes one NUL-terminated message;
 * the child reads it and prints it. Opening either end blocks until the
 * other end is opened too, which is the only synchronization between the
 * two processes.
 */

pub mod core;
pub mod fifo;
pub mod handshake;
pub mod monitoring;
pub mod process;
pub mod roles;

// Re-exports
pub use crate::core::{HandshakeError, HandshakeResult, TimeoutPolicy};
pub use fifo::NamedPipe;
pub use handshake::{Handshake, HandshakeConfig, Outcome};
pub use monitoring::init_tracing;
pub use process::{ChildOutcome, Role};
pub use roles::{Consumer, Message, MessageBuffer, Producer, ProducerReport};
