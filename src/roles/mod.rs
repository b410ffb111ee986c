/*!
 * Roles Module
 * Producer and consumer sides of the handshake
 */

pub mod consumer;
pub mod message;
pub mod producer;
pub mod state;

// Re-export public API
pub use consumer::{report, Consumer};
pub use message::{Message, MessageBuffer};
pub use producer::{Producer, ProducerReport};
pub use state::{Lifecycle, RoleState};
