/*!
 * Core Module
 * Fundamental types, limits, timeouts and error handling
 */

pub mod errors;
pub mod limits;
pub mod timeout;
pub mod types;

// Re-export for convenience
pub use errors::{HandshakeError, HandshakeResult};
pub use timeout::{retry_until, TimeoutError, TimeoutPolicy};
pub use types::*;
