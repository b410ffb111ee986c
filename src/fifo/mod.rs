/*!
 * FIFO Module
 * Named pipe lifecycle and endpoint opening
 */

pub mod endpoint;
pub mod pipe;

// Re-export public API
pub use endpoint::{open_reader, open_writer};
pub use pipe::{is_fifo, NamedPipe};
