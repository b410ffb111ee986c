/*!
 * Process Module
 * Splitting the workflow across two OS processes
 */

pub mod splitter;
pub mod types;

pub use splitter::{reap, split};
pub use types::{ChildOutcome, Role};
