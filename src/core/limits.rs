/*!
 * Handshake Limits and Constants
 *
 * Centralized location for the defaults of the FIFO handshake.
 * Values marked [POSIX] mirror the behavior of the underlying system calls.
 */

use std::time::Duration;

// =============================================================================
// PIPE DEFAULTS
// =============================================================================

/// Relative path of the FIFO in the working directory
pub const DEFAULT_PIPE_PATH: &str = "mi_fifo";

/// Permission bits for the FIFO (rw for owner, group and other)
/// [POSIX] Subject to the process umask
pub const DEFAULT_PIPE_MODE: u32 = 0o666;

// =============================================================================
// MESSAGE DEFAULTS
// =============================================================================

/// Payload the producer sends in the canonical run
pub const DEFAULT_MESSAGE: &str = "Hola desde el proceso padre";

/// Consumer receive buffer capacity (100 bytes)
pub const MESSAGE_BUFFER_CAPACITY: usize = 100;

/// Byte appended to every payload on the wire
pub const MESSAGE_TERMINATOR: u8 = 0;

/// Prefix of the consumer's report on stdout
pub const RECEIVED_PREFIX: &str = "Hijo recibió: ";

// =============================================================================
// RENDEZVOUS
// =============================================================================

/// Sleep between writer open attempts once spinning and yielding are exhausted
pub const OPEN_RETRY_SLEEP: Duration = Duration::from_millis(1);

/// Largest single poll(2) wait; longer deadlines are split into slices
/// [POSIX] poll takes an int millisecond timeout
pub const MAX_POLL_SLICE_MS: u16 = u16::MAX;

// =============================================================================
// EXIT CODES
// =============================================================================

/// Process exit status on success
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status for every failure kind
pub const EXIT_FAILURE: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_fits_buffer() {
        // Message plus terminator must fit in the receive buffer
        assert!(DEFAULT_MESSAGE.len() + 1 <= MESSAGE_BUFFER_CAPACITY);
        assert_eq!(DEFAULT_MESSAGE.len() + 1, 28);
    }

    #[test]
    fn test_exit_codes_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_FAILURE);
    }
}
