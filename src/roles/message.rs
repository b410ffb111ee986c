/*!
 * Message Types
 * Wire payload and fixed-capacity receive buffer
 *
 * The payload is the message text followed by a single NUL byte. There is no
 * length prefix: the consumer reads until the terminator, end of stream, or
 * a full buffer, whichever comes first.
 */

use crate::core::limits::MESSAGE_TERMINATOR;
use crate::core::{HandshakeError, HandshakeResult, Size};
use std::io::{self, Read};

/// Text the producer sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
}

impl Message {
    /// Wrap `text`, rejecting interior NUL bytes
    pub fn new(text: impl Into<String>) -> HandshakeResult<Self> {
        let text = text.into();
        if let Some(pos) = text.bytes().position(|b| b == MESSAGE_TERMINATOR) {
            return Err(HandshakeError::InvalidMessage(format!(
                "interior NUL byte at offset {}",
                pos
            )));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bytes on the wire, terminator included
    #[inline]
    pub fn encoded_len(&self) -> Size {
        self.text.len() + 1
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(self.text.as_bytes());
        bytes.push(MESSAGE_TERMINATOR);
        bytes
    }

    /// Check that the encoded payload fits a receive buffer of `capacity`
    pub fn check_fits(&self, capacity: Size) -> HandshakeResult<()> {
        if self.encoded_len() > capacity {
            return Err(HandshakeError::MessageTooLarge {
                len: self.encoded_len(),
                capacity,
            });
        }
        Ok(())
    }
}

/// Fixed-capacity receive buffer
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    bytes: Box<[u8]>,
    filled: Size,
}

impl MessageBuffer {
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.bytes.len()
    }

    /// Bytes received so far
    pub fn filled(&self) -> &[u8] {
        &self.bytes[..self.filled]
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.capacity()
    }

    /// Whether a terminator has been received
    pub fn is_terminated(&self) -> bool {
        self.filled().contains(&MESSAGE_TERMINATOR)
    }

    /// Read from `reader` until a terminator arrives, the stream ends, or the
    /// buffer is full
    ///
    /// Short reads are continued. Never reads past capacity. Returns the
    /// total number of bytes held.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> io::Result<Size> {
        while !self.is_full() {
            let start = self.filled;
            let n = match reader.read(&mut self.bytes[start..]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.filled += n;

            if self.bytes[start..self.filled].contains(&MESSAGE_TERMINATOR) {
                break;
            }
        }
        Ok(self.filled)
    }

    /// Received text up to the first terminator
    ///
    /// Without a terminator the whole filled region is used. Invalid UTF-8
    /// is replaced rather than rejected.
    pub fn text(&self) -> String {
        let filled = self.filled();
        let end = filled
            .iter()
            .position(|&b| b == MESSAGE_TERMINATOR)
            .unwrap_or(filled.len());
        String::from_utf8_lossy(&filled[..end]).into_owned()
    }
}
