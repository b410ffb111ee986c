/*!
 * Consumer Role
 * Child side: opens the FIFO for reading and receives one message
 */

use super::message::MessageBuffer;
use super::state::{Lifecycle, RoleState};
use crate::core::limits::RECEIVED_PREFIX;
use crate::core::{HandshakeError, HandshakeResult, Size, TimeoutPolicy};
use crate::fifo::open_reader;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads one message from the FIFO
#[derive(Debug, Clone)]
pub struct Consumer {
    path: PathBuf,
    capacity: Size,
    open_timeout: TimeoutPolicy,
}

impl Consumer {
    pub fn new(path: impl Into<PathBuf>, capacity: Size, open_timeout: TimeoutPolicy) -> Self {
        Self {
            path: path.into(),
            capacity,
            open_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Receive one message from any byte source
    pub fn receive<R: Read>(&self, reader: &mut R) -> HandshakeResult<String> {
        let mut buffer = MessageBuffer::with_capacity(self.capacity);
        let bytes = buffer
            .fill_from(reader)
            .map_err(|source| HandshakeError::Read { source })?;

        if !buffer.is_terminated() {
            warn!(bytes, capacity = self.capacity, "Message arrived without terminator");
        }
        Ok(buffer.text())
    }

    /// Open the FIFO, receive, close, and report on `out`
    pub fn run<W: Write>(&self, out: &mut W) -> HandshakeResult<String> {
        self.run_traced(out, &mut Lifecycle::new("consumer"))
    }

    /// Like [`Consumer::run`], recording each step in `lifecycle`
    ///
    /// On failure nothing is written to `out` and the lifecycle ends in
    /// [`RoleState::Failed`].
    pub fn run_traced<W: Write>(
        &self,
        out: &mut W,
        lifecycle: &mut Lifecycle,
    ) -> HandshakeResult<String> {
        let result = self.receive_from_pipe(lifecycle);

        match &result {
            Ok(text) => {
                if let Err(e) = report(out, text) {
                    warn!(error = %e, "Failed to report received message");
                }
            }
            Err(_) => lifecycle.fail(),
        }
        result
    }

    fn receive_from_pipe(&self, lifecycle: &mut Lifecycle) -> HandshakeResult<String> {
        let mut file = open_reader(&self.path, self.open_timeout)?;
        lifecycle.advance(RoleState::PipeOpened);

        // The descriptor is closed whether or not the read succeeds
        let received = self.receive(&mut file);
        drop(file);

        let text = received?;
        lifecycle.advance(RoleState::MessageReceived);
        lifecycle.advance(RoleState::Closed);

        info!(bytes = text.len(), "Message received");
        Ok(text)
    }
}

/// Write the consumer's report line
pub fn report<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "{}{}", RECEIVED_PREFIX, text)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_receive_from_memory() {
        let consumer = Consumer::new("unused", 100, TimeoutPolicy::None);
        let mut reader = Cursor::new(b"Hola desde el proceso padre\0".to_vec());
        assert_eq!(
            consumer.receive(&mut reader).unwrap(),
            "Hola desde el proceso padre"
        );
    }

    #[test]
    fn test_receive_propagates_read_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
        }

        let consumer = Consumer::new("unused", 100, TimeoutPolicy::None);
        let err = consumer.receive(&mut Broken).unwrap_err();
        assert!(matches!(err, HandshakeError::Read { .. }));
    }

    #[test]
    fn test_report_format() {
        let mut out = Vec::new();
        report(&mut out, "Hola desde el proceso padre").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hijo recibió: Hola desde el proceso padre\n"
        );
    }
}
