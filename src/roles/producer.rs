/*!
 * Producer Role
 * Parent side: writes one message into the FIFO, then removes it
 */

use super::message::Message;
use super::state::{Lifecycle, RoleState};
use crate::core::{HandshakeError, HandshakeResult, Size, TimeoutPolicy};
use crate::fifo::{open_writer, NamedPipe};
use std::io::Write;
use tracing::{info, warn};

/// What the producer accomplished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    pub bytes_sent: Size,
    pub pipe_removed: bool,
}

/// Writes one message into the FIFO
#[derive(Debug, Clone)]
pub struct Producer {
    open_timeout: TimeoutPolicy,
}

impl Producer {
    pub fn new(open_timeout: TimeoutPolicy) -> Self {
        Self { open_timeout }
    }

    /// Write the encoded message, terminator included, to any byte sink
    ///
    /// Short writes are continued until the whole payload is out.
    pub fn send<W: Write>(&self, writer: &mut W, message: &Message) -> HandshakeResult<Size> {
        let payload = message.encode();
        writer
            .write_all(&payload)
            .and_then(|()| writer.flush())
            .map_err(|source| HandshakeError::Write { source })?;
        Ok(payload.len())
    }

    /// Open the FIFO, send, close, and remove the FIFO
    ///
    /// An open failure leaves the FIFO in place. Once the write end was
    /// open the FIFO is removed even if the write itself failed.
    pub fn run(&self, pipe: &NamedPipe, message: &Message) -> HandshakeResult<ProducerReport> {
        self.run_traced(pipe, message, &mut Lifecycle::new("producer"))
    }

    /// Like [`Producer::run`], recording each step in `lifecycle`
    pub fn run_traced(
        &self,
        pipe: &NamedPipe,
        message: &Message,
        lifecycle: &mut Lifecycle,
    ) -> HandshakeResult<ProducerReport> {
        let file = match open_writer(pipe.path(), self.open_timeout) {
            Ok(file) => file,
            Err(e) => {
                lifecycle.fail();
                return Err(e);
            }
        };
        lifecycle.advance(RoleState::PipeOpened);

        self.deliver(file, pipe, message, lifecycle)
    }

    /// Send on an open write end, close it, and remove the FIFO
    ///
    /// A failed send moves straight to [`RoleState::Failed`]; the FIFO is
    /// still removed.
    fn deliver<W: Write>(
        &self,
        mut writer: W,
        pipe: &NamedPipe,
        message: &Message,
        lifecycle: &mut Lifecycle,
    ) -> HandshakeResult<ProducerReport> {
        let sent = self.send(&mut writer, message);
        drop(writer);

        let bytes_sent = match sent {
            Ok(n) => n,
            Err(e) => {
                lifecycle.fail();
                if !pipe.remove() {
                    warn!(path = %pipe.path().display(), "FIFO not removed after failed write");
                }
                return Err(e);
            }
        };
        lifecycle.advance(RoleState::MessageSent);
        lifecycle.advance(RoleState::Closed);
        info!(bytes = bytes_sent, "Message sent");

        let pipe_removed = pipe.remove();
        lifecycle.advance(RoleState::PipeRemoved);

        Ok(ProducerReport {
            bytes_sent,
            pipe_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_send_writes_terminated_payload() {
        let producer = Producer::new(TimeoutPolicy::None);
        let message = Message::new("Hola desde el proceso padre").unwrap();
        let mut sink = Vec::new();

        let sent = producer.send(&mut sink, &message).unwrap();
        assert_eq!(sent, 28);
        assert_eq!(sink, b"Hola desde el proceso padre\0");
    }

    #[test]
    fn test_send_continues_short_writes() {
        /// Accepts at most two bytes per write call
        struct Narrow(Vec<u8>);
        impl Write for Narrow {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                let n = buf.len().min(2);
                self.0.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let producer = Producer::new(TimeoutPolicy::None);
        let message = Message::new("hola").unwrap();
        let mut sink = Narrow(Vec::new());
        producer.send(&mut sink, &message).unwrap();
        assert_eq!(sink.0, b"hola\0");
    }

    /// Rejects every write as if the reader had gone away
    struct Closed;
    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_reports_write_error() {
        let producer = Producer::new(TimeoutPolicy::None);
        let message = Message::new("hola").unwrap();
        let err = producer.send(&mut Closed, &message).unwrap_err();
        assert_eq!(err.kind(), Some(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_failed_write_ends_in_failed_and_removes_fifo() {
        let dir = TempDir::new().unwrap();
        let pipe = NamedPipe::create(dir.path().join("pipe"), 0o666).unwrap();
        let producer = Producer::new(TimeoutPolicy::None);
        let message = Message::new("hola").unwrap();
        let mut lifecycle = Lifecycle::new("producer");
        lifecycle.advance(RoleState::PipeOpened);

        let err = producer
            .deliver(Closed, &pipe, &message, &mut lifecycle)
            .unwrap_err();

        assert!(matches!(err, HandshakeError::Write { .. }));
        assert_eq!(lifecycle.current(), RoleState::Failed);
        assert!(!pipe.exists());
    }

    #[test]
    fn test_successful_delivery_ends_with_pipe_removed() {
        let dir = TempDir::new().unwrap();
        let pipe = NamedPipe::create(dir.path().join("pipe"), 0o666).unwrap();
        let producer = Producer::new(TimeoutPolicy::None);
        let message = Message::new("hola").unwrap();
        let mut lifecycle = Lifecycle::new("producer");

        let report = producer
            .deliver(Vec::new(), &pipe, &message, &mut lifecycle)
            .unwrap();

        assert_eq!(report.bytes_sent, 5);
        assert!(report.pipe_removed);
        assert_eq!(lifecycle.current(), RoleState::PipeRemoved);
    }
}
