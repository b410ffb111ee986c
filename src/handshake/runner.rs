/*!
 * Handshake Runner
 * Create the FIFO, split, and dispatch each process to its role
 */

use super::config::HandshakeConfig;
use crate::core::{HandshakeError, HandshakeResult, Pid};
use crate::fifo::NamedPipe;
use crate::process::{reap, split, ChildOutcome, Role};
use crate::roles::{Consumer, Lifecycle, Message, Producer, ProducerReport};
use std::io;
use tracing::{debug, info, info_span, warn};

/// What a process did once the workflow finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The child received and reported this text
    Consumer { received: String },
    /// The parent sent the message and waited for the child
    Producer {
        report: ProducerReport,
        child: ChildOutcome,
    },
}

/// One complete FIFO handshake between a parent and a forked child
#[derive(Debug, Clone)]
pub struct Handshake {
    config: HandshakeConfig,
}

impl Handshake {
    pub fn new(config: HandshakeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    /// Run the workflow
    ///
    /// Returns in both processes: the child with [`Outcome::Consumer`], the
    /// parent with [`Outcome::Producer`]. A creation failure returns before
    /// any fork happens.
    pub fn run(&self) -> HandshakeResult<Outcome> {
        let message = self.config.validate()?;
        let pipe = NamedPipe::create(&self.config.pipe_path, self.config.pipe_mode)?;

        match split()? {
            Role::Consumer => self.run_consumer(),
            Role::Producer { child } => self.run_producer(&pipe, &message, child),
        }
    }

    fn run_consumer(&self) -> HandshakeResult<Outcome> {
        let span = info_span!("consumer", pid = std::process::id());
        let _entered = span.enter();

        let consumer = Consumer::new(
            self.config.pipe_path.clone(),
            self.config.buffer_capacity,
            self.config.open_timeout,
        );
        let mut lifecycle = Lifecycle::new("consumer");
        let result = consumer.run_traced(&mut io::stdout().lock(), &mut lifecycle);
        debug!(state = %lifecycle.current(), "Consumer finished");

        Ok(Outcome::Consumer { received: result? })
    }

    fn run_producer(
        &self,
        pipe: &NamedPipe,
        message: &Message,
        child: Pid,
    ) -> HandshakeResult<Outcome> {
        let span = info_span!("producer", pid = std::process::id(), child);
        let _entered = span.enter();

        let producer = Producer::new(self.config.open_timeout);
        let mut lifecycle = Lifecycle::new("producer");
        let result = producer.run_traced(pipe, message, &mut lifecycle);
        debug!(state = %lifecycle.current(), "Producer finished");

        // Without a completed rendezvous the child may still be blocked in
        // its own open, so waiting for it could hang.
        let child = match &result {
            Ok(_) | Err(HandshakeError::Write { .. }) => reap(child),
            Err(_) => {
                warn!(child, "Not waiting for consumer after failed rendezvous");
                ChildOutcome::Unknown
            }
        };

        let report = result?;
        if !child.is_success() {
            warn!(outcome = %child, "Consumer did not finish cleanly");
        }
        info!(bytes = report.bytes_sent, removed = report.pipe_removed, "Handshake complete");

        Ok(Outcome::Producer { report, child })
    }
}
