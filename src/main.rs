/*!
 * FIFO Handshake - Main Entry Point
 *
 * Creates `mi_fifo` in the working directory, forks, sends one message from
 * the parent to the child, and removes the FIFO.
 */

use fifo_handshake::core::limits::EXIT_SUCCESS;
use fifo_handshake::{init_tracing, Handshake, HandshakeConfig, Outcome};
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    init_tracing();

    let handshake = Handshake::new(HandshakeConfig::default());
    debug!(config = ?handshake.config(), "Starting handshake");

    match handshake.run() {
        Ok(Outcome::Consumer { received }) => {
            debug!(bytes = received.len(), "Consumer finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Outcome::Producer { report, child }) => {
            debug!(bytes = report.bytes_sent, child = %child, "Producer finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            let code = e.exit_code();
            error!(pid = std::process::id(), error = %e, "Handshake failed");
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}
