/*!
 * Named Pipe Lifecycle
 * Creation and removal of the FIFO filesystem entry
 */

use crate::core::{HandshakeError, HandshakeResult};
use nix::sys::stat::{stat, Mode, SFlag};
use nix::unistd::mkfifo;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A FIFO entry on the filesystem
///
/// Removal is explicit: the value is inherited by both sides of a fork, and
/// only the producer may unlink the entry. Dropping it leaves the FIFO in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPipe {
    path: PathBuf,
}

impl NamedPipe {
    /// Create a FIFO at `path` with permission bits `mode`
    ///
    /// Fails if the entry already exists or the directory is not writable.
    pub fn create(path: impl AsRef<Path>, mode: u32) -> HandshakeResult<Self> {
        let path = path.as_ref();
        let bits = Mode::from_bits_truncate(mode as nix::libc::mode_t);

        mkfifo(path, bits).map_err(|errno| HandshakeError::PipeCreate {
            path: path.display().to_string(),
            source: io::Error::from(errno),
        })?;

        info!(path = %path.display(), mode = %format!("{:o}", mode), "FIFO created");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Refer to an existing FIFO without creating it
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the path currently names a FIFO
    pub fn exists(&self) -> bool {
        is_fifo(&self.path)
    }

    /// Unlink the FIFO, best-effort
    ///
    /// Returns `true` if an entry was removed. A missing entry is not an
    /// error; any other failure is logged and swallowed.
    pub fn remove(&self) -> bool {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "FIFO removed");
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "FIFO already gone");
                false
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove FIFO");
                false
            }
        }
    }
}

/// Whether `path` names a FIFO
pub fn is_fifo(path: &Path) -> bool {
    stat(path)
        .map(|st| SFlag::from_bits_truncate(st.st_mode) & SFlag::S_IFMT == SFlag::S_IFIFO)
        .unwrap_or(false)
}
