/*!
 * FIFO Endpoints
 * Opening the read and write ends with rendezvous semantics
 *
 * Opening a FIFO blocks until the other end is opened as well. With
 * `TimeoutPolicy::None` that wait is unbounded, which is the classic
 * contract. A bounded policy switches to non-blocking opens:
 *
 * - the writer retries while the OS reports that no reader exists (ENXIO)
 * - the reader opens immediately and polls until the writer delivers data
 *   or hangs up
 *
 * Either way the returned file is in blocking mode.
 */

use crate::core::limits::MAX_POLL_SLICE_MS;
use crate::core::{
    retry_until, Access, HandshakeError, HandshakeResult, TimeoutError, TimeoutPolicy,
};
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::libc;
use nix::poll::{poll, PollFd, PollFlags};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsFd, AsRawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Open the read end, waiting for a writer according to `timeout`
#[instrument(skip_all, fields(path = %path.display(), timeout = timeout.category()))]
pub fn open_reader(path: &Path, timeout: TimeoutPolicy) -> HandshakeResult<File> {
    let file = match timeout.duration() {
        None => open_with(path, Access::Read, 0)?,
        Some(_) => {
            let file = open_with(path, Access::Read, libc::O_NONBLOCK)?;
            wait_for_writer(&file, path, timeout)?;
            set_blocking(&file, path, Access::Read)?;
            file
        }
    };

    debug!("FIFO read end open");
    Ok(file)
}

/// Open the write end, waiting for a reader according to `timeout`
#[instrument(skip_all, fields(path = %path.display(), timeout = timeout.category()))]
pub fn open_writer(path: &Path, timeout: TimeoutPolicy) -> HandshakeResult<File> {
    let file = match timeout.duration() {
        None => open_with(path, Access::Write, 0)?,
        Some(_) => {
            let file = retry_until(
                || open_raw(path, Access::Write, libc::O_NONBLOCK),
                |e| e.raw_os_error() == Some(libc::ENXIO),
                timeout,
            )
            .map_err(|e| match e {
                TimeoutError::Timeout { elapsed, timeout } => {
                    timeout_error(Access::Write, elapsed, timeout)
                }
                TimeoutError::Operation(source) => open_error(Access::Write, path, source),
            })?;
            set_blocking(&file, path, Access::Write)?;
            file
        }
    };

    debug!("FIFO write end open");
    Ok(file)
}

fn open_raw(path: &Path, access: Access, flags: i32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    match access {
        Access::Read => options.read(true),
        Access::Write => options.write(true),
    };
    options.custom_flags(flags).open(path)
}

fn open_with(path: &Path, access: Access, flags: i32) -> HandshakeResult<File> {
    open_raw(path, access, flags).map_err(|source| open_error(access, path, source))
}

/// Poll the read end until a writer connects or `timeout` expires
///
/// On Linux a FIFO read end reports neither POLLIN nor POLLHUP before the
/// first writer has opened it.
fn wait_for_writer(file: &File, path: &Path, timeout: TimeoutPolicy) -> HandshakeResult<()> {
    let start = Instant::now();

    loop {
        if timeout.is_expired(start) {
            return Err(timeout_error(Access::Read, start.elapsed(), timeout.duration()));
        }

        let slice_ms = poll_slice_ms(timeout.remaining(start));
        let mut fds = [PollFd::new(file.as_fd(), PollFlags::POLLIN)];

        match poll(&mut fds, slice_ms) {
            Ok(0) => continue,
            Ok(_) => return Ok(()),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(open_error(Access::Read, path, io::Error::from(errno))),
        }
    }
}

/// Clamp a remaining wait to one poll(2) slice; `None` waits a full slice
fn poll_slice_ms(remaining: Option<Duration>) -> u16 {
    remaining.map_or(MAX_POLL_SLICE_MS, |left| {
        let ms = left.as_millis().clamp(1, u128::from(MAX_POLL_SLICE_MS));
        u16::try_from(ms).unwrap_or(MAX_POLL_SLICE_MS)
    })
}

fn set_blocking(file: &File, path: &Path, access: Access) -> HandshakeResult<()> {
    let fd = file.as_raw_fd();
    let to_open_error = |errno: Errno| open_error(access, path, io::Error::from(errno));

    let bits = fcntl(fd, FcntlArg::F_GETFL).map_err(to_open_error)?;
    let flags = OFlag::from_bits_truncate(bits) - OFlag::O_NONBLOCK;
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(to_open_error)?;
    Ok(())
}

fn open_error(access: Access, path: &Path, source: io::Error) -> HandshakeError {
    HandshakeError::Open {
        access,
        path: path.display().to_string(),
        source,
    }
}

fn timeout_error(access: Access, elapsed: Duration, timeout: Option<Duration>) -> HandshakeError {
    HandshakeError::Timeout {
        operation: match access {
            Access::Read => "open for reading",
            Access::Write => "open for writing",
        },
        elapsed_ms: saturating_millis(elapsed),
        timeout_ms: timeout.map(saturating_millis),
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
