// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Blocking key reader — one event per call.
//
// The line editor is a synchronous loop: read one key, feed it, render,
// repeat. `KeyReader` owns the input parser and a queue of parsed events,
// and only touches stdin when the queue is empty.
//
// The one timing decision is the lone ESC. When the parser is holding an
// incomplete sequence we poll stdin with a short timeout; if nothing
// arrives, the pending bytes are flushed as literal keys (so a bare ESC
// becomes the Escape key that leaves Insert mode).

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::input::{Event, Parser};

/// Bytes read per `read()` call. A keypress is 1-6 bytes; a paste can be
/// kilobytes, and the parser stitches larger pastes across reads.
const READ_BUF_SIZE: usize = 4096;

/// How long to wait for the rest of an escape sequence before treating
/// the pending ESC as the Escape key.
pub const ESC_TIMEOUT: Duration = Duration::from_millis(25);

/// A raw byte source the reader can wait on.
pub trait ByteSource {
    /// Wait until bytes are readable. `None` waits indefinitely. Returns
    /// `false` if the timeout elapsed with nothing to read.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying descriptor.
    fn wait(&mut self, timeout: Option<Duration>) -> io::Result<bool>;

    /// Read available bytes into `buf`. `Ok(0)` means end of input.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying descriptor.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Standard input as a [`ByteSource`], using `poll()` for timeouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdin;

#[cfg(unix)]
impl ByteSource for Stdin {
    fn wait(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        let millis = timeout.map_or(-1, |t| i32::try_from(t.as_millis()).unwrap_or(i32::MAX));
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            let ready = unsafe { libc::poll(&raw mut pfd, 1, millis) };
            if ready >= 0 {
                return Ok(ready > 0);
            }
            let err = io::Error::last_os_error();
            // A resize signal interrupts poll; just wait again.
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
            if n >= 0 {
                #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for Stdin {
    fn wait(&mut self, _timeout: Option<Duration>) -> io::Result<bool> {
        // No poll: a pending ESC is resolved by the next read instead.
        Ok(true)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use std::io::Read;
        io::stdin().lock().read(buf)
    }
}

/// Blocking reader yielding one [`Event`] per call.
///
/// # Example
///
/// ```no_run
/// use n_term::reader::{KeyReader, Stdin};
///
/// let mut keys = KeyReader::new(Stdin);
/// while let Some(event) = keys.next_event()? {
///     println!("{event:?}");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct KeyReader<S> {
    source: S,
    parser: Parser,
    queue: VecDeque<Event>,
    eof: bool,
}

impl<S: ByteSource> KeyReader<S> {
    /// Wrap a byte source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: Parser::new(),
            queue: VecDeque::new(),
            eof: false,
        }
    }

    /// Block until the next event. Returns `Ok(None)` once the source is
    /// exhausted and every buffered byte has been delivered.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the byte source.
    pub fn next_event(&mut self) -> io::Result<Option<Event>> {
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }
            if self.eof {
                return Ok(None);
            }

            let timeout = self.parser.has_pending().then_some(ESC_TIMEOUT);
            if !self.source.wait(timeout)? {
                self.queue.extend(self.parser.flush());
                continue;
            }

            let n = self.source.read(&mut buf)?;
            if n == 0 {
                self.eof = true;
                self.queue.extend(self.parser.flush());
                continue;
            }
            self.queue.extend(self.parser.advance(&buf[..n]));
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
