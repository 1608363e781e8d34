//! Line wrapping of encoded part bodies

use std::{
    cmp::min,
    io::{self, Write},
};

/// Maximum length of a base64 line, without the trailing CRLF
///
/// Defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-6.8)
pub const MAX_LINE_LENGTH: usize = 78 - 2;

/// A writer inserting a CRLF after every [`MAX_LINE_LENGTH`] bytes
///
/// The wrapper only counts bytes, it doesn't look at them: it is meant to sit
/// below an encoder whose output never contains line breaks of its own.
/// A break is written as soon as a line is full, so writing `N` bytes
/// produces `N / 76` line breaks however the input is split across calls.
#[derive(Debug)]
pub struct LineWrapper<W> {
    inner: W,
    line_bytes: usize,
}

impl<W: Write> LineWrapper<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            line_bytes: 0,
        }
    }

    /// Number of bytes written to the current line
    pub fn column(&self) -> usize {
        self.line_bytes
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for LineWrapper<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut consumed = 0;

        while consumed < buf.len() {
            let room = MAX_LINE_LENGTH - self.line_bytes;
            let end = consumed + min(room, buf.len() - consumed);

            let written = self.inner.write(&buf[consumed..end])?;
            if written == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write the whole line",
                ));
            }
            consumed += written;
            self.line_bytes += written;

            if self.line_bytes == MAX_LINE_LENGTH {
                self.inner.write_all(b"\r\n")?;
                self.line_bytes = 0;
            }
        }

        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
