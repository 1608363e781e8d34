//! Incremental `multipart/mixed` messages
//!
//! A [`Message`] writes its header block as soon as it is created. Parts are
//! then appended one after the other, each body base64 encoded and wrapped at
//! 76 columns while it is written, and [`Message::seal`] closes the multipart
//! body. Only the sealed transcript can be sent.
//!
//! ## Usage
//!
//! ```rust
//! use std::io::Write;
//!
//! use missive::{
//!     message::header::{ContentType, Headers},
//!     Envelope, Message,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let envelope = Envelope::new("NoBody <nobody@domain.tld>", "Happy new year")
//!     .with_to(["Hei <hei@domain.tld>"]);
//!
//! let mut message = Message::new(envelope);
//! message.text("Be happy!")?;
//! message.html("<p><b>Be</b> happy!</p>")?;
//! message.attach_reader("notes.txt", &b"see you soon"[..])?;
//!
//! // a part written in several steps
//! message.text_part(ContentType::TEXT_PLAIN, |w| {
//!     writeln!(w, "first line")?;
//!     writeln!(w, "second line")
//! })?;
//!
//! message.seal()?;
//! assert!(message.formatted()?.ends_with(b"--\r\n"));
//! # Ok(())
//! # }
//! ```

use std::{
    fs::File,
    io::{self, Read, Write},
    iter,
    path::Path,
};

pub use mime;

pub use self::{encoder::LineWrapper, part::PartEncoder};
use self::header::{
    Bcc, Cc, ContentDisposition, ContentTransferEncoding, ContentType, Date, Header, HeaderValue,
    Headers, Subject, To, MIME_VERSION_1_0,
};
use crate::{address::Envelope, Error};

pub mod encoder;
pub mod header;
mod part;

/// Lifecycle of a [`Message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Created,
    PartOpen,
    PartClosed,
    Sealed,
}

/// Create a random MIME boundary
fn make_boundary() -> String {
    iter::repeat_with(fastrand::alphanumeric).take(40).collect()
}

/// A `multipart/mixed` email written incrementally
#[derive(Debug, Clone)]
pub struct Message {
    envelope: Envelope,
    boundary: String,
    buffer: Vec<u8>,
    state: State,
}

impl Message {
    /// Creates a message dated now and writes its header block
    pub fn new(envelope: Envelope) -> Self {
        Self::with_date(envelope, Date::now())
    }

    /// Creates a message with the given `Date` and writes its header block
    pub fn with_date(envelope: Envelope, date: Date) -> Self {
        let boundary = make_boundary();

        let mut headers = Headers::with_capacity(8);
        headers.set(date);
        headers.set(header::From::from(envelope.from()));
        // written even when empty, the header block always has the same fields
        headers.set(To::from_addresses(envelope.to()));
        headers.set(Bcc::from_addresses(envelope.bcc()));
        headers.set(Cc::from_addresses(envelope.cc()));
        headers.set(Subject::from(envelope.subject()));

        let content_type = format!("multipart/mixed; boundary={boundary}");
        headers.set_raw(HeaderValue::dangerous_new_pre_encoded(
            ContentType::name(),
            content_type.clone(),
            content_type,
        ));
        headers.set(MIME_VERSION_1_0);

        let buffer = format!("{headers}\r\n").into_bytes();

        Self {
            envelope,
            boundary,
            buffer,
            state: State::Created,
        }
    }

    /// Opens a part with the given headers
    ///
    /// `Content-Transfer-Encoding: base64` replaces any transfer encoding
    /// found in `headers`. The part stays open until the returned encoder is
    /// finished or dropped.
    pub fn open_part(&mut self, mut headers: Headers) -> Result<PartEncoder<'_>, Error> {
        match self.state {
            State::Sealed => return Err(Error::Sealed),
            State::PartOpen => return Err(Error::PartOpen),
            State::Created | State::PartClosed => {}
        }

        headers.remove_raw(&ContentTransferEncoding::name());
        headers.set(ContentTransferEncoding::Base64);

        if self.state == State::PartClosed {
            self.buffer.extend_from_slice(b"\r\n");
        }
        self.buffer.extend_from_slice(b"--");
        self.buffer.extend_from_slice(self.boundary.as_bytes());
        self.buffer.extend_from_slice(b"\r\n");
        self.buffer.extend_from_slice(headers.to_string().as_bytes());
        self.buffer.extend_from_slice(b"\r\n");

        self.state = State::PartOpen;
        Ok(PartEncoder::new(&mut self.buffer, &mut self.state))
    }

    /// Writes a part whose body is produced by `f`
    ///
    /// The part is closed even if `f` fails, in which case the error of `f`
    /// is returned.
    pub fn part<F>(&mut self, headers: Headers, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut encoder = self.open_part(headers)?;
        let result = f(&mut encoder);
        let finished = encoder.finish();

        result.and(finished).map_err(Error::Io)
    }

    /// Writes a text part of the given type, `ContentType::TEXT_PLAIN` or
    /// `ContentType::TEXT_HTML` for example
    pub fn text_part<F>(&mut self, content_type: ContentType, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut headers = Headers::new();
        headers.set(content_type);
        self.part(headers, f)
    }

    /// Writes a `text/plain` part
    pub fn text(&mut self, text: &str) -> Result<(), Error> {
        self.text_part(ContentType::TEXT_PLAIN, |w| w.write_all(text.as_bytes()))
    }

    /// Writes a `text/html` part
    pub fn html(&mut self, html: &str) -> Result<(), Error> {
        self.text_part(ContentType::TEXT_HTML, |w| w.write_all(html.as_bytes()))
    }

    /// Writes an `application/octet-stream` attachment named `filename`
    pub fn binary_part<F>(&mut self, filename: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut headers = Headers::with_capacity(3);
        headers.set(ContentType::APPLICATION_OCTET_STREAM);
        headers.set(ContentDisposition::attachment(filename));
        self.part(headers, f)
    }

    /// Attaches everything `reader` yields
    pub fn attach_reader<R: Read>(&mut self, filename: &str, mut reader: R) -> Result<(), Error> {
        self.binary_part(filename, |w| io::copy(&mut reader, w).map(|_| ()))
    }

    /// Attaches a file, named after the last component of `path`
    pub fn attach_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
            .to_string_lossy()
            .into_owned();

        let file = File::open(path)?;
        self.attach_reader(&filename, file)
    }

    /// Writes the closing delimiter
    ///
    /// No part can be added afterwards.
    pub fn seal(&mut self) -> Result<(), Error> {
        match self.state {
            State::Sealed => return Err(Error::Sealed),
            State::PartOpen => return Err(Error::PartOpen),
            State::Created | State::PartClosed => {}
        }

        self.buffer.extend_from_slice(b"\r\n--");
        self.buffer.extend_from_slice(self.boundary.as_bytes());
        self.buffer.extend_from_slice(b"--\r\n");

        self.state = State::Sealed;
        Ok(())
    }

    /// Returns true once the message has been sealed
    pub fn is_sealed(&self) -> bool {
        self.state == State::Sealed
    }

    /// Get `Message` envelope
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The multipart boundary
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get message content formatted for SMTP
    pub fn formatted(&self) -> Result<&[u8], Error> {
        if self.is_sealed() {
            Ok(&self.buffer)
        } else {
            Err(Error::NotSealed)
        }
    }

    /// Consumes the message, returning its content formatted for SMTP
    pub fn into_formatted(self) -> Result<Vec<u8>, Error> {
        if self.is_sealed() {
            Ok(self.buffer)
        } else {
            Err(Error::NotSealed)
        }
    }
}
