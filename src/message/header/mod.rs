//! Headers of the message and of its parts
// https://tools.ietf.org/html/rfc5322#section-2.2

use std::{
    borrow::Cow,
    error::Error as StdError,
    fmt::{self, Display, Formatter, Write},
    ops::Deref,
};

use email_encoding::headers::writer::EmailWriter;

pub use self::{
    content::ContentTransferEncoding,
    content_disposition::ContentDisposition,
    content_type::{ContentType, ContentTypeErr},
    date::Date,
    special::{MimeVersion, MIME_VERSION_1_0},
    textual::{Bcc, Cc, From, Subject, To},
};

mod content;
mod content_disposition;
mod content_type;
mod date;
mod special;
mod textual;

/// Represents an email header
///
/// Email header as defined in [RFC5322](https://datatracker.ietf.org/doc/html/rfc5322) and extensions.
pub trait Header: Clone {
    fn name() -> HeaderName;

    fn display(&self) -> HeaderValue;
}

/// A set of email headers
///
/// Names are compared case-insensitively, the insertion order is kept when
/// the headers are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<HeaderValue>,
}

impl Headers {
    /// Create an empty `Headers`
    #[inline]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Create an empty `Headers` with a pre-allocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            headers: Vec::with_capacity(capacity),
        }
    }

    /// Sets `Header`, replacing a header with the same name
    pub fn set<H: Header>(&mut self, header: H) {
        self.set_raw(header.display());
    }

    /// Get the raw value of a header named `name`
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.find_header(name).map(HeaderValue::get_raw)
    }

    /// Sets a header, replacing the value of a header with the same name
    ///
    /// A replaced header keeps the spelling of its name.
    pub fn set_raw(&mut self, value: HeaderValue) {
        match self.find_header_mut(&value.name) {
            Some(current) => {
                current.raw_value = value.raw_value;
                current.encoded_value = value.encoded_value;
            }
            None => self.headers.push(value),
        }
    }

    /// Appends a header, even if one with the same name is already present
    pub fn insert_raw(&mut self, value: HeaderValue) {
        self.headers.push(value);
    }

    /// Remove a header named `name`
    pub fn remove_raw(&mut self, name: &str) -> Option<HeaderValue> {
        self.find_header_index(name).map(|i| self.headers.remove(i))
    }

    /// Number of headers
    #[inline]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if no header has been set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over the headers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &HeaderValue> {
        self.headers.iter()
    }

    fn find_header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|value| name.eq_ignore_ascii_case(&value.name))
    }

    fn find_header_mut(&mut self, name: &str) -> Option<&mut HeaderValue> {
        self.headers
            .iter_mut()
            .find(|value| name.eq_ignore_ascii_case(&value.name))
    }

    fn find_header_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|value| name.eq_ignore_ascii_case(&value.name))
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for value in &self.headers {
            f.write_str(&value.name)?;
            f.write_str(": ")?;
            f.write_str(&value.encoded_value)?;
            f.write_str("\r\n")?;
        }

        Ok(())
    }
}

/// A possible error when converting a `HeaderName` from another type.
// comes from `http` crate
#[allow(missing_copy_implementations)]
#[derive(Clone)]
pub struct InvalidHeaderName {
    _priv: (),
}

impl fmt::Debug for InvalidHeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidHeaderName")
            // skip _priv noise
            .finish()
    }
}

impl Display for InvalidHeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("invalid header name")
    }
}

impl StdError for InvalidHeaderName {}

/// A valid header name
#[derive(Debug, Clone)]
pub struct HeaderName(Cow<'static, str>);

impl HeaderName {
    /// Creates a new header name
    pub fn new_from_ascii(ascii: String) -> Result<Self, InvalidHeaderName> {
        if !ascii.is_empty()
            && ascii.len() <= 76
            && ascii.bytes().all(|c| c.is_ascii_graphic() && c != b':')
        {
            Ok(Self(Cow::Owned(ascii)))
        } else {
            Err(InvalidHeaderName { _priv: () })
        }
    }

    /// Creates a new header name, panics on invalid name
    pub const fn new_from_ascii_str(ascii: &'static str) -> Self {
        let bytes = ascii.as_bytes();
        assert!(
            !bytes.is_empty() && bytes.len() <= 76,
            "header name must be between 1 and 76 characters"
        );

        let mut i = 0;
        while i < bytes.len() {
            assert!(
                bytes[i].is_ascii_graphic() && bytes[i] != b':',
                "header name must be printable ascii without ':'"
            );
            i += 1;
        }

        Self(Cow::Borrowed(ascii))
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl Deref for HeaderName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for HeaderName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<HeaderName> for HeaderName {
    fn eq(&self, other: &HeaderName) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl Eq for HeaderName {}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<HeaderName> for &str {
    fn eq(&self, other: &HeaderName) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

/// A safe for use header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValue {
    name: HeaderName,
    raw_value: String,
    encoded_value: String,
}

impl HeaderValue {
    /// Construct a new `HeaderValue` and encode it
    ///
    /// Takes the header `name` and the `raw_value` and encodes
    /// it via `RFC2047` when it contains characters that can't be
    /// written as is.
    pub fn new(name: HeaderName, raw_value: String) -> Self {
        let mut encoded_value = String::with_capacity(raw_value.len());
        // writing to a `String` can't fail
        let _ = HeaderValueEncoder::encode(name.len() + ": ".len(), &raw_value, &mut encoded_value);

        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    /// Construct a new `HeaderValue` using a pre-encoded header value
    ///
    /// This method is _extremely_ dangerous as it opens up
    /// the encoder to header injection attacks, but is sometimes
    /// acceptable for use if `encoded_value` contains only ascii
    /// printable characters and is already folded.
    pub fn dangerous_new_pre_encoded(
        name: HeaderName,
        raw_value: String,
        encoded_value: String,
    ) -> Self {
        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    /// Header name
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Value before encoding
    pub fn get_raw(&self) -> &str {
        &self.raw_value
    }

    /// Value as written on the wire
    pub fn get_encoded(&self) -> &str {
        &self.encoded_value
    }
}

/// Writes `value` as a sequence of encoded words
///
/// `line_len` is the number of characters already written to the current
/// line, the output is folded once it reaches 76 characters.
pub(crate) fn encode_words(line_len: usize, value: &str, out: &mut String) -> fmt::Result {
    let mut writer = EmailWriter::new(out, line_len, 0, false);
    email_encoding::headers::rfc2047::encode(value, &mut writer)
}

/// [RFC 1522](https://tools.ietf.org/html/rfc1522) header value encoder
struct HeaderValueEncoder<'a> {
    writer: EmailWriter<'a>,
    encode_buf: String,
}

impl<'a> HeaderValueEncoder<'a> {
    fn encode(line_len: usize, value: &'a str, f: &'a mut impl Write) -> fmt::Result {
        let encoder = Self {
            writer: EmailWriter::new(f, line_len, 0, false),
            encode_buf: String::new(),
        };
        encoder.format(value.split_inclusive(' '))
    }

    fn format(mut self, words_iter: impl Iterator<Item = &'a str>) -> fmt::Result {
        for next_word in words_iter {
            if allowed_str(next_word) {
                // the next word is allowed, but we may have accumulated some words to encode
                self.flush_encode_buf()?;

                self.writer.folding().write_str(next_word)?;
            } else {
                self.encode_buf.push_str(next_word);
            }
        }

        self.flush_encode_buf()
    }

    fn flush_encode_buf(&mut self) -> fmt::Result {
        if self.encode_buf.is_empty() {
            return Ok(());
        }

        let prefix = self.encode_buf.trim_end_matches(' ');
        email_encoding::headers::rfc2047::encode(prefix, &mut self.writer)?;

        let spaces = self.encode_buf.len() - prefix.len();
        for _ in 0..spaces {
            self.writer.space();
        }

        self.encode_buf.clear();
        Ok(())
    }
}

fn allowed_str(s: &str) -> bool {
    s.chars().all(allowed_char)
}

const fn allowed_char(c: char) -> bool {
    c >= 1 as char && c <= 9 as char
        || c == 11 as char
        || c == 12 as char
        || c >= 14 as char && c <= 127 as char
}
