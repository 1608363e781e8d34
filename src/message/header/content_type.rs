use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use mime::Mime;

use super::{Header, HeaderName, HeaderValue};

/// `Content-Type` of a part ([RFC 2045](https://tools.ietf.org/html/rfc2045#section-5))
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType(Mime);

impl ContentType {
    /// `text/plain; charset=utf-8`
    pub const TEXT_PLAIN: ContentType = ContentType(mime::TEXT_PLAIN_UTF_8);
    /// `text/html; charset=utf-8`
    pub const TEXT_HTML: ContentType = ContentType(mime::TEXT_HTML_UTF_8);
    /// `application/octet-stream`, the type of attachments
    pub const APPLICATION_OCTET_STREAM: ContentType = ContentType(mime::APPLICATION_OCTET_STREAM);

    pub fn parse(value: &str) -> Result<ContentType, ContentTypeErr> {
        value.parse::<Mime>().map(ContentType).map_err(ContentTypeErr)
    }
}

impl FromStr for ContentType {
    type Err = ContentTypeErr;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ContentType::parse(value)
    }
}

impl From<Mime> for ContentType {
    fn from(mime: Mime) -> Self {
        ContentType(mime)
    }
}

impl Header for ContentType {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Type")
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_string())
    }
}

/// The value given to [`ContentType::parse`] isn't a media type
#[derive(Debug)]
pub struct ContentTypeErr(mime::FromStrError);

impl Display for ContentTypeErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid media type: {}", self.0)
    }
}

impl StdError for ContentTypeErr {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}
