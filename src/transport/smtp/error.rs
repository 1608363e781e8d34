//! Errors of the SMTP transport

use std::{
    error::Error as StdError,
    fmt::{self, Debug, Display, Formatter},
    io,
};

use crate::{
    transport::smtp::response::{Code, Severity},
    BoxError,
};

/// Why a send failed
///
/// The cause is exposed through the `is_*` methods, the underlying error, if
/// any, through [`source`](StdError::source).
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
}

#[derive(Debug)]
enum Kind {
    /// `4yz` reply
    Transient(Code),
    /// `5yz` reply
    Permanent(Code),
    /// The reply couldn't be parsed
    Response,
    /// The client was asked something the session can't do
    Client,
    /// Resolving or dialing the server failed
    Connection,
    /// Reading or writing the socket failed
    Network,
    #[cfg(feature = "native-tls")]
    Tls,
    /// The `AUTH` exchange failed
    Authentication,
    /// The message isn't ready to be sent
    Composition,
}

impl Error {
    fn new(kind: Kind, source: Option<BoxError>) -> Self {
        Self {
            inner: Box::new(Inner { kind, source }),
        }
    }

    fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// The server replied with a `4yz` code, trying later may work
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), Kind::Transient(_))
    }

    /// The server replied with a `5yz` code
    pub fn is_permanent(&self) -> bool {
        matches!(self.kind(), Kind::Permanent(_))
    }

    /// The server sent something that isn't an SMTP reply
    pub fn is_response(&self) -> bool {
        matches!(self.kind(), Kind::Response)
    }

    /// The session lacks an extension the send needs, STARTTLS or 8BITMIME
    /// for example
    pub fn is_client(&self) -> bool {
        matches!(self.kind(), Kind::Client)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self.kind(), Kind::Connection)
    }

    pub fn is_network(&self) -> bool {
        matches!(self.kind(), Kind::Network)
    }

    #[cfg(feature = "native-tls")]
    #[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
    pub fn is_tls(&self) -> bool {
        matches!(self.kind(), Kind::Tls)
    }

    /// No mechanism could be agreed on, or the server refused the credentials
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind(), Kind::Authentication)
    }

    /// The message wasn't sealed
    pub fn is_composition(&self) -> bool {
        matches!(self.kind(), Kind::Composition)
    }

    /// Some error in the chain of sources is an I/O timeout
    pub fn is_timeout(&self) -> bool {
        let mut cause = self.source();
        while let Some(err) = cause {
            if let Some(err) = err.downcast_ref::<io::Error>() {
                return matches!(
                    err.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                );
            }
            cause = err.source();
        }
        false
    }

    /// Code of the rejecting reply
    pub fn status(&self) -> Option<Code> {
        match *self.kind() {
            Kind::Transient(code) | Kind::Permanent(code) => Some(code),
            _ => None,
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("missive::transport::smtp::Error");
        debug.field("kind", self.kind());
        if let Some(source) = &self.inner.source {
            debug.field("source", source);
        }
        debug.finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Kind::Transient(code) => write!(f, "transient error ({code})")?,
            Kind::Permanent(code) => write!(f, "permanent error ({code})")?,
            Kind::Response => f.write_str("invalid response")?,
            Kind::Client => f.write_str("client error")?,
            Kind::Connection => f.write_str("connection error")?,
            Kind::Network => f.write_str("network error")?,
            #[cfg(feature = "native-tls")]
            Kind::Tls => f.write_str("tls error")?,
            Kind::Authentication => f.write_str("authentication error")?,
            Kind::Composition => f.write_str("message error")?,
        }
        match &self.inner.source {
            Some(source) => write!(f, ": {source}"),
            None => Ok(()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let source: &(dyn StdError + 'static) = self.inner.source.as_deref()?;
        Some(source)
    }
}

/// Error for a negative reply, `text` being the reply lines
pub(crate) fn code(code: Code, text: Option<String>) -> Error {
    let kind = match code.severity() {
        Severity::Transient => Kind::Transient(code),
        Severity::Permanent => Kind::Permanent(code),
        Severity::Completed | Severity::Intermediate => {
            return client(format!("{code} is not an error"))
        }
    };
    Error::new(kind, text.map(Into::into))
}

pub(crate) fn response<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Response, Some(e.into()))
}

pub(crate) fn client<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Client, Some(e.into()))
}

pub(crate) fn connection<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connection, Some(e.into()))
}

pub(crate) fn network<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Network, Some(e.into()))
}

#[cfg(feature = "native-tls")]
pub(crate) fn tls<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Tls, Some(e.into()))
}

pub(crate) fn authentication<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Authentication, Some(e.into()))
}

pub(crate) fn composition<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Composition, Some(e.into()))
}
