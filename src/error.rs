//! Error type for message composition

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    io,
};

/// Error type for message composition
///
/// `Sealed`, `PartOpen` and `NotSealed` report a misuse of the
/// [`Message`](crate::Message) lifecycle. A call rejected with one of them
/// leaves the message unchanged.
#[derive(Debug)]
pub enum Error {
    /// The message has already been sealed
    Sealed,
    /// A part is still open
    PartOpen,
    /// The message has not been sealed yet
    NotSealed,
    /// Reading an attachment or writing a part failed
    Io(io::Error),
}

impl Error {
    /// Returns true if the error reports a misuse of the message lifecycle
    pub fn is_composition(&self) -> bool {
        matches!(self, Error::Sealed | Error::PartOpen | Error::NotSealed)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Sealed => f.write_str("message has already been sealed"),
            Error::PartOpen => f.write_str("a part is still open"),
            Error::NotSealed => f.write_str("message has not been sealed"),
            Error::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
