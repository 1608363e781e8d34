//! Commands sent by the client

use std::fmt::{self, Debug, Display, Formatter};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::transport::smtp::extension::{ClientId, MailParameter};

/// One command line, written with its trailing CRLF
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Ehlo(&'a ClientId),
    /// Sent when the server rejects `EHLO`
    Helo(&'a ClientId),
    StartTls,
    /// `AUTH <mechanism> [initial response]`
    ///
    /// The response is base64 encoded, an empty one is written `=`
    /// ([RFC 4954, section 4](https://tools.ietf.org/html/rfc4954#section-4)).
    Auth {
        mechanism: &'a str,
        initial_response: Option<&'a [u8]>,
    },
    /// Answer to a `334` challenge, base64 encoded
    AuthResponse(&'a [u8]),
    /// `*`, gives up a running `AUTH` exchange
    AuthCancel,
    /// `MAIL FROM`, an empty sender is the null reverse path `<>`
    Mail {
        sender: &'a str,
        parameters: &'a [MailParameter],
    },
    Rcpt(&'a str),
    Data,
    Noop,
    Quit,
}

impl Command<'_> {
    /// Whether the line carries credentials and must stay out of the logs
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::AuthResponse(_))
    }
}

impl Display for Command<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Ehlo(client_id) => write!(f, "EHLO {client_id}")?,
            Self::Helo(client_id) => write!(f, "HELO {client_id}")?,
            Self::StartTls => f.write_str("STARTTLS")?,
            Self::Auth {
                mechanism,
                initial_response,
            } => {
                write!(f, "AUTH {mechanism}")?;
                match initial_response {
                    Some([]) => f.write_str(" =")?,
                    Some(response) => write!(f, " {}", STANDARD.encode(response))?,
                    None => {}
                }
            }
            Self::AuthResponse(response) => f.write_str(&STANDARD.encode(response))?,
            Self::AuthCancel => f.write_str("*")?,
            Self::Mail { sender, parameters } => {
                write!(f, "MAIL FROM:<{sender}>")?;
                for parameter in parameters {
                    write!(f, " {parameter}")?;
                }
            }
            Self::Rcpt(recipient) => write!(f, "RCPT TO:<{recipient}>")?,
            Self::Data => f.write_str("DATA")?,
            Self::Noop => f.write_str("NOOP")?,
            Self::Quit => f.write_str("QUIT")?,
        }
        f.write_str("\r\n")
    }
}

impl Debug for Command<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth { mechanism, .. } => write!(f, "Auth({mechanism}, ..)"),
            Self::AuthResponse(_) => f.write_str("AuthResponse(..)"),
            command => f.write_str(command.to_string().trim_end()),
        }
    }
}
