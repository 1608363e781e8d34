//! SASL authentication
//!
//! The transport runs `AUTH` through an [`Authenticator`]. [`Credentials`]
//! implement the username and password mechanisms, other schemes are plugged
//! in by implementing the trait.

use std::fmt::{self, Debug, Display, Formatter};

use crate::BoxError;

/// Mechanisms offered by [`Credentials::new`], LOGIN last as it is obsolete
pub const DEFAULT_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// Runs the client side of a SASL exchange
///
/// Challenges and answers are raw bytes, the connection base64 encodes them.
pub trait Authenticator: Debug + Send + Sync {
    /// Mechanism names, preferred first
    fn mechanisms(&self) -> Vec<&str>;

    /// Data sent with `AUTH <mechanism>`, `None` to wait for a challenge
    fn initial_response(&self, mechanism: &str) -> Result<Option<Vec<u8>>, BoxError>;

    /// Answer to a `334` challenge
    fn respond(&self, mechanism: &str, challenge: &[u8]) -> Result<Vec<u8>, BoxError>;
}

/// SASL mechanisms implemented by [`Credentials`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mechanism {
    /// [RFC 4616](https://tools.ietf.org/html/rfc4616)
    Plain,
    /// [draft-murchison-sasl-login](https://www.ietf.org/archive/id/draft-murchison-sasl-login-00.txt),
    /// obsolete but still the only choice on some servers
    Login,
    /// [XOAUTH2](https://developers.google.com/gmail/imap/xoauth2-protocol),
    /// the secret is an OAuth 2 access token
    Xoauth2,
}

impl Mechanism {
    fn name(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
            Self::Xoauth2 => "XOAUTH2",
        }
    }
}

impl Display for Mechanism {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A username and a password (or token)
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credentials {
    username: String,
    secret: String,
    mechanisms: Vec<Mechanism>,
}

impl Credentials {
    /// Credentials offering the [`DEFAULT_MECHANISMS`]
    pub fn new(username: String, secret: String) -> Self {
        Self {
            username,
            secret,
            mechanisms: DEFAULT_MECHANISMS.to_vec(),
        }
    }

    /// Offers `mechanisms` instead, in this order of preference
    pub fn with_mechanisms(self, mechanisms: &[Mechanism]) -> Self {
        Self {
            mechanisms: mechanisms.to_vec(),
            ..self
        }
    }

    fn find(&self, name: &str) -> Result<Mechanism, BoxError> {
        self.mechanisms
            .iter()
            .copied()
            .find(|mechanism| mechanism.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("{name} isn't one of the offered mechanisms").into())
    }
}

impl<U: Into<String>, S: Into<String>> From<(U, S)> for Credentials {
    fn from((username, secret): (U, S)) -> Self {
        Self::new(username.into(), secret.into())
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("mechanisms", &self.mechanisms)
            .finish_non_exhaustive()
    }
}

impl Authenticator for Credentials {
    fn mechanisms(&self) -> Vec<&str> {
        self.mechanisms.iter().map(|mechanism| mechanism.name()).collect()
    }

    fn initial_response(&self, mechanism: &str) -> Result<Option<Vec<u8>>, BoxError> {
        Ok(match self.find(mechanism)? {
            Mechanism::Plain => Some(format!("\0{}\0{}", self.username, self.secret).into_bytes()),
            Mechanism::Xoauth2 => Some(
                format!("user={}\x01auth=Bearer {}\x01\x01", self.username, self.secret)
                    .into_bytes(),
            ),
            Mechanism::Login => None,
        })
    }

    fn respond(&self, mechanism: &str, challenge: &[u8]) -> Result<Vec<u8>, BoxError> {
        match self.find(mechanism)? {
            Mechanism::Login => {
                let prompt = std::str::from_utf8(challenge)?
                    .trim_end_matches(':')
                    .replace(' ', "")
                    .to_ascii_lowercase();
                match prompt.as_str() {
                    "username" => Ok(self.username.clone().into_bytes()),
                    "password" => Ok(self.secret.clone().into_bytes()),
                    _ => Err(format!("unexpected LOGIN prompt {prompt:?}").into()),
                }
            }
            other => Err(format!("{other} sends everything in its initial response").into()),
        }
    }
}
