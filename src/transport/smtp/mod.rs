//! SMTP transport
//!
//! A client for [RFC 5321](https://tools.ietf.org/html/rfc5321) submission
//! to a relay, which is trusted with checking the messages it accepts.
//!
//! Extensions used when the server advertises them:
//!
//! * 8BITMIME ([RFC 6152](https://tools.ietf.org/html/rfc6152)), for messages that aren't ascii
//! * AUTH ([RFC 4954](https://tools.ietf.org/html/rfc4954)) with PLAIN, LOGIN, XOAUTH2 or any
//!   [`Authenticator`](authentication::Authenticator)
//! * STARTTLS ([RFC 3207](https://tools.ietf.org/html/rfc3207))
//! * SMTPUTF8 ([RFC 6531](https://tools.ietf.org/html/rfc6531)), for envelopes with non-ascii addresses
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "builder", feature = "native-tls"))]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use missive::{transport::smtp::authentication::Credentials, Envelope, Message, SmtpTransport};
//!
//! let envelope = Envelope::new("NoBody <nobody@domain.tld>", "Happy new year")
//!     .with_to(["Hei <hei@domain.tld>"]);
//! let mut message = Message::new(envelope);
//! message.text("Be happy!")?;
//! message.seal()?;
//!
//! let mailer = SmtpTransport::relay("smtp.example.com")?
//!     .credentials(Credentials::new("username".to_owned(), "password".to_owned()))
//!     .build();
//!
//! let accepted = mailer.send(message)?;
//! println!("queued: {}", accepted.message().collect::<Vec<_>>().join(" "));
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "builder", feature = "native-tls")))]
//! # fn main() {}
//! ```

use std::{sync::Arc, time::Duration};

use self::{authentication::Authenticator, client::Tls, extension::ClientId};
pub use self::{
    error::Error,
    transport::{SmtpClient, SmtpTransport, SmtpTransportBuilder},
};

pub mod authentication;
pub mod client;
pub mod commands;
mod connection_url;
pub mod error;
pub mod extension;
pub mod response;
mod transport;

/// Relay port, plaintext
pub const SMTP_PORT: u16 = 25;
/// Submission port, upgraded with `STARTTLS`
pub const SUBMISSION_PORT: u16 = 587;
/// Submission over TLS port ([RFC 8314](https://tools.ietf.org/html/rfc8314))
pub const SUBMISSIONS_PORT: u16 = 465;

/// Settings shared by every session of a transport
#[derive(Debug, Clone)]
struct SmtpInfo {
    server: String,
    port: u16,
    hello_name: ClientId,
    tls: Tls,
    credentials: Option<Arc<dyn Authenticator>>,
    timeout: Option<Duration>,
}

impl Default for SmtpInfo {
    fn default() -> Self {
        Self {
            server: "localhost".to_owned(),
            port: SMTP_PORT,
            hello_name: ClientId::default(),
            credentials: None,
            timeout: None,
            tls: Tls::None,
        }
    }
}
