//! ### Sending Messages
//!
//! Sealed [`Message`](crate::Message)s are delivered by the
//! [`SmtpTransport`](smtp::SmtpTransport), which talks SMTP to a relay server.
//! A transport opens one session per message and closes it when the server
//! accepted the message or at the first error.

pub mod smtp;
