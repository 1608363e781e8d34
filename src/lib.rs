//! Compose MIME multipart emails and send them over SMTP.
//!
//! A [`Message`] is written incrementally into an in-memory transcript: the
//! header block is emitted when the message is created, every part is base64
//! encoded and wrapped at 76 columns as it is written, and sealing the message
//! writes the closing multipart delimiter. The sealed message is then handed to
//! an [`SmtpTransport`], which negotiates STARTTLS and AUTH when the server
//! advertises them before delivering it.
//!
//! ## Features
//!
//! * **builder** (default): the [`Message`] builder
//! * **smtp-transport** (default): the SMTP transport
//! * **native-tls** (default): TLS through the system library
//! * **hostname** (default): use the machine host name in `EHLO`
//! * **tracing** (default): log the SMTP exchange with `tracing`
//! * **serde**: `Serialize`/`Deserialize` for envelopes and SMTP types
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "builder", feature = "smtp-transport", feature = "native-tls"))]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use missive::{transport::smtp::authentication::Credentials, Envelope, Message, SmtpTransport};
//!
//! let envelope = Envelope::new("Jöhn <john@example.org>", "Quarterly report")
//!     .with_to(["board@example.org"])
//!     .with_cc(["finance@example.org"]);
//!
//! let mut message = Message::new(envelope);
//! message.text("Please find the report attached.")?;
//! message.attach_file("report.pdf")?;
//! message.seal()?;
//!
//! let mailer = SmtpTransport::opportunistic("smtp.example.org:587")?
//!     .credentials(Credentials::new("john".to_owned(), "secret".to_owned()))
//!     .build();
//! mailer.send(message)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "builder", feature = "smtp-transport", feature = "native-tls")))]
//! # fn main() {}
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    missing_debug_implementations,
    rust_2018_idioms
)]

pub mod address;
pub mod error;
#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub mod message;
#[cfg(feature = "smtp-transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "smtp-transport")))]
pub mod transport;

pub use crate::address::Envelope;
pub use crate::error::Error;
#[cfg(feature = "builder")]
pub use crate::message::Message;
#[cfg(feature = "smtp-transport")]
pub use crate::transport::smtp::SmtpTransport;

/// Boxed error used as the source of the transport errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
