//! SMTP client
//!
//! [`SmtpConnection`] is one session with the server. The transport builds
//! it through [`SmtpClient::connection`](super::SmtpClient::connection),
//! which also negotiates STARTTLS and AUTH.

#[cfg(feature = "native-tls")]
pub use self::tls::{Certificate, TlsParametersBuilder};
pub use self::{
    connection::SmtpConnection,
    net::NetworkStream,
    tls::{Tls, TlsParameters},
};

mod connection;
mod net;
mod tls;

/// Appends `message` to `out` as the content of `DATA`
///
/// Every line starting with `.` gets another `.`
/// ([RFC 5321, section 4.5.2](https://tools.ietf.org/html/rfc5321#section-4.5.2)),
/// then the `.` line ends the data. The last line of the message is
/// completed with a CRLF first.
pub(crate) fn dot_stuff(message: &[u8], out: &mut Vec<u8>) {
    let mut line_start = true;
    for &byte in message {
        if line_start && byte == b'.' {
            out.push(b'.');
        }
        out.push(byte);
        line_start = byte == b'\n' && out.ends_with(b"\r\n");
    }

    if !line_start {
        if message.ends_with(b"\r") {
            out.push(b'\n');
        } else {
            out.extend_from_slice(b"\r\n");
        }
    }
    out.extend_from_slice(b".\r\n");
}

/// Shows the line breaks in logs
#[cfg(feature = "tracing")]
pub(super) fn escape_crlf(string: &str) -> String {
    string.replace("\r\n", "<CRLF>")
}
