use std::{
    fmt::{self, Debug, Formatter},
    io::{BufRead, BufReader, Write},
    net::{Shutdown, ToSocketAddrs},
    time::Duration,
};

use base64::{engine::general_purpose::STANDARD, Engine};

#[cfg(feature = "tracing")]
use super::escape_crlf;
use super::{dot_stuff, NetworkStream, TlsParameters};
use crate::{
    address::Envelope,
    transport::smtp::{
        authentication::Authenticator,
        commands::Command,
        error::{self, Error},
        extension::{ClientId, Extension, MailParameter, ServerInfo},
        response::{parse_response, Response},
    },
};

/// Most `334` challenges answered in one `AUTH` exchange
const MAX_CHALLENGES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    Open,
    /// `QUIT` was sent
    Closed,
    /// The stream failed or is out of sync with the server
    Broken,
}

/// One SMTP session
///
/// Dropping an open session sends `QUIT`, the socket is shut down in any case.
pub struct SmtpConnection {
    stream: BufReader<NetworkStream>,
    server_info: ServerInfo,
    session: Session,
}

impl SmtpConnection {
    /// Connects, reads the greeting and introduces the client
    ///
    /// A server rejecting `EHLO` gets `HELO` and is assumed to support no
    /// extension.
    pub fn connect<A: ToSocketAddrs>(
        server: A,
        timeout: Option<Duration>,
        hello_name: &ClientId,
        wrapper: Option<&TlsParameters>,
    ) -> Result<Self, Error> {
        let stream = NetworkStream::connect(server, timeout, wrapper)?;
        let mut conn = Self {
            stream: BufReader::new(stream),
            server_info: ServerInfo::default(),
            session: Session::Open,
        };

        conn.read_response()?;
        conn.hello(hello_name)?;
        Ok(conn)
    }

    fn hello(&mut self, hello_name: &ClientId) -> Result<(), Error> {
        self.server_info = match self.command(Command::Ehlo(hello_name)) {
            Ok(reply) => ServerInfo::from_response(&reply)?,
            Err(err) if err.is_permanent() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("EHLO rejected, trying HELO: {err}");
                let reply = self.command(Command::Helo(hello_name))?;
                ServerInfo::from_response(&reply).unwrap_or_default()
            }
            Err(err) => return Err(err),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("server {}", self.server_info);
        Ok(())
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn is_encrypted(&self) -> bool {
        self.stream.get_ref().is_encrypted()
    }

    /// The session is in plaintext and the server offers `STARTTLS`
    pub fn can_starttls(&self) -> bool {
        !self.is_encrypted() && self.server_info.supports_feature(Extension::StartTls)
    }

    /// Upgrades the session with `STARTTLS` and introduces the client again
    pub fn starttls(
        &mut self,
        parameters: &TlsParameters,
        hello_name: &ClientId,
    ) -> Result<(), Error> {
        if !self.server_info.supports_feature(Extension::StartTls) {
            return Err(error::client("the server doesn't offer STARTTLS"));
        }

        self.command(Command::StartTls)?;
        // bytes read past the reply would be taken as sent over TLS
        if !self.stream.buffer().is_empty() {
            self.session = Session::Broken;
            return Err(error::response("data received after the STARTTLS reply"));
        }
        if let Err(err) = self.stream.get_mut().upgrade_tls(parameters) {
            self.session = Session::Broken;
            return Err(err);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("connection encrypted");
        self.hello(hello_name)
    }

    /// Authenticates with the first mechanism of `authenticator` the server
    /// offers
    ///
    /// Any failure, the server refusing the credentials included, is an
    /// authentication error.
    pub fn auth(&mut self, authenticator: &dyn Authenticator) -> Result<Response, Error> {
        let mechanism = self
            .server_info
            .get_auth_mechanism(&authenticator.mechanisms())
            .ok_or_else(|| error::authentication("no mechanism offered by the server"))?;
        #[cfg(feature = "tracing")]
        tracing::debug!("authenticating with {mechanism}");

        let initial_response = authenticator
            .initial_response(mechanism)
            .map_err(error::authentication)?;
        let mut reply = self
            .command(Command::Auth {
                mechanism,
                initial_response: initial_response.as_deref(),
            })
            .map_err(error::authentication)?;

        for _ in 0..MAX_CHALLENGES {
            if !reply.has_code(334) {
                return Ok(reply);
            }

            let answer = STANDARD
                .decode(reply.first_word().unwrap_or_default())
                .map_err(error::authentication)
                .and_then(|challenge| {
                    authenticator
                        .respond(mechanism, &challenge)
                        .map_err(error::authentication)
                });
            let answer = match answer {
                Ok(answer) => answer,
                Err(err) => {
                    self.cancel_auth();
                    return Err(err);
                }
            };
            reply = self
                .command(Command::AuthResponse(&answer))
                .map_err(error::authentication)?;
        }

        if reply.has_code(334) {
            self.cancel_auth();
            return Err(error::authentication("too many challenges"));
        }
        Ok(reply)
    }

    fn cancel_auth(&mut self) {
        // the server answers `501`
        let _ = self.command(Command::AuthCancel);
    }

    /// Runs one mail transaction: `MAIL FROM`, `RCPT TO` for every recipient,
    /// `DATA` and the message
    ///
    /// The first rejected command ends the transaction.
    pub fn send(&mut self, envelope: &Envelope, email: &[u8]) -> Result<Response, Error> {
        let mut parameters = Vec::new();
        if envelope.has_non_ascii_addresses() {
            if !self.server_info.supports_feature(Extension::SmtpUtfEight) {
                return Err(error::client(
                    "the envelope has non-ascii addresses and the server doesn't offer SMTPUTF8",
                ));
            }
            parameters.push(MailParameter::SmtpUtfEight);
        }
        if !email.is_ascii() {
            if !self.server_info.supports_feature(Extension::EightBitMime) {
                return Err(error::client(
                    "the message isn't ascii and the server doesn't offer 8BITMIME",
                ));
            }
            parameters.push(MailParameter::EightBitMime);
        }

        self.command(Command::Mail {
            sender: envelope.sender(),
            parameters: &parameters,
        })?;
        for recipient in envelope.recipients() {
            self.command(Command::Rcpt(recipient))?;
        }
        self.command(Command::Data)?;

        let mut data = Vec::with_capacity(email.len() + email.len() / 64 + 5);
        dot_stuff(email, &mut data);
        self.write(&data)?;
        #[cfg(feature = "tracing")]
        tracing::debug!("Wrote: message of {} bytes", data.len());
        self.read_response()
    }

    /// Sends `NOOP`, false if the server didn't accept it
    pub fn test_connected(&mut self) -> bool {
        self.command(Command::Noop).is_ok()
    }

    pub fn quit(&mut self) -> Result<Response, Error> {
        self.session = Session::Closed;
        self.command(Command::Quit)
    }

    /// Ends the session without waiting for anything, errors are ignored
    pub fn abort(&mut self) {
        if self.session == Session::Open {
            let _ = self.quit();
        }
        let _ = self.stream.get_ref().shutdown(Shutdown::Both);
    }

    /// Writes `command` and reads the reply, negative replies are errors
    pub fn command(&mut self, command: Command<'_>) -> Result<Response, Error> {
        let line = command.to_string();
        self.write(line.as_bytes())?;

        #[cfg(feature = "tracing")]
        {
            if command.is_secret() {
                tracing::debug!("Wrote: <authentication data>");
            } else {
                tracing::debug!("Wrote: {}", escape_crlf(&line));
            }
        }

        self.read_response()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let stream = self.stream.get_mut();
        if let Err(err) = stream.write_all(bytes).and_then(|()| stream.flush()) {
            self.session = Session::Broken;
            return Err(error::network(err));
        }
        Ok(())
    }

    /// Reads lines until they make a complete reply
    pub fn read_response(&mut self) -> Result<Response, Error> {
        let mut buffer = String::new();
        loop {
            match self.stream.read_line(&mut buffer) {
                Ok(0) => {
                    self.session = Session::Broken;
                    return Err(error::response("connection closed in the middle of a reply"));
                }
                Ok(_) => {}
                Err(err) => {
                    self.session = Session::Broken;
                    return Err(error::network(err));
                }
            }

            let reply = match parse_response(&buffer) {
                Ok((_, reply)) => reply,
                Err(nom::Err::Incomplete(_)) => continue,
                Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
                    self.session = Session::Broken;
                    return Err(error::response(err.to_string()));
                }
            };

            #[cfg(feature = "tracing")]
            tracing::debug!("<< {}", escape_crlf(&buffer));
            return if reply.is_positive() {
                Ok(reply)
            } else {
                let text = reply.message().collect::<Vec<_>>().join(" ");
                Err(error::code(reply.code(), Some(text)))
            };
        }
    }
}

impl Drop for SmtpConnection {
    fn drop(&mut self) {
        self.abort();
    }
}

impl Debug for SmtpConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConnection")
            .field("stream", self.stream.get_ref())
            .field("server_info", &self.server_info)
            .field("session", &self.session)
            .finish()
    }
}
