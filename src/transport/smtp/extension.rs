//! ESMTP features advertised in the `EHLO` reply

use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    net::{Ipv4Addr, Ipv6Addr},
};

use crate::transport::smtp::{error, response::Response, Error};

/// Name the client gives in `EHLO`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ClientId {
    /// A fully qualified domain name
    Domain(String),
    /// Written as the `[a.b.c.d]` address literal
    Ipv4(Ipv4Addr),
    /// Written as the `[IPv6:...]` address literal
    Ipv6(Ipv6Addr),
}

impl Default for ClientId {
    /// The host name of the machine, `[127.0.0.1]` when it isn't known
    ///
    /// [RFC 5321, section 4.1.4](https://tools.ietf.org/html/rfc5321#section-4.1.4)
    /// asks for an address literal when there is no usable name.
    fn default() -> Self {
        #[cfg(feature = "hostname")]
        {
            if let Some(name) = hostname::get().ok().and_then(|name| name.into_string().ok()) {
                return Self::Domain(name);
            }
        }

        Self::Ipv4(Ipv4Addr::LOCALHOST)
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(name) => f.write_str(name),
            Self::Ipv4(ip) => write!(f, "[{ip}]"),
            Self::Ipv6(ip) => write!(f, "[IPv6:{ip}]"),
        }
    }
}

/// The extensions the transport makes use of
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Extension {
    /// [RFC 6152](https://tools.ietf.org/html/rfc6152)
    EightBitMime,
    /// [RFC 6531](https://tools.ietf.org/html/rfc6531)
    SmtpUtfEight,
    /// [RFC 3207](https://tools.ietf.org/html/rfc3207)
    StartTls,
    /// [RFC 4954](https://tools.ietf.org/html/rfc4954), the mechanisms are
    /// kept in [`ServerInfo`]
    Authentication,
}

impl Extension {
    fn from_keyword(keyword: &str) -> Option<Self> {
        [
            Self::EightBitMime,
            Self::SmtpUtfEight,
            Self::StartTls,
            Self::Authentication,
        ]
        .into_iter()
        .find(|extension| keyword.eq_ignore_ascii_case(extension.keyword()))
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::EightBitMime => "8BITMIME",
            Self::SmtpUtfEight => "SMTPUTF8",
            Self::StartTls => "STARTTLS",
            Self::Authentication => "AUTH",
        }
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// What the server said about itself in its `EHLO` reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerInfo {
    name: String,
    extensions: HashSet<Extension>,
    /// Upper case, in the order of the reply
    auth_mechanisms: Vec<String>,
}

impl ServerInfo {
    /// Reads the server name from the first line and the keywords from the
    /// following ones, unknown keywords are skipped
    ///
    /// `AUTH=PLAIN LOGIN`, still sent by some servers, is read as
    /// `AUTH PLAIN LOGIN`.
    pub fn from_response(response: &Response) -> Result<Self, Error> {
        let name = response
            .first_word()
            .ok_or_else(|| error::response("the EHLO reply has no server name"))?;
        let mut info = Self {
            name: name.to_owned(),
            ..Self::default()
        };

        for line in response.message().skip(1) {
            let mut words = line.split(|c: char| c == ' ' || c == '=').filter(|w| !w.is_empty());
            let Some(extension) = words.next().and_then(Extension::from_keyword) else {
                continue;
            };
            info.extensions.insert(extension);

            if extension == Extension::Authentication {
                for mechanism in words.map(str::to_ascii_uppercase) {
                    if !info.auth_mechanisms.contains(&mechanism) {
                        info.auth_mechanisms.push(mechanism);
                    }
                }
            }
        }

        Ok(info)
    }

    pub fn supports_feature(&self, extension: Extension) -> bool {
        self.extensions.contains(&extension)
    }

    pub fn supports_auth_mechanism(&self, mechanism: &str) -> bool {
        self.auth_mechanisms
            .iter()
            .any(|known| known.eq_ignore_ascii_case(mechanism))
    }

    /// The first of `preferred` the server advertised
    pub fn get_auth_mechanism<'a>(&self, preferred: &[&'a str]) -> Option<&'a str> {
        preferred
            .iter()
            .copied()
            .find(|mechanism| self.supports_auth_mechanism(mechanism))
    }

    pub fn auth_mechanisms(&self) -> impl Iterator<Item = &str> {
        self.auth_mechanisms.iter().map(String::as_str)
    }

    /// Name the server gave in its reply
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for ServerInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        let mut extensions = self.extensions.iter().map(|e| e.keyword()).collect::<Vec<_>>();
        extensions.sort_unstable();
        if extensions.is_empty() {
            f.write_str(" (no known extension)")
        } else {
            write!(f, " ({})", extensions.join(" "))
        }
    }
}

/// Parameter added to `MAIL FROM`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MailParameter {
    /// `BODY=8BITMIME`, the message isn't 7 bit clean
    EightBitMime,
    /// `SMTPUTF8`, the envelope has non-ascii addresses
    SmtpUtfEight,
}

impl Display for MailParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EightBitMime => "BODY=8BITMIME",
            Self::SmtpUtfEight => "SMTPUTF8",
        })
    }
}

#[cfg(test)]
mod test {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use pretty_assertions::assert_eq;

    use super::{ClientId, Extension, MailParameter, ServerInfo};
    use crate::transport::smtp::response::Response;

    fn ehlo(lines: &[&str]) -> ServerInfo {
        let last = lines.len() - 1;
        let reply: String = lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("250{}{line}\r\n", if i == last { ' ' } else { '-' }))
            .collect();
        ServerInfo::from_response(&reply.parse::<Response>().unwrap()).unwrap()
    }

    #[test]
    fn client_id_literals() {
        assert_eq!(ClientId::Domain("mx.test".to_owned()).to_string(), "mx.test");
        assert_eq!(ClientId::Ipv4(Ipv4Addr::LOCALHOST).to_string(), "[127.0.0.1]");
        assert_eq!(ClientId::Ipv6(Ipv6Addr::LOCALHOST).to_string(), "[IPv6:::1]");
        assert!(!ClientId::default().to_string().is_empty());
    }

    #[test]
    fn known_keywords() {
        let info = ehlo(&["mx.test greets you", "8BITMIME", "SIZE 42", "starttls"]);

        assert_eq!(info.name(), "mx.test");
        assert!(info.supports_feature(Extension::EightBitMime));
        assert!(info.supports_feature(Extension::StartTls));
        assert!(!info.supports_feature(Extension::Authentication));
        assert_eq!(info.to_string(), "mx.test (8BITMIME STARTTLS)");
        assert_eq!(ehlo(&["mx.test"]).to_string(), "mx.test (no known extension)");
    }

    #[test]
    fn auth_mechanisms() {
        let info = ehlo(&["mx.test", "AUTH plain CRAM-MD5 XOAUTH2", "AUTH=LOGIN PLAIN"]);

        assert!(info.supports_feature(Extension::Authentication));
        assert_eq!(
            info.auth_mechanisms().collect::<Vec<_>>(),
            ["PLAIN", "CRAM-MD5", "XOAUTH2", "LOGIN"]
        );
        assert!(info.supports_auth_mechanism("login"));
        assert_eq!(info.get_auth_mechanism(&["GSSAPI", "XOAUTH2", "PLAIN"]), Some("XOAUTH2"));
        assert_eq!(info.get_auth_mechanism(&["GSSAPI"]), None);
    }

    #[test]
    fn server_name_is_not_a_keyword() {
        let info = ehlo(&["STARTTLS"]);

        assert_eq!(info.name(), "STARTTLS");
        assert!(!info.supports_feature(Extension::StartTls));
    }

    #[test]
    fn mail_parameters() {
        assert_eq!(MailParameter::EightBitMime.to_string(), "BODY=8BITMIME");
        assert_eq!(MailParameter::SmtpUtfEight.to_string(), "SMTPUTF8");

        let parameters = [MailParameter::SmtpUtfEight, MailParameter::EightBitMime];
        let first = parameters[0];
        assert_eq!(first, parameters[0]);
    }
}
