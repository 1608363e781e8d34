//! TLS settings of the connection, implemented with `native-tls`

use std::fmt::{self, Debug, Formatter};

#[cfg(feature = "native-tls")]
use native_tls::{Protocol, TlsConnector};

#[cfg(feature = "native-tls")]
use crate::transport::smtp::error::{self, Error};

/// When the connection is encrypted
#[derive(Clone)]
#[allow(missing_copy_implementations)]
pub enum Tls {
    /// Never, for local testing
    None,
    /// After `STARTTLS` when the server advertises it, in plaintext otherwise
    ///
    /// A failed upgrade ends the session, the message is never sent in
    /// plaintext once `STARTTLS` was tried.
    #[cfg(feature = "native-tls")]
    #[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
    Opportunistic(TlsParameters),
    /// After `STARTTLS`, which the server must advertise
    #[cfg(feature = "native-tls")]
    #[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
    Required(TlsParameters),
    /// From the first byte, also known as SMTPS
    #[cfg(feature = "native-tls")]
    #[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
    Wrapper(TlsParameters),
}

impl Debug for Tls {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            #[cfg(feature = "native-tls")]
            Self::Opportunistic(_) => "Opportunistic",
            #[cfg(feature = "native-tls")]
            Self::Required(_) => "Required",
            #[cfg(feature = "native-tls")]
            Self::Wrapper(_) => "Wrapper",
        };
        f.write_str(name)
    }
}

/// A configured TLS client and the name the server certificate must match
#[derive(Clone)]
pub struct TlsParameters {
    #[cfg(feature = "native-tls")]
    pub(super) connector: TlsConnector,
    domain: String,
}

impl TlsParameters {
    /// Trusts the system certificates, which must be valid for `domain`
    #[cfg(feature = "native-tls")]
    #[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
    pub fn new(domain: String) -> Result<Self, Error> {
        Self::builder(domain).build()
    }

    #[cfg(feature = "native-tls")]
    #[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
    pub fn builder(domain: String) -> TlsParametersBuilder {
        TlsParametersBuilder {
            domain,
            root_certificates: Vec::new(),
            accept_invalid_hostnames: false,
            accept_invalid_certs: false,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl Debug for TlsParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsParameters")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// Builds [`TlsParameters`] trusting other certificates
///
/// TLS 1.0 and 1.1 are never negotiated.
#[cfg(feature = "native-tls")]
#[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
#[derive(Debug, Clone)]
pub struct TlsParametersBuilder {
    domain: String,
    root_certificates: Vec<Certificate>,
    accept_invalid_hostnames: bool,
    accept_invalid_certs: bool,
}

#[cfg(feature = "native-tls")]
impl TlsParametersBuilder {
    /// Also trusts `certificate`, a self-signed one for example
    pub fn add_root_certificate(mut self, certificate: Certificate) -> Self {
        self.root_certificates.push(certificate);
        self
    }

    /// Accepts certificates issued for another name
    ///
    /// Any valid certificate is then trusted, whoever it was issued to. Only
    /// use this against servers you control.
    pub fn dangerous_accept_invalid_hostnames(mut self, accept: bool) -> Self {
        self.accept_invalid_hostnames = accept;
        self
    }

    /// Accepts every certificate, expired or self-signed ones included
    ///
    /// The connection is then open to anyone able to intercept it. Only use
    /// this against servers you control.
    pub fn dangerous_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<TlsParameters, Error> {
        let mut builder = TlsConnector::builder();
        builder
            .min_protocol_version(Some(Protocol::Tlsv12))
            .danger_accept_invalid_hostnames(self.accept_invalid_hostnames)
            .danger_accept_invalid_certs(self.accept_invalid_certs);
        for certificate in self.root_certificates {
            builder.add_root_certificate(certificate.0);
        }

        Ok(TlsParameters {
            connector: builder.build().map_err(error::tls)?,
            domain: self.domain,
        })
    }
}

/// A certificate for [`TlsParametersBuilder::add_root_certificate`]
#[cfg(feature = "native-tls")]
#[cfg_attr(docsrs, doc(cfg(feature = "native-tls")))]
#[derive(Clone)]
pub struct Certificate(native_tls::Certificate);

#[cfg(feature = "native-tls")]
impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        native_tls::Certificate::from_der(der)
            .map(Self)
            .map_err(error::tls)
    }

    pub fn from_pem(pem: &[u8]) -> Result<Self, Error> {
        native_tls::Certificate::from_pem(pem)
            .map(Self)
            .map_err(error::tls)
    }
}

#[cfg(feature = "native-tls")]
impl Debug for Certificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Certificate(..)")
    }
}
