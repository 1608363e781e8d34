use super::addr_spec;

/// Sender, recipients and subject of a message
///
/// The same addresses are written to the `From`, `To`, `Cc` and `Bcc` headers
/// and used for the SMTP envelope. An entry can be a bare address or have the
/// `Name <local@domain>` form; only the part between the angle brackets is
/// sent in `MAIL FROM` and `RCPT TO`.
///
/// Nothing is validated here: an envelope without sender or recipients is
/// accepted and left for the server to reject.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    from: String,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: String,
}

impl Envelope {
    /// Creates an envelope without recipients
    ///
    /// # Examples
    ///
    /// ```
    /// use missive::Envelope;
    ///
    /// let envelope = Envelope::new("a@x.com", "Test")
    ///     .with_to(["b@x.com", "c@x.com"])
    ///     .with_bcc(["audit@x.com"]);
    ///
    /// let recipients: Vec<&str> = envelope.recipients().collect();
    /// assert_eq!(recipients, ["b@x.com", "c@x.com", "audit@x.com"]);
    /// ```
    pub fn new<F: Into<String>, S: Into<String>>(from: F, subject: S) -> Envelope {
        Envelope {
            from: from.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Adds `To` recipients
    pub fn with_to<I, A>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Adds `Cc` recipients
    pub fn with_cc<I, A>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.cc.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Adds `Bcc` recipients
    pub fn with_bcc<I, A>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.bcc.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Gets the sender
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Gets the `To` recipients
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// Gets the `Cc` recipients
    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    /// Gets the `Bcc` recipients
    pub fn bcc(&self) -> &[String] {
        &self.bcc
    }

    /// Gets the subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Addresses to issue `RCPT TO` for: `To`, then `Cc`, then `Bcc`
    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(|address| addr_spec(address))
    }

    /// Reverse path of the SMTP envelope
    pub fn sender(&self) -> &str {
        addr_spec(&self.from)
    }

    #[cfg(feature = "smtp-transport")]
    /// Check if any of the envelope addresses contain non-ascii chars
    pub(crate) fn has_non_ascii_addresses(&self) -> bool {
        !self.sender().is_ascii() || self.recipients().any(|address| !address.is_ascii())
    }
}
