use super::{Header, HeaderName, HeaderValue};

/// `MIME-Version` ([RFC 2045](https://tools.ietf.org/html/rfc2045#section-4))
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeVersion {
    major: u8,
    minor: u8,
}

/// The only version ever defined, written in every message
pub const MIME_VERSION_1_0: MimeVersion = MimeVersion { major: 1, minor: 0 };

impl Header for MimeVersion {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("MIME-Version")
    }

    fn display(&self) -> HeaderValue {
        let version = format!("{}.{}", self.major, self.minor);
        HeaderValue::dangerous_new_pre_encoded(Self::name(), version.clone(), version)
    }
}
