use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use super::{Header, HeaderName, HeaderValue};

/// `Content-Transfer-Encoding` of the body
///
/// Every part written by the [`Message`](crate::Message) builder is base64
/// encoded, the builder sets this header itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ContentTransferEncoding {
    #[default]
    Base64,
}

impl Display for ContentTransferEncoding {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.write_str(match *self {
            Self::Base64 => "base64",
        })
    }
}

impl Header for ContentTransferEncoding {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Transfer-Encoding")
    }

    fn display(&self) -> HeaderValue {
        let val = self.to_string();
        HeaderValue::dangerous_new_pre_encoded(Self::name(), val.clone(), val)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::ContentTransferEncoding;
    use crate::message::header::Headers;

    #[test]
    fn format_content_transfer_encoding() {
        let mut headers = Headers::new();

        headers.set(ContentTransferEncoding::Base64);

        assert_eq!(
            format!("{headers}"),
            "Content-Transfer-Encoding: base64\r\n"
        );
    }
}
