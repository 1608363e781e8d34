use super::{encode_words, Header, HeaderName, HeaderValue};

/// `Content-Disposition` of an attachment
///
/// Defined in [RFC2183](https://tools.ietf.org/html/rfc2183)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition(HeaderValue);

impl ContentDisposition {
    /// An attachment which is separate from the body of the message, and can be downloaded separately
    ///
    /// A `file_name` that isn't a MIME token is written as RFC 2047 encoded
    /// words inside a quoted string. RFC 2047 section 5 doesn't allow encoded
    /// words in a quoted string, but this is how most mail clients write and
    /// read non-ascii file names, so it is kept for compatibility.
    pub fn attachment(file_name: &str) -> Self {
        let raw_value = format!("attachment; filename=\"{file_name}\"");

        let mut encoded_value = "attachment; filename=".to_owned();
        if is_token(file_name) {
            encoded_value.push_str(file_name);
        } else {
            encoded_value.push('"');
            let line_len = "Content-Disposition: ".len() + encoded_value.len();
            // writing to a `String` can't fail
            let _ = encode_words(line_len, file_name, &mut encoded_value);
            encoded_value.push('"');
        }

        Self(HeaderValue::dangerous_new_pre_encoded(
            Self::name(),
            raw_value,
            encoded_value,
        ))
    }
}

impl Header for ContentDisposition {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Disposition")
    }

    fn display(&self) -> HeaderValue {
        self.0.clone()
    }
}

// https://tools.ietf.org/html/rfc2045#section-5.1
fn is_token(s: &str) -> bool {
    const TSPECIALS: &[u8] = b"()<>@,;:\\\"/[]?=";

    !s.is_empty()
        && s
            .bytes()
            .all(|c| c.is_ascii_graphic() && !TSPECIALS.contains(&c))
}
