use std::time::SystemTime;

use httpdate::HttpDate;

use super::{Header, HeaderName, HeaderValue};

/// `Date` of the message, in UTC
///
/// The zone is written as `+0000`, `GMT` being obsolete in
/// [RFC 5322](https://tools.ietf.org/html/rfc5322#section-4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(HttpDate);

impl Date {
    pub fn new(time: SystemTime) -> Self {
        Date(HttpDate::from(time))
    }

    pub fn now() -> Self {
        Date::new(SystemTime::now())
    }
}

impl From<SystemTime> for Date {
    fn from(time: SystemTime) -> Self {
        Date::new(time)
    }
}

impl Header for Date {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Date")
    }

    fn display(&self) -> HeaderValue {
        let http = self.0.to_string();
        let value = match http.strip_suffix("GMT") {
            Some(utc) => format!("{utc}+0000"),
            None => http,
        };
        HeaderValue::dangerous_new_pre_encoded(Self::name(), value.clone(), value)
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use pretty_assertions::assert_eq;

    use super::Date;
    use crate::message::header::Headers;

    fn written(secs: u64) -> String {
        let mut headers = Headers::new();
        headers.set(Date::from(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)));
        headers.to_string()
    }

    #[test]
    fn utc_offset() {
        assert_eq!(written(0), "Date: Thu, 01 Jan 1970 00:00:00 +0000\r\n");
        assert_eq!(
            written(1_600_000_000),
            "Date: Sun, 13 Sep 2020 12:26:40 +0000\r\n"
        );
    }
}
