//! Replies of the SMTP server
//!
//! A reply is one or more lines sharing the same three digit code, every line
//! but the last one having a `-` after the code
//! ([RFC 5321, section 4.2](https://tools.ietf.org/html/rfc5321#section-4.2)).

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use nom::{
    bytes::streaming::{tag, take_until},
    character::streaming::{one_of, satisfy},
    combinator::{map_opt, recognize},
    sequence::terminated,
    IResult, Parser,
};

use crate::transport::smtp::{error, Error};

/// Meaning of the first digit of a reply code
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// `2yz`, the command was accepted
    Completed,
    /// `3yz`, more data is expected
    Intermediate,
    /// `4yz`, the command may succeed if retried later
    Transient,
    /// `5yz`, the command won't succeed as is
    Permanent,
}

/// A three digit reply code, from `200` to `559`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code(u16);

impl Code {
    /// Checks that `code` is a reply code a server can send
    pub fn new(code: u16) -> Option<Self> {
        let (class, subject) = (code / 100, code / 10 % 10);
        ((2..=5).contains(&class) && subject <= 5).then_some(Self(code))
    }

    pub fn severity(self) -> Severity {
        match self.0 / 100 {
            2 => Severity::Completed,
            3 => Severity::Intermediate,
            4 => Severity::Transient,
            _ => Severity::Permanent,
        }
    }

    /// `2yz` and `3yz` codes
    pub fn is_positive(self) -> bool {
        matches!(
            self.severity(),
            Severity::Completed | Severity::Intermediate
        )
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Code> for u16 {
    fn from(code: Code) -> Self {
        code.0
    }
}

/// A complete reply: its code and the text of each line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Response {
    code: Code,
    lines: Vec<String>,
}

impl Response {
    pub fn new(code: Code, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn is_positive(&self) -> bool {
        self.code.is_positive()
    }

    pub fn has_code(&self, code: u16) -> bool {
        u16::from(self.code) == code
    }

    /// Text of every line, without the code
    pub fn message(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// First word of the first line: the server name of a greeting or of an
    /// `EHLO` reply, the challenge of a `334`
    pub fn first_word(&self) -> Option<&str> {
        self.lines.first()?.split_whitespace().next()
    }
}

impl FromStr for Response {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match parse_response(s) {
            Ok(("", response)) => Ok(response),
            Ok((rest, _)) => Err(error::response(format!(
                "unexpected data after the reply: {rest:?}"
            ))),
            Err(err) => Err(error::response(err.to_string())),
        }
    }
}

fn reply_code(i: &str) -> IResult<&str, Code> {
    map_opt(
        recognize((
            one_of("2345"),
            one_of("012345"),
            satisfy(|c| c.is_ascii_digit()),
        )),
        |digits: &str| digits.parse().ok().and_then(Code::new),
    )
    .parse(i)
}

/// `<code><' ' or '-'><text>CRLF`
fn reply_line(i: &str) -> IResult<&str, (Code, char, &str)> {
    terminated((reply_code, one_of(" -"), take_until("\r\n")), tag("\r\n")).parse(i)
}

/// Parses one reply from the start of `i`
///
/// Returns `Incomplete` until the last line of the reply was read.
pub(crate) fn parse_response(mut i: &str) -> IResult<&str, Response> {
    let mut code = None;
    let mut lines = Vec::new();

    loop {
        let (rest, (line_code, separator, text)) = reply_line(i)?;
        if *code.get_or_insert(line_code) != line_code {
            return Err(nom::Err::Failure(nom::error::Error::new(
                i,
                nom::error::ErrorKind::Verify,
            )));
        }
        lines.push(text.to_owned());
        i = rest;

        if separator == ' ' {
            return Ok((
                i,
                Response {
                    code: line_code,
                    lines,
                },
            ));
        }
    }
}
