use super::{Header, HeaderName, HeaderValue};

macro_rules! text_header {
    ($(#[$attr:meta])* Header($type: ident, $name: expr )) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        $(#[$attr])*
        pub struct $type(String);

        impl Header for $type {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($name)
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::new(Self::name(), self.0.clone())
            }
        }

        impl std::convert::From<String> for $type {
            #[inline]
            fn from(text: String) -> Self {
                Self(text)
            }
        }

        impl std::convert::From<&str> for $type {
            #[inline]
            fn from(text: &str) -> Self {
                Self(text.to_owned())
            }
        }

        impl AsRef<str> for $type {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

macro_rules! address_list_header {
    ($(#[$attr:meta])* Header($type: ident, $name: expr )) => {
        text_header!($(#[$attr])* Header($type, $name));

        impl $type {
            /// Joins the addresses with `", "`
            pub fn from_addresses<A: AsRef<str>>(addresses: &[A]) -> Self {
                let list = addresses
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
                    .join(", ");
                Self(list)
            }
        }
    };
}

text_header!(
    /// `Subject` of the message, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.5)
    Header(Subject, "Subject")
);
text_header!(
    /// `From` header, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.2)
    Header(From, "From")
);
address_list_header!(
    /// `To` header, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.3)
    Header(To, "To")
);
address_list_header!(
    /// `Cc` header, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.3)
    Header(Cc, "Cc")
);
address_list_header!(
    /// `Bcc` header, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.3)
    Header(Bcc, "Bcc")
);
