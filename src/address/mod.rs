//! Email addresses and envelopes

mod envelope;

pub use self::envelope::Envelope;

/// Returns the `local@domain` part of an address
///
/// Entries of the form `Name <local@domain>` yield what is between the
/// angle brackets, anything else is returned trimmed.
pub(crate) fn addr_spec(address: &str) -> &str {
    let address = address.trim();
    match (address.rfind('<'), address.ends_with('>')) {
        (Some(start), true) => address[start + 1..address.len() - 1].trim(),
        _ => address,
    }
}
