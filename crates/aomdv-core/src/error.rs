//! Core error types.

/// Dotted-quad text that does not describe an IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address: {0}")]
pub struct AddressParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_error_display() {
        let err = AddressParseError("10.0.0".to_string());
        assert_eq!(err.to_string(), "invalid address: 10.0.0");
    }
}
