//! Error types for the counter pipeline.

use thiserror::Error;

/// Result type alias for counter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for counter operations.
///
/// Only pure data-transform failures and structural programming errors
/// surface here. Malformed numeric input never does: adapters coerce it to
/// zero at the boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A unit of the input is not part of the source alphabet.
    #[error("number \"{input}\" contains non-alphabetic digits ({alphabet})")]
    NotInAlphabet { input: String, alphabet: String },
    /// Target alphabet too small to express a positional numeral.
    #[error("alphabet of {len} unit(s) cannot encode a numeral, need at least 2")]
    InvalidAlphabet { len: usize },
    /// The number adapter cannot hold an encoded numeral exactly.
    #[error("numeral {digits} exceeds the number adapter's precision, register an arbitrary-precision adapter")]
    PrecisionLoss { digits: String },
    /// A datetime endpoint could not be parsed.
    #[error("value {0} is not a valid date")]
    InvalidDate(String),
    /// A rendered element lacks its part/digit identifiers.
    #[error("the {attribute} attribute is required")]
    MissingDataAttribute { attribute: &'static str },
    /// Unknown duration unit keyword.
    #[error("unknown duration part: {0}")]
    UnknownDurationPart(String),
    /// JSON option payload could not be decoded.
    #[error("invalid option payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotInAlphabet {
            input: "xyz".to_string(),
            alphabet: "abc".to_string(),
        };
        assert!(err.to_string().contains("non-alphabetic digits"));
        assert!(err.to_string().contains("xyz"));

        let err = Error::InvalidAlphabet { len: 1 };
        assert!(err.to_string().contains("1 unit"));

        let err = Error::PrecisionLoss {
            digits: "12345678901234567890".to_string(),
        };
        assert!(err.to_string().contains("precision"));

        let err = Error::MissingDataAttribute {
            attribute: "data-part-id",
        };
        assert_eq!(err.to_string(), "the data-part-id attribute is required");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
