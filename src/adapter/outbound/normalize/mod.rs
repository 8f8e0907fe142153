//! Payload normalization: unstable source payloads to canonical types.
//!
//! Two decoders share the same contract: given whatever a source returned,
//! produce candidates or a price, or nothing. Unexpected shapes are a normal
//! outcome and are never reported as errors.
//!
//! - [`payload`] decodes structured JSON bodies.
//! - [`markup`] applies ordered regex heuristics to HTML pages.

pub mod markup;
pub mod payload;

pub use markup::{extract_listing, extract_price};
pub use payload::{normalize_listing, normalize_price, ListingShape, PriceField};

/// Parse a coin amount from text, ignoring separators.
///
/// `"12,500"`, `"12.500"` and `"12 500"` all yield `12500`. Only amounts
/// greater than zero are plausible.
#[must_use]
pub fn parse_coins(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_ignored() {
        assert_eq!(parse_coins("12,500"), Some(12_500));
        assert_eq!(parse_coins("12.500"), Some(12_500));
        assert_eq!(parse_coins("12 500 "), Some(12_500));
        assert_eq!(parse_coins("1,250,000."), Some(1_250_000));
    }

    #[test]
    fn implausible_amounts_are_rejected() {
        assert_eq!(parse_coins(""), None);
        assert_eq!(parse_coins("N/A"), None);
        assert_eq!(parse_coins("0"), None);
        assert_eq!(parse_coins("0,000"), None);
        assert_eq!(parse_coins("99999999999999999999999"), None);
    }
}
