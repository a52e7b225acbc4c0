//! Card number normalization and brand detection.
//!
//! Brand detection is a pure prefix/check-digit rule and never consults the
//! card registry. Admission (registered and not expired) is a separate,
//! persistence-backed check exposed through [`crate::ports::CardRegistry`].

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// The only character stripped from user-supplied card numbers.
pub const SEPARATOR: char = '-';

/// Zero-based position of the brand check character.
pub const CHECK_OFFSET: usize = 8;

/// Shortest normalized number that carries a check character.
pub const MIN_LENGTH: usize = CHECK_OFFSET + 1;

/// Card networks recognised by the brand rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardBrand::Visa => write!(f, "VISA"),
            CardBrand::Mastercard => write!(f, "MASTERCARD"),
            CardBrand::Elo => write!(f, "ELO"),
        }
    }
}

/// (prefix, check character, brand)
const BRAND_RULES: [(&str, char, CardBrand); 3] = [
    ("1111", '1', CardBrand::Visa),
    ("2222", '2', CardBrand::Mastercard),
    ("3333", '3', CardBrand::Elo),
];

/// A card number with separators removed.
///
/// No other formatting is applied: whitespace and non-digit characters are
/// kept as-is, so lookups match exactly what was registered.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CardNumber(String);

impl CardNumber {
    /// Strips every [`SEPARATOR`] from `raw`.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.replace(SEPARATOR, ""))
    }

    /// Returns the normalized number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters after normalization.
    fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Classifies the number into a brand.
    pub fn brand(&self) -> Result<CardBrand, DomainError> {
        let got = self.len();
        if got < MIN_LENGTH {
            return Err(DomainError::InvalidCardFormat {
                min: MIN_LENGTH,
                got,
            });
        }

        let check = self.0.chars().nth(CHECK_OFFSET);
        BRAND_RULES
            .iter()
            .find(|(prefix, digit, _)| self.0.starts_with(prefix) && check == Some(*digit))
            .map(|(_, _, brand)| *brand)
            .ok_or(DomainError::BrandNotFound)
    }

    /// Last four characters, everything else replaced by `*`.
    pub fn masked(&self) -> String {
        let len = self.len();
        let visible = len.min(4);
        let tail: String = self.0.chars().skip(len - visible).collect();
        format!("{}{}", "*".repeat(len - visible), tail)
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

/// Normalizes `raw` and classifies it into a brand.
pub fn detect_brand(raw: &str) -> Result<CardBrand, DomainError> {
    CardNumber::normalize(raw).brand()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_each_brand() {
        assert_eq!(detect_brand("111122221333").unwrap(), CardBrand::Visa);
        assert_eq!(detect_brand("222233332444").unwrap(), CardBrand::Mastercard);
        assert_eq!(detect_brand("333344443555").unwrap(), CardBrand::Elo);
    }

    #[test]
    fn test_separators_are_stripped_before_indexing() {
        // Check character sits at index 8 of the normalized number, not the raw one.
        assert_eq!(detect_brand("1111-2222-1333").unwrap(), CardBrand::Visa);
        assert_eq!(detect_brand("3333-4444-3").unwrap(), CardBrand::Elo);
    }

    #[test]
    fn test_prefix_without_check_digit_is_not_found() {
        assert!(matches!(
            detect_brand("111122223333"),
            Err(DomainError::BrandNotFound)
        ));
        assert!(matches!(
            detect_brand("222211113222"),
            Err(DomainError::BrandNotFound)
        ));
    }

    #[test]
    fn test_check_digit_of_other_brand_is_not_found() {
        assert!(matches!(
            detect_brand("111100002000"),
            Err(DomainError::BrandNotFound)
        ));
        assert!(matches!(
            detect_brand("999999999"),
            Err(DomainError::BrandNotFound)
        ));
    }

    #[test]
    fn test_short_number_is_invalid_format() {
        assert!(matches!(
            detect_brand("11111111"),
            Err(DomainError::InvalidCardFormat { min: 9, got: 8 })
        ));
        assert!(matches!(
            detect_brand("1111-1111"),
            Err(DomainError::InvalidCardFormat { got: 8, .. })
        ));
        assert!(matches!(
            detect_brand(""),
            Err(DomainError::InvalidCardFormat { got: 0, .. })
        ));
    }

    #[test]
    fn test_only_dash_is_a_separator() {
        let card = CardNumber::normalize("1111 2222 1333");
        assert_eq!(card.as_str(), "1111 2222 1333");
        assert!(matches!(card.brand(), Err(DomainError::BrandNotFound)));
    }

    #[test]
    fn test_masking() {
        let card = CardNumber::normalize("1111-2222-3333");
        assert_eq!(card.masked(), "********3333");
        assert_eq!(format!("{}", card), "********3333");
        assert_eq!(CardNumber::normalize("12").masked(), "12");
    }

    #[test]
    fn test_brand_wire_names() {
        assert_eq!(
            serde_json::to_string(&CardBrand::Mastercard).unwrap(),
            "\"MASTERCARD\""
        );
        assert_eq!(CardBrand::Elo.to_string(), "ELO");
    }
}
