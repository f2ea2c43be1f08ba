//! Validated primitive types shared across the Odonto crates.
//!
//! Types in here are constructed once at a boundary (wire parsing, REST path, CLI argument) and
//! can then be passed around without re-validation.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("text cannot be empty")]
    Empty,
}

/// Single-purpose text field (author name, role, care location) that is never blank.
///
/// Surrounding whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        Self::try_from(input.as_ref().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(mut value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.len() != value.len() {
            value = trimmed.to_owned();
        }
        Ok(Self(value))
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a value is not a tooth in the permanent FDI set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToothNumberError {
    #[error("{0} is not a permanent FDI tooth number (quadrant 1-4, position 1-8)")]
    OutOfRange(i64),
    #[error("'{0}' is not a tooth number")]
    NotANumber(String),
}

/// Dental arch a tooth belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Upper,
    Lower,
}

/// A permanent-dentition tooth in two-digit FDI notation.
///
/// The first digit is the quadrant (1 upper right, 2 upper left, 3 lower left, 4 lower right),
/// the second the position counted from the midline (1 central incisor to 8 third molar).
/// Exactly 32 values are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToothNumber(u8);

/// Upper arch as seen facing the patient: quadrant 1 from the back, then quadrant 2.
const UPPER_ARCH: [u8; 16] = [18, 17, 16, 15, 14, 13, 12, 11, 21, 22, 23, 24, 25, 26, 27, 28];

/// Lower arch as seen facing the patient: quadrant 4 from the back, then quadrant 3.
const LOWER_ARCH: [u8; 16] = [48, 47, 46, 45, 44, 43, 42, 41, 31, 32, 33, 34, 35, 36, 37, 38];

impl ToothNumber {
    /// Validates an FDI tooth number.
    pub fn new(value: i64) -> Result<Self, ToothNumberError> {
        let quadrant = value / 10;
        let position = value % 10;
        if (10..=99).contains(&value) && (1..=4).contains(&quadrant) && (1..=8).contains(&position)
        {
            return Ok(Self(value as u8));
        }
        Err(ToothNumberError::OutOfRange(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn quadrant(self) -> u8 {
        self.0 / 10
    }

    /// Position from the midline, 1 (central incisor) to 8 (third molar).
    pub fn position(self) -> u8 {
        self.0 % 10
    }

    pub fn arch(self) -> Arch {
        match self.quadrant() {
            1 | 2 => Arch::Upper,
            _ => Arch::Lower,
        }
    }

    /// Teeth of one arch in display order (patient's right on the left).
    pub fn arch_teeth(arch: Arch) -> impl Iterator<Item = ToothNumber> {
        let teeth = match arch {
            Arch::Upper => UPPER_ARCH,
            Arch::Lower => LOWER_ARCH,
        };
        teeth.into_iter().map(ToothNumber)
    }

    /// All 32 permanent teeth, upper arch first.
    pub fn permanent_set() -> impl Iterator<Item = ToothNumber> {
        Self::arch_teeth(Arch::Upper).chain(Self::arch_teeth(Arch::Lower))
    }
}

impl TryFrom<i64> for ToothNumber {
    type Error = ToothNumberError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ToothNumber> for u8 {
    fn from(tooth: ToothNumber) -> Self {
        tooth.0
    }
}

impl FromStr for ToothNumber {
    type Err = ToothNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ToothNumberError::NotANumber(trimmed.to_owned()))?;
        Self::new(value)
    }
}

impl fmt::Display for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for ToothNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ToothNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        ToothNumber::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Dr Jones  ").unwrap();
        assert_eq!(text.as_str(), "Dr Jones");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
        assert!(matches!(
            NonEmptyText::try_from(String::new()),
            Err(TextError::Empty)
        ));
    }

    #[test]
    fn non_empty_text_keeps_already_trimmed_input() {
        let text = NonEmptyText::try_from("Hygienist".to_string()).unwrap();
        assert_eq!(text.to_string(), "Hygienist");
    }

    #[test]
    fn permanent_set_has_32_distinct_teeth() {
        let teeth: Vec<ToothNumber> = ToothNumber::permanent_set().collect();
        assert_eq!(teeth.len(), 32);
        let unique: HashSet<u8> = teeth.iter().map(|t| t.get()).collect();
        assert_eq!(unique.len(), 32);
        assert_eq!(ToothNumber::arch_teeth(Arch::Upper).count(), 16);
        assert_eq!(ToothNumber::arch_teeth(Arch::Lower).count(), 16);
    }

    #[test]
    fn accepts_every_quadrant_and_position() {
        for quadrant in 1..=4 {
            for position in 1..=8 {
                let value = quadrant * 10 + position;
                let tooth = ToothNumber::new(value).unwrap();
                assert_eq!(i64::from(tooth.quadrant()), quadrant);
                assert_eq!(i64::from(tooth.position()), position);
            }
        }
    }

    #[test]
    fn rejects_values_outside_the_permanent_set() {
        for value in [0, 9, 10, 19, 20, 49, 51, 85, 100, -16] {
            assert_eq!(
                ToothNumber::new(value),
                Err(ToothNumberError::OutOfRange(value))
            );
        }
    }

    #[test]
    fn arch_follows_quadrant() {
        assert_eq!(ToothNumber::new(16).unwrap().arch(), Arch::Upper);
        assert_eq!(ToothNumber::new(27).unwrap().arch(), Arch::Upper);
        assert_eq!(ToothNumber::new(36).unwrap().arch(), Arch::Lower);
        assert_eq!(ToothNumber::new(48).unwrap().arch(), Arch::Lower);
    }

    #[test]
    fn parses_from_string() {
        assert_eq!(" 21 ".parse::<ToothNumber>().unwrap().get(), 21);
        assert_eq!(
            "59".parse::<ToothNumber>(),
            Err(ToothNumberError::OutOfRange(59))
        );
    }

    #[test]
    fn non_numeric_input_is_reported_as_typed() {
        let err = "abc".parse::<ToothNumber>().expect_err("should reject abc");
        assert_eq!(err, ToothNumberError::NotANumber("abc".into()));
        let message = err.to_string();
        assert!(message.contains("'abc'"), "{message}");
        assert!(!message.contains("-1"), "{message}");
    }

    #[test]
    fn deserialize_rejects_invalid_tooth() {
        let ok: ToothNumber = serde_json::from_str("46").unwrap();
        assert_eq!(ok.get(), 46);
        let err = serde_json::from_str::<ToothNumber>("99").expect_err("should reject 99");
        assert!(err.to_string().contains("not a permanent FDI tooth number"));
    }
}
