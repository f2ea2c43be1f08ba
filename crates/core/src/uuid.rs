//! Chart identifiers and sharded-path derivation.
//!
//! Stored charts are keyed by a canonical UUID: **32 lowercase hexadecimal characters**, no
//! hyphens (the `Uuid::simple()` form). Externally supplied identifiers must already be
//! canonical; hyphenated or uppercase input is rejected rather than normalised, so that one chart
//! can only ever map to one directory.
//!
//! For a canonical id `u` the chart lives at `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`, which keeps
//! directory fan-out small.

use crate::error::{ChartError, ChartResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use ::uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChartId(Uuid);

impl ChartId {
    /// Allocates a fresh random identifier.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// [`ChartError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> ChartResult<Self> {
        if !Self::is_canonical(input) {
            return Err(ChartError::InvalidInput(format!(
                "chart id must be 32 lowercase hex characters without hyphens, got: '{input}'"
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| ChartError::InvalidInput(e.to_string()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// `parent_dir/<s1>/<s2>/<id>/`.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ChartId {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_canonical() {
        let id = ChartId::new().to_string();
        assert_eq!(id.len(), 32);
        assert!(ChartId::is_canonical(&id));
    }

    #[test]
    fn parse_accepts_canonical_form() {
        let canonical = "550e8400e29b41d4a716446655440000";
        assert_eq!(ChartId::parse(canonical).unwrap().to_string(), canonical);
    }

    #[test]
    fn parse_rejects_hyphenated() {
        let err = ChartId::parse("550e8400-e29b-41d4-a716-446655440000").expect_err("hyphens");
        assert!(matches!(err, ChartError::InvalidInput(msg) if msg.contains("32 lowercase hex")));
    }

    #[test]
    fn parse_rejects_non_canonical_inputs() {
        for input in [
            "550E8400E29B41D4A716446655440000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a7164466554400000",
            "550e8400e29b41d4a716446655440zzz",
            "",
        ] {
            assert!(ChartId::parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn sharded_dir_structure() {
        let id: ChartId = "550e8400e29b41d4a716446655440000".parse().unwrap();
        assert_eq!(
            id.sharded_dir(Path::new("/odonto_data/charts")),
            PathBuf::from("/odonto_data/charts/55/0e/550e8400e29b41d4a716446655440000")
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let original = ChartId::new();
        assert_eq!(ChartId::parse(&original.to_string()).unwrap(), original);
    }
}
