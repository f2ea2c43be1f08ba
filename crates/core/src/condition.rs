//! Clinical condition catalog.
//!
//! The set of conditions a tooth can be charted with is closed and known at build time. The
//! order of [`ConditionCatalog::list`] is the legend order shown to clinicians.

use crate::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A charted clinical condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Healthy,
    Cavity,
    Filling,
    Crown,
    Extraction,
    Implant,
    RootCanal,
    Bridge,
    Veneer,
}

impl Condition {
    /// Stable identifier used on the wire and in chart files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Cavity => "cavity",
            Self::Filling => "filling",
            Self::Crown => "crown",
            Self::Extraction => "extraction",
            Self::Implant => "implant",
            Self::RootCanal => "root_canal",
            Self::Bridge => "bridge",
            Self::Veneer => "veneer",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Cavity => "Cavity",
            Self::Filling => "Filling",
            Self::Crown => "Crown",
            Self::Extraction => "Extraction",
            Self::Implant => "Implant",
            Self::RootCanal => "Root canal",
            Self::Bridge => "Bridge",
            Self::Veneer => "Veneer",
        }
    }

    /// Legend colour for chart rendering, as `#rrggbb`.
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Healthy => "#ffffff",
            Self::Cavity => "#e53935",
            Self::Filling => "#1e88e5",
            Self::Crown => "#fdd835",
            Self::Extraction => "#424242",
            Self::Implant => "#8e24aa",
            Self::RootCanal => "#fb8c00",
            Self::Bridge => "#00897b",
            Self::Veneer => "#f06292",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionCatalog::parse(s)
    }
}

/// Static catalog over [`Condition`]. There are no mutation operations.
pub struct ConditionCatalog;

const CONDITIONS: [Condition; 9] = [
    Condition::Healthy,
    Condition::Cavity,
    Condition::Filling,
    Condition::Crown,
    Condition::Extraction,
    Condition::Implant,
    Condition::RootCanal,
    Condition::Bridge,
    Condition::Veneer,
];

impl ConditionCatalog {
    /// All conditions in legend order, `healthy` first.
    pub fn list() -> &'static [Condition] {
        &CONDITIONS
    }

    /// Display label for a condition identifier.
    ///
    /// # Errors
    ///
    /// [`ChartError::UnknownCondition`] if `condition_id` is not in the catalog.
    pub fn describe(condition_id: &str) -> ChartResult<&'static str> {
        Self::parse(condition_id).map(Condition::label)
    }

    /// Resolve an identifier to its condition. Matching is exact (`root_canal`, not
    /// `Root canal`).
    pub fn parse(condition_id: &str) -> ChartResult<Condition> {
        CONDITIONS
            .iter()
            .copied()
            .find(|c| c.as_str() == condition_id)
            .ok_or_else(|| ChartError::UnknownCondition(condition_id.to_string()))
    }
}
