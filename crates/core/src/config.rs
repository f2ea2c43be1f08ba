//! Core runtime configuration.
//!
//! [`CoreConfig`] is resolved once at process startup and passed into services as
//! `Arc<CoreConfig>`. Services never read environment variables while handling a request.
//!
//! [`EditorConfig`] is per editor instance and only controls interaction.

use crate::constants::CHARTS_DIR_NAME;
use crate::{ChartError, ChartResult};
use odonto_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    care_location: NonEmptyText,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The care location ends up in every commit trailer, so it must be a single non-empty line.
    pub fn new(data_dir: PathBuf, care_location: impl AsRef<str>) -> ChartResult<Self> {
        let care_location =
            NonEmptyText::new(care_location).map_err(|_| ChartError::MissingCareLocation)?;
        if care_location.as_str().contains(['\n', '\r']) {
            return Err(ChartError::InvalidCareLocation);
        }

        Ok(Self {
            data_dir,
            care_location,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.data_dir.join(CHARTS_DIR_NAME)
    }

    pub fn care_location(&self) -> &str {
        self.care_location.as_str()
    }
}

/// Interaction settings for a [`crate::ChartEditor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorConfig {
    /// Historical/immutable view: selection and every mutation path are disabled.
    pub read_only: bool,
}

impl EditorConfig {
    pub fn editable() -> Self {
        Self { read_only: false }
    }

    pub fn read_only() -> Self {
        Self { read_only: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charts_dir_is_under_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/odonto"), "Riverside Dental").unwrap();
        assert_eq!(cfg.charts_dir(), PathBuf::from("/srv/odonto/charts"));
        assert_eq!(cfg.care_location(), "Riverside Dental");
    }

    #[test]
    fn rejects_empty_care_location() {
        let err = CoreConfig::new(PathBuf::from("/tmp"), "  ").expect_err("should reject");
        assert!(matches!(err, ChartError::MissingCareLocation));
    }

    #[test]
    fn rejects_multiline_care_location() {
        let err = CoreConfig::new(PathBuf::from("/tmp"), "Riverside\nDental")
            .expect_err("should reject");
        assert!(matches!(err, ChartError::InvalidCareLocation));
    }

    #[test]
    fn editor_config_defaults_to_editable() {
        assert_eq!(EditorConfig::default(), EditorConfig::editable());
        assert!(EditorConfig::read_only().read_only);
    }
}
