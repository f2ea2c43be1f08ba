//! Constants used throughout the Odonto core crate.
//!
//! Path and filename constants live here so the store, the binaries and the tests agree on the
//! on-disk layout.

/// Directory name for chart storage under the data directory.
pub const CHARTS_DIR_NAME: &str = "charts";

/// Default data directory when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "odonto_data";

/// Default care location used in commit trailers.
pub const DEFAULT_CARE_LOCATION: &str = "Odonto Dental Clinic";

/// Filename of the chart file inside each chart directory.
pub const CHART_FILENAME: &str = "odontogram.yaml";

/// Branch every chart repository commits to.
pub const MAIN_REF: &str = "refs/heads/main";
