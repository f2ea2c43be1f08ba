//! Odontogram wire models and translation helpers.
//!
//! The on-disk chart file (`odontogram.yaml`) holds the chart id and its records with snake_case
//! keys. The wire model is strict (`deny_unknown_fields`). Values are carried as raw integers and
//! strings here; validating tooth numbers and condition identifiers is the core's job.

use crate::{WireError, WireResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Public domain-level types
// ============================================================================

/// One tooth record as it crosses a boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToothRecordData {
    pub tooth_number: i64,
    pub condition: String,
    pub notes: Option<String>,
    pub surfaces: Option<Vec<String>>,
}

/// Contents of a chart file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartFileData {
    pub chart_id: Uuid,
    pub records: Vec<ToothRecordData>,
}

// ============================================================================
// Public operations
// ============================================================================

/// On-disk chart file operations.
pub struct ChartFile;

impl ChartFile {
    /// Parse a chart file from YAML text.
    ///
    /// Schema mismatches are reported with the path of the failing field, for example
    /// `records[0].tooth_number`.
    pub fn parse(yaml_text: &str) -> WireResult<ChartFileData> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: ChartFileWire = serde_path_to_error::deserialize(deserializer)
            .map_err(|err| schema_mismatch("Chart file", err))?;

        let chart_id = Uuid::parse_str(&wire.chart_id).map_err(|_| {
            WireError::InvalidInput(format!("Invalid UUID in chart_id: {}", wire.chart_id))
        })?;

        Ok(ChartFileData {
            chart_id,
            records: wire.records.into_iter().map(Into::into).collect(),
        })
    }

    /// Render a chart file as YAML text. The chart id is written in simple (unhyphenated) form.
    pub fn render(data: &ChartFileData) -> WireResult<String> {
        let wire = ChartFileWire {
            chart_id: data.chart_id.simple().to_string(),
            records: data.records.iter().cloned().map(Into::into).collect(),
        };
        Ok(serde_yaml::to_string(&wire)?)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ChartFileWire {
    chart_id: String,
    #[serde(default)]
    records: Vec<FileRecordWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct FileRecordWire {
    tooth_number: i64,
    condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    surfaces: Option<Vec<String>>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn schema_mismatch<E: std::fmt::Display>(
    what: &str,
    err: serde_path_to_error::Error<E>,
) -> WireError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    WireError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}

impl From<FileRecordWire> for ToothRecordData {
    fn from(wire: FileRecordWire) -> Self {
        Self {
            tooth_number: wire.tooth_number,
            condition: wire.condition,
            notes: wire.notes,
            surfaces: wire.surfaces,
        }
    }
}

impl From<ToothRecordData> for FileRecordWire {
    fn from(data: ToothRecordData) -> Self {
        Self {
            tooth_number: data.tooth_number,
            condition: data.condition,
            notes: data.notes.filter(|n| !n.is_empty()),
            surfaces: data.surfaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"chart_id: 550e8400e29b41d4a716446655440000
records:
  - tooth_number: 16
    condition: cavity
    notes: sensitive to cold
    surfaces:
      - occlusal
      - mesial
  - tooth_number: 21
    condition: crown
"#;

    #[test]
    fn parses_sample_chart_file() {
        let data = ChartFile::parse(SAMPLE).expect("parse yaml");
        assert_eq!(
            data.chart_id.simple().to_string(),
            "550e8400e29b41d4a716446655440000"
        );
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.records[0].tooth_number, 16);
        assert_eq!(data.records[0].notes.as_deref(), Some("sensitive to cold"));
        assert_eq!(
            data.records[0].surfaces,
            Some(vec!["occlusal".to_string(), "mesial".to_string()])
        );
        assert_eq!(data.records[1].notes, None);
        assert_eq!(data.records[1].surfaces, None);
    }

    #[test]
    fn rendered_chart_file_parses_back_to_same_data() {
        let data = ChartFile::parse(SAMPLE).expect("parse yaml");
        let output = ChartFile::render(&data).expect("render");
        assert_eq!(ChartFile::parse(&output).expect("reparse"), data);
    }

    #[test]
    fn empty_chart_renders_and_parses() {
        let data = ChartFileData {
            chart_id: Uuid::new_v4(),
            records: vec![],
        };
        let output = ChartFile::render(&data).expect("render");
        let reparsed = ChartFile::parse(&output).expect("reparse");
        assert!(reparsed.records.is_empty());
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let input = r#"chart_id: 550e8400e29b41d4a716446655440000
records:
  - tooth_number: 16
    condition: cavity
    colour: red
"#;
        let err = ChartFile::parse(input).expect_err("should reject unknown key");
        match err {
            WireError::Translation(msg) => {
                assert!(msg.contains("records[0]"), "{msg}");
                assert!(msg.contains("colour"), "{msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_types() {
        let input = r#"chart_id: 550e8400e29b41d4a716446655440000
records:
  - tooth_number: sixteen
    condition: cavity
"#;
        let err = ChartFile::parse(input).expect_err("should reject wrong type");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("tooth_number"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_chart_id() {
        let input = "chart_id: not-a-uuid\nrecords: []\n";
        let err = ChartFile::parse(input).expect_err("should reject chart id");
        assert!(matches!(err, WireError::InvalidInput(msg) if msg.contains("chart_id")));
    }
}
