//! Per-encounter tooth chart.
//!
//! Storage is sparse: only teeth that have been touched hold a record, and the default
//! (`healthy`, no notes) is synthesized on lookup. Records are never removed.

use crate::condition::{Condition, ConditionCatalog};
use crate::{ChartError, ChartResult};
use chart_wire::ToothRecordData;
use odonto_types::ToothNumber;
use serde::{Deserialize, Serialize};

/// Clinical record for one tooth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToothRecord {
    pub tooth_number: ToothNumber,
    pub condition: Condition,
    #[serde(default)]
    pub notes: String,
    /// Reserved for per-surface tracking. Carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surfaces: Option<Vec<String>>,
}

impl ToothRecord {
    /// The record implied for a tooth with nothing charted.
    pub fn healthy(tooth_number: ToothNumber) -> Self {
        Self {
            tooth_number,
            condition: Condition::Healthy,
            notes: String::new(),
            surfaces: None,
        }
    }
}

impl TryFrom<ToothRecordData> for ToothRecord {
    type Error = ChartError;

    fn try_from(data: ToothRecordData) -> Result<Self, Self::Error> {
        let tooth_number = ToothNumber::new(data.tooth_number)?;
        let condition = ConditionCatalog::parse(&data.condition)
            .map_err(|_| ChartError::InvalidCondition(data.condition.clone()))?;
        Ok(Self {
            tooth_number,
            condition,
            notes: data.notes.unwrap_or_default(),
            surfaces: data.surfaces,
        })
    }
}

impl From<&ToothRecord> for ToothRecordData {
    fn from(record: &ToothRecord) -> Self {
        Self {
            tooth_number: i64::from(record.tooth_number.get()),
            condition: record.condition.as_str().to_string(),
            notes: Some(record.notes.clone()),
            surfaces: record.surfaces.clone(),
        }
    }
}

/// Authoritative in-memory record set for one chart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToothChart {
    records: Vec<ToothRecord>,
}

impl ToothChart {
    /// Build a chart from records supplied by a persistence collaborator.
    ///
    /// The list is taken as-is, duplicates included. Lookups and updates address the first
    /// record for a tooth.
    pub fn new(records: Vec<ToothRecord>) -> Self {
        Self { records }
    }

    /// Build a chart from boundary data, validating tooth numbers and conditions.
    pub fn from_wire(records: Vec<ToothRecordData>) -> ChartResult<Self> {
        let records = records
            .into_iter()
            .map(ToothRecord::try_from)
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[ToothRecord] {
        &self.records
    }

    pub fn to_wire(&self) -> Vec<ToothRecordData> {
        self.records.iter().map(ToothRecordData::from).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The stored record for `tooth`, or the healthy default if none exists.
    pub fn get_record(&self, tooth: ToothNumber) -> ToothRecord {
        self.position(tooth)
            .map(|i| self.records[i].clone())
            .unwrap_or_else(|| ToothRecord::healthy(tooth))
    }

    /// Set the condition of `tooth`, inserting a record if none exists.
    ///
    /// Only `condition` changes on an existing record. Any condition may follow any other.
    ///
    /// # Errors
    ///
    /// [`ChartError::InvalidCondition`] if `condition_id` is not in the catalog. The chart is
    /// left untouched.
    pub fn set_condition(
        &mut self,
        tooth: ToothNumber,
        condition_id: &str,
    ) -> ChartResult<&[ToothRecord]> {
        let condition = ConditionCatalog::parse(condition_id)
            .map_err(|_| ChartError::InvalidCondition(condition_id.to_string()))?;
        self.upsert(tooth).condition = condition;
        Ok(&self.records)
    }

    /// Set the notes of `tooth`, inserting a healthy record if none exists.
    ///
    /// Only `notes` changes on an existing record. Length policy belongs to the caller.
    pub fn set_notes(&mut self, tooth: ToothNumber, notes: impl Into<String>) -> &[ToothRecord] {
        self.upsert(tooth).notes = notes.into();
        &self.records
    }

    fn position(&self, tooth: ToothNumber) -> Option<usize> {
        self.records.iter().position(|r| r.tooth_number == tooth)
    }

    fn upsert(&mut self, tooth: ToothNumber) -> &mut ToothRecord {
        let index = match self.position(tooth) {
            Some(i) => i,
            None => {
                self.records.push(ToothRecord::healthy(tooth));
                self.records.len() - 1
            }
        };
        &mut self.records[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooth(n: i64) -> ToothNumber {
        ToothNumber::new(n).unwrap()
    }

    fn record(n: i64, condition: Condition, notes: &str) -> ToothRecord {
        ToothRecord {
            tooth_number: tooth(n),
            condition,
            notes: notes.to_string(),
            surfaces: None,
        }
    }

    #[test]
    fn get_record_synthesizes_default_for_every_tooth() {
        let chart = ToothChart::default();
        for t in ToothNumber::permanent_set() {
            let r = chart.get_record(t);
            assert_eq!(r.tooth_number, t);
            assert_eq!(r.condition, Condition::Healthy);
            assert_eq!(r.notes, "");
        }
        assert!(chart.is_empty());
    }

    #[test]
    fn set_condition_inserts_with_empty_notes() {
        let mut chart = ToothChart::default();
        let records = chart.set_condition(tooth(16), "cavity").unwrap();
        assert_eq!(records, &[record(16, Condition::Cavity, "")]);
    }

    #[test]
    fn set_condition_is_idempotent() {
        let mut once = ToothChart::default();
        once.set_condition(tooth(16), "crown").unwrap();

        let mut twice = ToothChart::default();
        twice.set_condition(tooth(16), "crown").unwrap();
        twice.set_condition(tooth(16), "crown").unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn set_condition_keeps_notes_and_surfaces() {
        let mut chart = ToothChart::new(vec![ToothRecord {
            tooth_number: tooth(36),
            condition: Condition::Filling,
            notes: "amalgam 2019".into(),
            surfaces: Some(vec!["occlusal".into(), "distal".into()]),
        }]);
        chart.set_condition(tooth(36), "crown").unwrap();

        let r = chart.get_record(tooth(36));
        assert_eq!(r.condition, Condition::Crown);
        assert_eq!(r.notes, "amalgam 2019");
        assert_eq!(r.surfaces, Some(vec!["occlusal".into(), "distal".into()]));
    }

    #[test]
    fn set_notes_keeps_condition() {
        let mut chart = ToothChart::new(vec![record(11, Condition::Veneer, "")]);
        chart.set_notes(tooth(11), "chipped edge");
        assert_eq!(chart.records(), &[record(11, Condition::Veneer, "chipped edge")]);
    }

    #[test]
    fn set_notes_inserts_healthy_record() {
        let mut chart = ToothChart::default();
        let records = chart.set_notes(tooth(48), "partially erupted");
        assert_eq!(records, &[record(48, Condition::Healthy, "partially erupted")]);
    }

    #[test]
    fn invalid_condition_leaves_chart_unchanged() {
        let mut chart = ToothChart::new(vec![record(21, Condition::Crown, "porcelain")]);
        let before = serde_json::to_vec(chart.records()).unwrap();

        let err = chart
            .set_condition(tooth(21), "not-a-real-condition")
            .expect_err("should reject");
        assert!(matches!(err, ChartError::InvalidCondition(id) if id == "not-a-real-condition"));

        let err = chart
            .set_condition(tooth(22), "not-a-real-condition")
            .expect_err("should reject");
        assert!(matches!(err, ChartError::InvalidCondition(_)));

        assert_eq!(serde_json::to_vec(chart.records()).unwrap(), before);
    }

    #[test]
    fn any_condition_may_follow_any_other() {
        let mut chart = ToothChart::default();
        for from in ConditionCatalog::list() {
            for to in ConditionCatalog::list() {
                chart.set_condition(tooth(26), from.as_str()).unwrap();
                chart.set_condition(tooth(26), to.as_str()).unwrap();
                assert_eq!(chart.get_record(tooth(26)).condition, *to);
            }
        }
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn size_never_decreases() {
        let mut chart = ToothChart::default();
        let mut last = 0;
        for (i, t) in ToothNumber::permanent_set().enumerate() {
            if i % 2 == 0 {
                chart.set_condition(t, "filling").unwrap();
            } else {
                chart.set_notes(t, "checked");
            }
            let _ = chart.set_condition(t, "bogus");
            chart.set_condition(t, "healthy").unwrap();
            chart.set_notes(t, "");
            assert!(chart.len() >= last);
            last = chart.len();
        }
        assert_eq!(chart.len(), 32);
    }

    #[test]
    fn reset_to_healthy_keeps_the_record() {
        let mut chart = ToothChart::default();
        chart.set_condition(tooth(14), "extraction").unwrap();
        chart.set_condition(tooth(14), "healthy").unwrap();
        chart.set_notes(tooth(14), "");
        assert_eq!(chart.records(), &[record(14, Condition::Healthy, "")]);
    }

    #[test]
    fn duplicates_from_load_are_kept_and_first_is_addressed() {
        let mut chart = ToothChart::new(vec![
            record(31, Condition::Cavity, "first"),
            record(31, Condition::Crown, "second"),
        ]);
        assert_eq!(chart.get_record(tooth(31)).notes, "first");

        chart.set_condition(tooth(31), "filling").unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.records()[0].condition, Condition::Filling);
        assert_eq!(chart.records()[1].condition, Condition::Crown);
    }

    #[test]
    fn from_wire_validates_records() {
        let ok = ToothChart::from_wire(vec![ToothRecordData {
            tooth_number: 16,
            condition: "cavity".into(),
            notes: None,
            surfaces: Some(vec!["occlusal".into()]),
        }])
        .unwrap();
        assert_eq!(ok.get_record(tooth(16)).notes, "");
        assert_eq!(ok.to_wire()[0].surfaces, Some(vec!["occlusal".to_string()]));

        let bad_condition = ToothChart::from_wire(vec![ToothRecordData {
            tooth_number: 16,
            condition: "decay".into(),
            notes: None,
            surfaces: None,
        }]);
        assert!(matches!(bad_condition, Err(ChartError::InvalidCondition(_))));

        let bad_tooth = ToothChart::from_wire(vec![ToothRecordData {
            tooth_number: 19,
            condition: "cavity".into(),
            notes: None,
            surfaces: None,
        }]);
        assert!(matches!(bad_tooth, Err(ChartError::InvalidToothNumber(_))));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&[record(16, Condition::Cavity, "")]).unwrap();
        assert_eq!(json, r#"[{"toothNumber":16,"condition":"cavity","notes":""}]"#);
    }
}
