//! Interactive chart editing.
//!
//! [`ChartEditor`] sits between UI events and a [`ToothChart`]. It owns the selection (focused
//! tooth plus a transient notes buffer) and calls its single [`SaveListener`] once per committed
//! mutation with the complete record collection. Listeners must treat each call as "replace prior
//! state with this snapshot".
//!
//! Everything is synchronous: an operation returns only after the listener has returned.

use crate::chart::{ToothChart, ToothRecord};
use crate::config::EditorConfig;
use crate::ChartResult;
use odonto_types::ToothNumber;

/// Receives a full snapshot after every committed mutation.
///
/// Persistence failures are the listener's concern; the editor never sees them.
pub trait SaveListener {
    fn on_save(&mut self, chart_key: &str, records: &[ToothRecord]);
}

impl<F> SaveListener for F
where
    F: FnMut(&str, &[ToothRecord]),
{
    fn on_save(&mut self, chart_key: &str, records: &[ToothRecord]) {
        self(chart_key, records)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Selection {
    tooth: ToothNumber,
    notes_buffer: String,
}

pub struct ChartEditor<L: SaveListener> {
    chart_key: String,
    chart: ToothChart,
    config: EditorConfig,
    selection: Option<Selection>,
    listener: L,
}

impl<L: SaveListener> ChartEditor<L> {
    /// `chart_key` identifies the chart to the listener (patient or encounter id). The editor
    /// never interprets it.
    pub fn new(
        chart_key: impl Into<String>,
        chart: ToothChart,
        config: EditorConfig,
        listener: L,
    ) -> Self {
        Self {
            chart_key: chart_key.into(),
            chart,
            config,
            selection: None,
            listener,
        }
    }

    pub fn chart_key(&self) -> &str {
        &self.chart_key
    }

    pub fn chart(&self) -> &ToothChart {
        &self.chart
    }

    pub fn records(&self) -> &[ToothRecord] {
        self.chart.records()
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    pub fn selected_tooth(&self) -> Option<ToothNumber> {
        self.selection.as_ref().map(|s| s.tooth)
    }

    pub fn notes_buffer(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.notes_buffer.as_str())
    }

    /// Focus `tooth` and load its current notes into the buffer.
    ///
    /// Replaces any previous selection; uncommitted buffer text is dropped. Ignored when the
    /// editor is read-only.
    pub fn select_tooth(&mut self, tooth: ToothNumber) {
        if self.config.read_only {
            tracing::debug!(chart_key = %self.chart_key, %tooth, "read-only editor, selection ignored");
            return;
        }

        let notes_buffer = self.chart.get_record(tooth).notes;
        self.selection = Some(Selection {
            tooth,
            notes_buffer,
        });
    }

    /// Replace the transient notes buffer of the selected tooth. Nothing is committed.
    pub fn edit_notes(&mut self, text: impl Into<String>) {
        if let Some(selection) = self.selection.as_mut() {
            selection.notes_buffer = text.into();
        }
    }

    /// Set a tooth's condition and save.
    ///
    /// One listener call per successful call, even if the content did not change. Read-only
    /// editors return the unchanged collection without saving.
    ///
    /// # Errors
    ///
    /// [`crate::ChartError::InvalidCondition`] for an identifier outside the catalog. The chart
    /// is unchanged and the listener is not called.
    pub fn apply_condition(
        &mut self,
        tooth: ToothNumber,
        condition_id: &str,
    ) -> ChartResult<&[ToothRecord]> {
        if self.config.read_only {
            tracing::debug!(chart_key = %self.chart_key, %tooth, "read-only editor, condition ignored");
            return Ok(self.chart.records());
        }

        self.chart.set_condition(tooth, condition_id)?;
        self.save();
        Ok(self.chart.records())
    }

    /// Write the notes buffer to the selected tooth and save.
    ///
    /// Returns `None`, with no save, when no tooth is selected.
    pub fn commit_notes(&mut self) -> Option<&[ToothRecord]> {
        let Some(selection) = self.selection.as_ref() else {
            tracing::debug!(chart_key = %self.chart_key, "no tooth selected, notes not committed");
            return None;
        };

        self.chart
            .set_notes(selection.tooth, selection.notes_buffer.clone());
        self.save();
        Some(self.chart.records())
    }

    /// Clear the selection. No mutation, no save.
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    fn save(&mut self) {
        self.listener.on_save(&self.chart_key, self.chart.records());
    }
}
