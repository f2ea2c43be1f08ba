//! File-backed, versioned chart storage.
//!
//! [`ChartStore`] is the persistence collaborator for [`ChartEditor`]. Each chart is a directory
//!
//! ```text
//! <data_dir>/charts/<id[0..2]>/<id[2..4]>/<id>/
//!     .git/
//!     odontogram.yaml
//! ```
//!
//! and every save rewrites `odontogram.yaml` and commits it. The store keeps no merge logic: the
//! last snapshot written wins, and older snapshots stay reachable through [`ChartStore::history`].
//!
//! [`StoreListener`] plugs the store into an editor. It interprets the editor's chart key as a
//! [`ChartId`].

use crate::author::Author;
use crate::chart::{ToothChart, ToothRecord};
use crate::config::{CoreConfig, EditorConfig};
use crate::constants::CHART_FILENAME;
use crate::editor::{ChartEditor, SaveListener};
use crate::git::{ChartCommitAction, ChartCommitMessage, ChartRevision, GitService};
use crate::uuid::ChartId;
use crate::{ChartError, ChartResult};
use chart_wire::{ChartFile, ChartFileData};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Service for creating, loading and saving charts.
pub struct ChartStore {
    cfg: Arc<CoreConfig>,
    write_lock: Mutex<()>,
}

impl ChartStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Allocates a new chart directory with an empty chart and an initial commit.
    ///
    /// # Errors
    ///
    /// Returns a `ChartError` if a unique directory cannot be allocated after 5 attempts, if
    /// writing the chart file or committing fails, or if cleaning up after such a failure fails.
    pub fn create(&self, author: &Author) -> ChartResult<ChartId> {
        author.validate_commit_author()?;
        let msg = ChartCommitMessage::new(
            ChartCommitAction::Init,
            "Odontogram created",
            self.cfg.care_location(),
        )?;

        let (chart_id, chart_dir) =
            allocate_unique_chart_dir(&self.cfg.charts_dir(), ChartId::new)?;

        let result: ChartResult<()> = (|| {
            let repo = GitService::init(&chart_dir)?;
            write_chart_file(&chart_dir, chart_id, &ToothChart::default())?;
            repo.commit_paths(author, &msg, &[PathBuf::from(CHART_FILENAME)])?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                tracing::info!(%chart_id, "chart created");
                Ok(chart_id)
            }
            Err(create_error) => match fs::remove_dir_all(&chart_dir) {
                Ok(()) => Err(create_error),
                Err(cleanup_error) => Err(ChartError::CleanupAfterCreateFailed {
                    path: chart_dir,
                    create_error: Box::new(create_error),
                    cleanup_error,
                }),
            },
        }
    }

    /// Reads the current chart.
    pub fn load(&self, chart_id: ChartId) -> ChartResult<ToothChart> {
        let chart_dir = self.existing_chart_dir(chart_id)?;
        let text =
            fs::read_to_string(chart_dir.join(CHART_FILENAME)).map_err(ChartError::FileRead)?;
        let data = ChartFile::parse(&text)?;

        if data.chart_id != chart_id.uuid() {
            return Err(ChartError::InvalidInput(format!(
                "chart file in {chart_id} belongs to {}",
                data.chart_id.simple()
            )));
        }

        ToothChart::from_wire(data.records)
    }

    /// Replaces the stored chart with `records` and commits the new snapshot.
    pub fn save(
        &self,
        chart_id: ChartId,
        author: &Author,
        records: &[ToothRecord],
    ) -> ChartResult<()> {
        let msg = ChartCommitMessage::new(
            ChartCommitAction::Update,
            "Odontogram updated",
            self.cfg.care_location(),
        )?;
        let chart_dir = self.existing_chart_dir(chart_id)?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // The working file must always match HEAD, so a failed commit puts the old bytes back.
        let chart_path = chart_dir.join(CHART_FILENAME);
        let previous = fs::read(&chart_path).map_err(ChartError::FileRead)?;

        let result = (|| -> ChartResult<git2::Oid> {
            write_chart_file(&chart_dir, chart_id, &ToothChart::new(records.to_vec()))?;
            GitService::open(&chart_dir)?.commit_paths(
                author,
                &msg,
                &[PathBuf::from(CHART_FILENAME)],
            )
        })();

        match result {
            Ok(oid) => {
                tracing::info!(%chart_id, commit = %oid, records = records.len(), "chart saved");
                Ok(())
            }
            Err(save_error) => match fs::write(&chart_path, &previous) {
                Ok(()) => {
                    tracing::warn!(%chart_id, "chart save failed, previous revision restored");
                    Err(save_error)
                }
                Err(restore_error) => Err(ChartError::RestoreAfterSaveFailed {
                    path: chart_path,
                    save_error: Box::new(save_error),
                    restore_error,
                }),
            },
        }
    }

    /// Stored revisions, newest first.
    pub fn history(&self, chart_id: ChartId) -> ChartResult<Vec<ChartRevision>> {
        let chart_dir = self.existing_chart_dir(chart_id)?;
        GitService::open(&chart_dir)?.history()
    }

    /// Every chart id under the data directory. Unreadable entries are skipped with a warning.
    pub fn list(&self) -> Vec<ChartId> {
        let mut ids = Vec::new();
        let charts_dir = self.cfg.charts_dir();

        let Ok(s1_iter) = fs::read_dir(&charts_dir) else {
            return ids;
        };
        for s1 in s1_iter.flatten() {
            let Ok(s2_iter) = fs::read_dir(s1.path()) else {
                continue;
            };
            for s2 in s2_iter.flatten() {
                let Ok(id_iter) = fs::read_dir(s2.path()) else {
                    continue;
                };
                for id_ent in id_iter.flatten() {
                    let path = id_ent.path();
                    if !path.join(CHART_FILENAME).is_file() {
                        continue;
                    }
                    let name = id_ent.file_name();
                    match name.to_str().map(ChartId::parse) {
                        Some(Ok(id)) => ids.push(id),
                        _ => tracing::warn!(
                            "skipping unrecognised chart directory: {}",
                            path.display()
                        ),
                    }
                }
            }
        }

        ids.sort_by_key(|id| id.to_string());
        ids
    }

    /// An editor over the stored chart whose saves are written back to this store.
    pub fn editor(
        &self,
        chart_id: ChartId,
        author: Author,
        config: EditorConfig,
    ) -> ChartResult<ChartEditor<StoreListener<'_>>> {
        let chart = self.load(chart_id)?;
        Ok(ChartEditor::new(
            chart_id.to_string(),
            chart,
            config,
            StoreListener::new(self, author),
        ))
    }

    fn existing_chart_dir(&self, chart_id: ChartId) -> ChartResult<PathBuf> {
        let chart_dir = chart_id.sharded_dir(&self.cfg.charts_dir());
        if !chart_dir.join(CHART_FILENAME).is_file() {
            return Err(ChartError::ChartNotFound(chart_id.to_string()));
        }
        Ok(chart_dir)
    }
}

/// Save listener that writes every snapshot to a [`ChartStore`].
///
/// A failed write does not reach the editor. It is logged and kept in [`Self::last_error`] for
/// the host to report.
pub struct StoreListener<'a> {
    store: &'a ChartStore,
    author: Author,
    saved: usize,
    last_error: Option<ChartError>,
}

impl<'a> StoreListener<'a> {
    pub fn new(store: &'a ChartStore, author: Author) -> Self {
        Self {
            store,
            author,
            saved: 0,
            last_error: None,
        }
    }

    /// Number of snapshots written successfully.
    pub fn saved(&self) -> usize {
        self.saved
    }

    pub fn last_error(&self) -> Option<&ChartError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ChartError> {
        self.last_error.take()
    }
}

impl SaveListener for StoreListener<'_> {
    fn on_save(&mut self, chart_key: &str, records: &[ToothRecord]) {
        let result = ChartId::parse(chart_key)
            .and_then(|chart_id| self.store.save(chart_id, &self.author, records));

        match result {
            Ok(()) => self.saved += 1,
            Err(e) => {
                tracing::error!(chart_key, "failed to persist chart: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

fn write_chart_file(chart_dir: &Path, chart_id: ChartId, chart: &ToothChart) -> ChartResult<()> {
    let yaml = ChartFile::render(&ChartFileData {
        chart_id: chart_id.uuid(),
        records: chart.to_wire(),
    })?;
    fs::write(chart_dir.join(CHART_FILENAME), yaml).map_err(ChartError::FileWrite)
}

fn allocate_unique_chart_dir(
    charts_dir: &Path,
    mut id_source: impl FnMut() -> ChartId,
) -> ChartResult<(ChartId, PathBuf)> {
    // Bounded retries guard against collisions and directories created behind our back.
    for _attempt in 0..5 {
        let chart_id = id_source();
        let candidate = chart_id.sharded_dir(charts_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(ChartError::StorageDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((chart_id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(ChartError::StorageDirCreation(e)),
        }
    }

    Err(ChartError::StorageDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to allocate a unique chart directory after 5 attempts",
    )))
}
