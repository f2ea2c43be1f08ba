//! Git helpers for chart storage.
//!
//! Every chart directory is a local Git repository (`git2`/libgit2). Each save becomes a commit,
//! so earlier chart states are amended, never expunged. All commits go to `refs/heads/main`.
//!
//! Commit messages are labels, not records: they never contain tooth data or patient
//! identifiers.
//!
//! ```text
//! odontogram:update: Odontogram updated
//!
//! Author-Name: Dr Ana Silva
//! Author-Role: Dentist
//! Care-Location: Riverside Dental
//! ```

use crate::author::Author;
use crate::constants::MAIN_REF;
use crate::{ChartError, ChartResult};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Component, Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum ChartCommitAction {
    Init,
    Update,
}

impl ChartCommitAction {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for ChartCommitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject line `odontogram:<action>: <summary>` followed by author and location trailers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ChartCommitMessage {
    action: ChartCommitAction,
    summary: String,
    care_location: String,
}

impl ChartCommitMessage {
    pub(crate) fn new(
        action: ChartCommitAction,
        summary: impl Into<String>,
        care_location: impl Into<String>,
    ) -> ChartResult<Self> {
        let summary = summary.into().trim().to_string();
        if summary.is_empty() || summary.contains(['\n', '\r']) {
            return Err(ChartError::InvalidInput(
                "commit summary must be a single non-empty line".into(),
            ));
        }

        let care_location = care_location.into().trim().to_string();
        if care_location.is_empty() {
            return Err(ChartError::MissingCareLocation);
        }
        if care_location.contains(['\n', '\r']) {
            return Err(ChartError::InvalidCareLocation);
        }

        Ok(Self {
            action,
            summary,
            care_location,
        })
    }

    pub(crate) fn render_with_author(&self, author: &Author) -> ChartResult<String> {
        author.validate_commit_author()?;

        Ok(format!(
            "odontogram:{}: {}\n\nAuthor-Name: {}\nAuthor-Role: {}\nCare-Location: {}",
            self.action, self.summary, author.name, author.role, self.care_location
        ))
    }
}

/// One stored revision of a chart, newest first when listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartRevision {
    pub commit_id: String,
    pub committed_at: DateTime<Utc>,
    /// Subject line of the commit.
    pub summary: String,
    pub author_name: String,
}

pub(crate) struct GitService {
    repo: git2::Repository,
    workdir: PathBuf,
}

impl GitService {
    pub(crate) fn init(workdir: &Path) -> ChartResult<Self> {
        let repo = git2::Repository::init(workdir).map_err(ChartError::GitInit)?;
        Ok(Self {
            repo,
            workdir: workdir.to_path_buf(),
        })
    }

    pub(crate) fn open(workdir: &Path) -> ChartResult<Self> {
        let repo = git2::Repository::open(workdir).map_err(ChartError::GitOpen)?;
        Ok(Self {
            repo,
            workdir: workdir.to_path_buf(),
        })
    }

    /// Stage `relative_paths` and commit them on `main`.
    pub(crate) fn commit_paths(
        &self,
        author: &Author,
        message: &ChartCommitMessage,
        relative_paths: &[PathBuf],
    ) -> ChartResult<git2::Oid> {
        let rendered = message.render_with_author(author)?;

        self.repo
            .set_head(MAIN_REF)
            .map_err(ChartError::GitSetHead)?;
        let mut index = self.repo.index().map_err(ChartError::GitIndex)?;

        for path in relative_paths {
            let rel = if path.is_absolute() {
                path.strip_prefix(&self.workdir)
                    .map_err(|_| {
                        ChartError::InvalidInput(format!(
                            "path outside chart directory: {}",
                            path.display()
                        ))
                    })?
                    .to_path_buf()
            } else {
                path.to_path_buf()
            };

            if rel.components().any(|c| matches!(c, Component::ParentDir)) {
                return Err(ChartError::InvalidInput(format!(
                    "path escapes chart directory: {}",
                    rel.display()
                )));
            }

            index.add_path(&rel).map_err(ChartError::GitAdd)?;
        }
        index.write().map_err(ChartError::GitIndex)?;

        let tree_id = index.write_tree().map_err(ChartError::GitWriteTree)?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(ChartError::GitFindTree)?;

        let sig = git2::Signature::now(author.name.as_str(), author.email.as_str())
            .map_err(ChartError::GitSignature)?;

        let parents = self.resolve_head_parents()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, &rendered, &tree, &parent_refs)
            .map_err(ChartError::GitCommit)
    }

    /// Commits reachable from `HEAD`, newest first.
    pub(crate) fn history(&self) -> ChartResult<Vec<ChartRevision>> {
        if self.resolve_head_parents()?.is_empty() {
            return Ok(Vec::new());
        }

        let mut walk = self.repo.revwalk().map_err(ChartError::GitRevwalk)?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(ChartError::GitRevwalk)?;
        walk.push_head().map_err(ChartError::GitRevwalk)?;

        let mut revisions = Vec::new();
        for oid in walk {
            let oid = oid.map_err(ChartError::GitRevwalk)?;
            let commit = self.repo.find_commit(oid).map_err(ChartError::GitPeel)?;
            let committed_at = DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
                .ok_or(ChartError::InvalidTimestamp)?;
            revisions.push(ChartRevision {
                commit_id: oid.to_string(),
                committed_at,
                summary: commit.summary().unwrap_or_default().to_string(),
                author_name: commit.author().name().unwrap_or_default().to_string(),
            });
        }
        Ok(revisions)
    }

    fn resolve_head_parents(&self) -> ChartResult<Vec<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit().map_err(ChartError::GitPeel)?;
                Ok(vec![commit])
            }
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(vec![]),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(vec![]),
            Err(e) => Err(ChartError::GitHead(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn author() -> Author {
        Author::new("Dr Ana Silva", "Dentist", "ana@example.org").unwrap()
    }

    #[test]
    fn renders_subject_and_trailers() {
        let msg = ChartCommitMessage::new(
            ChartCommitAction::Update,
            "Odontogram updated",
            "Riverside Dental",
        )
        .unwrap();
        assert_eq!(
            msg.render_with_author(&author()).unwrap(),
            "odontogram:update: Odontogram updated\n\n\
             Author-Name: Dr Ana Silva\n\
             Author-Role: Dentist\n\
             Care-Location: Riverside Dental"
        );
    }

    #[test]
    fn rejects_multiline_summary_and_missing_location() {
        assert!(ChartCommitMessage::new(ChartCommitAction::Init, "a\nb", "Clinic").is_err());
        let err = ChartCommitMessage::new(ChartCommitAction::Init, "created", " ")
            .expect_err("missing location");
        assert!(matches!(err, ChartError::MissingCareLocation));
        let err = ChartCommitMessage::new(ChartCommitAction::Init, "created", "A\nB")
            .expect_err("multiline location");
        assert!(matches!(err, ChartError::InvalidCareLocation));
    }

    #[test]
    fn commits_accumulate_on_main() {
        let dir = TempDir::new().unwrap();
        let git = GitService::init(dir.path()).unwrap();
        assert!(git.history().unwrap().is_empty());

        std::fs::write(dir.path().join("chart.yaml"), "a").unwrap();
        let init = ChartCommitMessage::new(ChartCommitAction::Init, "created", "Clinic").unwrap();
        git.commit_paths(&author(), &init, &[PathBuf::from("chart.yaml")])
            .unwrap();

        std::fs::write(dir.path().join("chart.yaml"), "b").unwrap();
        let update =
            ChartCommitMessage::new(ChartCommitAction::Update, "changed", "Clinic").unwrap();
        git.commit_paths(&author(), &update, &[dir.path().join("chart.yaml")])
            .unwrap();

        let reopened = GitService::open(dir.path()).unwrap();
        let history = reopened.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].summary, "odontogram:update: changed");
        assert_eq!(history[1].summary, "odontogram:init: created");
        assert_eq!(history[0].author_name, "Dr Ana Silva");

        let head = reopened.repo.head().unwrap();
        assert_eq!(head.name(), Some(MAIN_REF));
    }

    #[test]
    fn rejects_paths_escaping_workdir() {
        let dir = TempDir::new().unwrap();
        let git = GitService::init(dir.path()).unwrap();
        let msg = ChartCommitMessage::new(ChartCommitAction::Update, "x", "Clinic").unwrap();
        let err = git
            .commit_paths(&author(), &msg, &[PathBuf::from("../outside.yaml")])
            .expect_err("should reject");
        assert!(matches!(err, ChartError::InvalidInput(_)));
    }
}
