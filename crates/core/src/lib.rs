//! # Odonto Core
//!
//! The tooth-chart (odontogram) editing model and its file-backed persistence.
//!
//! - [`ConditionCatalog`]: the closed set of clinical conditions, in legend order
//! - [`ToothChart`]: per-encounter tooth records with upsert semantics and no delete
//! - [`ChartEditor`]: selection, condition assignment and note commits, with one save
//!   notification per committed mutation
//! - [`ChartStore`]: sharded, Git-versioned chart files used as the save target
//!
//! **No API concerns**: HTTP servers and CLI parsing belong in `api-rest` and `odonto-cli`.

pub mod author;
pub mod chart;
pub mod condition;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
mod git;
pub mod store;
pub mod uuid;

pub use author::Author;
pub use chart::{ToothChart, ToothRecord};
pub use condition::{Condition, ConditionCatalog};
pub use config::{CoreConfig, EditorConfig};
pub use constants::{DEFAULT_CARE_LOCATION, DEFAULT_DATA_DIR};
pub use editor::{ChartEditor, SaveListener};
pub use error::{ChartError, ChartResult};
pub use git::ChartRevision;
pub use store::{ChartStore, StoreListener};
pub use uuid::ChartId;

pub use odonto_types::{Arch, NonEmptyText, ToothNumber, ToothNumberError};
