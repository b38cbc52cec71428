//! Force notes to open in reading, live-preview or source mode.
//!
//! Rules come from folder paths, filename patterns and a note's own frontmatter,
//! with the host's global default as the last resort. [`Controller`] receives the
//! host's pane-focus events and applies the resolved state through the [`Host`]
//! trait.

pub mod engine;
pub mod error;
pub mod model;
pub mod rules;
pub mod workspace;

pub use engine::{Controller, Host, PaneId, PaneView, PassOutcome};
pub use error::{HostError, RuleError};
pub use model::config::{AppConfig, FileRule, FolderRule, MetadataKeys, Settings};
pub use model::metadata::NoteMetadata;
pub use model::mode::{DisplayState, GlobalDefaults, ViewMode};
pub use model::note::NoteRef;
pub use workspace::Workspace;
