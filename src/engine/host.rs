use crate::error::HostError;
use crate::model::metadata::NoteMetadata;
use crate::model::mode::{DisplayState, GlobalDefaults};
use crate::model::note::NoteRef;

slotmap::new_key_type! {
    /// Handle to a pane in the host application.
    pub struct PaneId;
}

/// What a note pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneView {
    pub note: NoteRef,
    pub state: DisplayState,
}

/// Capabilities the controller needs from the host application.
pub trait Host {
    fn active_pane(&self) -> Option<PaneId>;

    /// `None` when the pane is closed or does not display a note.
    fn pane_view(&self, pane: PaneId) -> Option<PaneView>;

    fn note_metadata(&self, note: &NoteRef) -> NoteMetadata;

    /// Notes shown in any pane, one entry per pane.
    fn open_notes(&self) -> Vec<NoteRef>;

    fn write_display_state(&mut self, pane: PaneId, state: DisplayState) -> Result<(), HostError>;

    fn global_defaults(&self) -> GlobalDefaults;

    /// Vault-relative folder lookup; `""` is the vault root.
    fn folder_exists(&self, folder: &str) -> bool;
}
