use anyhow::Result;
use ignore::WalkBuilder;
use slotmap::SlotMap;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::engine::host::{Host, PaneId, PaneView};
use crate::error::HostError;
use crate::model::metadata::NoteMetadata;
use crate::model::mode::{DisplayState, GlobalDefaults};
use crate::model::note::{NoteRef, normalize_folder};

#[derive(Debug, Clone)]
pub struct Pane {
    /// `None` for panes that show something other than a note.
    pub note: Option<NoteRef>,
    pub state: DisplayState,
    /// State writes accepted from the controller.
    pub writes: usize,
    reject_writes: bool,
}

/// In-process host: a note catalogue plus a set of panes.
#[derive(Debug, Default)]
pub struct Workspace {
    notes: HashMap<NoteRef, NoteMetadata>,
    folders: BTreeSet<String>,
    panes: SlotMap<PaneId, Pane>,
    order: Vec<PaneId>,
    active: Option<PaneId>,
    defaults: GlobalDefaults,
}

impl Workspace {
    pub fn new(defaults: GlobalDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Catalogue every folder and markdown note under `root`, reading frontmatter.
    pub fn from_vault(root: &Path, defaults: GlobalDefaults) -> Result<Self> {
        let mut workspace = Self::new(defaults);

        for entry in WalkBuilder::new(root).hidden(true).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("vault scan: {err}");
                    continue;
                }
            };
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if relative.is_empty() {
                continue;
            }

            let is_dir = entry.file_type().is_some_and(|kind| kind.is_dir());
            if is_dir {
                workspace.insert_folder(&relative);
            } else if entry.path().extension().is_some_and(|ext| ext == "md") {
                let text = std::fs::read_to_string(entry.path())?;
                workspace.insert_note(relative, NoteMetadata::from_markdown(&text));
            }
        }

        tracing::info!(
            "vault {}: {} notes, {} folders",
            root.display(),
            workspace.notes.len(),
            workspace.folders.len()
        );
        Ok(workspace)
    }

    pub fn insert_folder(&mut self, path: &str) {
        let folder = normalize_folder(path);
        if !folder.is_empty() {
            self.folders.insert(folder);
        }
    }

    /// Add a note and every folder above it.
    pub fn insert_note(&mut self, path: impl Into<String>, metadata: NoteMetadata) -> NoteRef {
        let note = NoteRef::new(path);
        let mut folder = note.folder();
        while !folder.is_empty() {
            self.folders.insert(folder.to_string());
            folder = folder.rfind('/').map(|idx| &folder[..idx]).unwrap_or("");
        }
        self.notes.insert(note.clone(), metadata);
        note
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Open `path` in a new pane in the host's default state and focus it.
    pub fn open_note(&mut self, path: impl Into<String>) -> PaneId {
        self.open(Some(NoteRef::new(path)))
    }

    /// Open a pane that shows no note (a graph or file list, say).
    pub fn open_other(&mut self) -> PaneId {
        self.open(None)
    }

    fn open(&mut self, note: Option<NoteRef>) -> PaneId {
        let pane = self.panes.insert(Pane {
            note,
            state: self.defaults.display_state(),
            writes: 0,
            reject_writes: false,
        });
        self.order.push(pane);
        self.active = Some(pane);
        pane
    }

    pub fn focus(&mut self, pane: PaneId) -> bool {
        if !self.panes.contains_key(pane) {
            return false;
        }
        self.active = Some(pane);
        true
    }

    /// Close a pane; focus moves to the most recently opened remaining one.
    pub fn close(&mut self, pane: PaneId) -> bool {
        if self.panes.remove(pane).is_none() {
            return false;
        }
        self.order.retain(|id| *id != pane);
        if self.active == Some(pane) {
            self.active = self.order.last().copied();
        }
        true
    }

    pub fn pane(&self, pane: PaneId) -> Option<&Pane> {
        self.panes.get(pane)
    }

    /// Pane by position in opening order.
    pub fn pane_at(&self, index: usize) -> Option<PaneId> {
        self.order.get(index).copied()
    }

    pub fn panes(&self) -> impl Iterator<Item = (PaneId, &Pane)> {
        self.order
            .iter()
            .filter_map(|id| self.panes.get(*id).map(|pane| (*id, pane)))
    }

    /// Change a pane's state the way a user toggle would, bypassing write counts.
    pub fn set_state(&mut self, pane: PaneId, state: DisplayState) -> bool {
        match self.panes.get_mut(pane) {
            Some(entry) => {
                entry.state = state;
                true
            }
            None => false,
        }
    }

    pub fn reject_writes(&mut self, pane: PaneId, reject: bool) {
        if let Some(entry) = self.panes.get_mut(pane) {
            entry.reject_writes = reject;
        }
    }
}

impl Host for Workspace {
    fn active_pane(&self) -> Option<PaneId> {
        self.active
    }

    fn pane_view(&self, pane: PaneId) -> Option<PaneView> {
        let entry = self.panes.get(pane)?;
        Some(PaneView {
            note: entry.note.clone()?,
            state: entry.state,
        })
    }

    fn note_metadata(&self, note: &NoteRef) -> NoteMetadata {
        self.notes.get(note).cloned().unwrap_or_default()
    }

    fn open_notes(&self) -> Vec<NoteRef> {
        self.panes().filter_map(|(_, pane)| pane.note.clone()).collect()
    }

    fn write_display_state(&mut self, pane: PaneId, state: DisplayState) -> Result<(), HostError> {
        let entry = self.panes.get_mut(pane).ok_or(HostError::PaneClosed)?;
        if entry.reject_writes {
            return Err(HostError::Rejected("pane is read-only".to_string()));
        }
        entry.state = state;
        entry.writes += 1;
        Ok(())
    }

    fn global_defaults(&self) -> GlobalDefaults {
        self.defaults
    }

    fn folder_exists(&self, folder: &str) -> bool {
        folder.is_empty() || self.folders.contains(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mode::ViewMode;
    use std::fs;

    #[test]
    fn insert_note_registers_ancestor_folders() {
        let mut workspace = Workspace::default();
        workspace.insert_note("a/b/c/note.md", NoteMetadata::new());

        assert!(workspace.folder_exists("a"));
        assert!(workspace.folder_exists("a/b"));
        assert!(workspace.folder_exists("a/b/c"));
        assert!(workspace.folder_exists(""));
        assert!(!workspace.folder_exists("a/b/c/note.md"));
    }

    #[test]
    fn panes_open_in_default_state_and_take_focus() {
        let defaults = GlobalDefaults {
            view_mode: ViewMode::Reading,
            live_preview: true,
        };
        let mut workspace = Workspace::new(defaults);
        let first = workspace.open_note("one.md");
        let second = workspace.open_other();

        assert_eq!(workspace.active_pane(), Some(second));
        assert_eq!(workspace.pane_view(second), None);
        assert_eq!(
            workspace.pane_view(first).map(|view| view.state),
            Some(DisplayState::READING)
        );

        assert!(workspace.close(second));
        assert_eq!(workspace.active_pane(), Some(first));
        assert_eq!(workspace.open_notes(), vec![NoteRef::new("one.md")]);
    }

    #[test]
    fn writes_fail_on_closed_or_read_only_panes() {
        let mut workspace = Workspace::default();
        let pane = workspace.open_note("one.md");

        workspace.reject_writes(pane, true);
        assert!(matches!(
            workspace.write_display_state(pane, DisplayState::SOURCE),
            Err(HostError::Rejected(_))
        ));

        workspace.close(pane);
        assert_eq!(
            workspace.write_display_state(pane, DisplayState::SOURCE),
            Err(HostError::PaneClosed)
        );
    }

    #[test]
    fn from_vault_reads_frontmatter_and_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("journal/2024")).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(
            dir.path().join("journal/2024/jan.md"),
            "---\nobsidianUIMode: preview\n---\n# January\n",
        )
        .unwrap();
        fs::write(dir.path().join("readme.txt"), "not a note").unwrap();

        let workspace = Workspace::from_vault(dir.path(), GlobalDefaults::default()).unwrap();

        assert_eq!(workspace.note_count(), 1);
        assert!(workspace.folder_exists("empty"));
        assert!(workspace.folder_exists("journal/2024"));
        let metadata = workspace.note_metadata(&NoteRef::new("journal/2024/jan.md"));
        assert_eq!(metadata.get("obsidianUIMode"), Some("preview"));
    }
}
