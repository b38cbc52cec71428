use std::collections::HashSet;

use crate::engine::host::Host;
use crate::model::note::NoteRef;

/// Basenames of the notes showing in any pane, as of the last rescan.
#[derive(Debug, Clone, Default)]
pub struct OpenNotes {
    basenames: HashSet<String>,
}

impl OpenNotes {
    pub fn rebuild<H: Host + ?Sized>(&mut self, host: &H) {
        self.basenames = host
            .open_notes()
            .iter()
            .map(|note| note.basename().to_string())
            .collect();
        tracing::debug!("open notes rescanned: {}", self.basenames.len());
    }

    pub fn contains(&self, note: &NoteRef) -> bool {
        self.basenames.contains(note.basename())
    }

    pub fn len(&self) -> usize {
        self.basenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basenames.is_empty()
    }
}
