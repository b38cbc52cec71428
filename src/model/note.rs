use std::fmt;

/// A note identified by its vault-relative path, e.g. `journal/2024-01-01.md`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteRef {
    path: String,
}

impl NoteRef {
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self {
            path: path.trim_start_matches('/').replace('\\', "/"),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name without its extension.
    pub fn basename(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }

    /// Containing folder; empty for notes at the vault root.
    pub fn folder(&self) -> &str {
        self.path.rfind('/').map(|idx| &self.path[..idx]).unwrap_or("")
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Normalize a folder path to the form used by [`NoteRef::folder`].
pub fn normalize_folder(path: &str) -> String {
    path.trim().replace('\\', "/").trim_matches('/').to_string()
}

/// True when `folder` is `ancestor` or lies beneath it. The root (`""`) contains
/// every folder.
pub fn folder_contains(ancestor: &str, folder: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    folder == ancestor
        || folder
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}
