use serde::Deserialize;

/// Whether a pane renders a note read-only or as an editable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ViewMode {
    /// Rendered, non-editing preview.
    #[serde(rename = "preview")]
    Reading,
    /// Editable surface; see [`DisplayState::source`] for live vs raw.
    #[default]
    #[serde(rename = "source")]
    Editing,
}

/// Rendering configuration of one pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    pub view_mode: ViewMode,
    /// `true` shows raw markup while editing, `false` the live preview.
    pub source: bool,
}

impl DisplayState {
    pub const READING: Self = Self {
        view_mode: ViewMode::Reading,
        source: false,
    };
    pub const LIVE: Self = Self {
        view_mode: ViewMode::Editing,
        source: false,
    };
    pub const SOURCE: Self = Self {
        view_mode: ViewMode::Editing,
        source: true,
    };

    pub fn label(&self) -> &'static str {
        match (self.view_mode, self.source) {
            (ViewMode::Reading, false) => "reading",
            (ViewMode::Reading, true) => "reading (source on edit)",
            (ViewMode::Editing, false) => "live",
            (ViewMode::Editing, true) => "source",
        }
    }
}

/// Host-wide defaults for notes nothing else claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GlobalDefaults {
    pub view_mode: ViewMode,
    pub live_preview: bool,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Editing,
            live_preview: true,
        }
    }
}

impl GlobalDefaults {
    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            view_mode: self.view_mode,
            source: !self.live_preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_live_preview_to_source_flag() {
        let defaults = GlobalDefaults {
            view_mode: ViewMode::Editing,
            live_preview: false,
        };
        assert_eq!(defaults.display_state(), DisplayState::SOURCE);
        assert_eq!(GlobalDefaults::default().display_state(), DisplayState::LIVE);
    }
}
