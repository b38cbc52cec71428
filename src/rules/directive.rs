use crate::model::config::MetadataKeys;
use crate::model::mode::{DisplayState, ViewMode};

/// Which frontmatter key a directive speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKey {
    View,
    Editing,
}

/// Mode tokens shared by directives and frontmatter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeToken {
    Source,
    Preview,
    Live,
}

impl ModeToken {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "source" => Some(ModeToken::Source),
            "preview" => Some(ModeToken::Preview),
            "live" => Some(ModeToken::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeToken::Source => "source",
            ModeToken::Preview => "preview",
            ModeToken::Live => "live",
        }
    }

    /// View mode this token selects when used with the view-mode key.
    pub fn view_mode(&self) -> ViewMode {
        match self {
            ModeToken::Preview => ViewMode::Reading,
            ModeToken::Source | ModeToken::Live => ViewMode::Editing,
        }
    }

    /// Raw-source flag this token selects when used with the editing-mode key.
    /// `preview` is not an editing mode.
    pub fn source_flag(&self) -> Option<bool> {
        match self {
            ModeToken::Source => Some(true),
            ModeToken::Live => Some(false),
            ModeToken::Preview => None,
        }
    }
}

/// A decoded `"<key>: <mode>"` rule directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub key: ModeKey,
    pub mode: ModeToken,
}

/// Outcome of parsing a directive string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDirective {
    Force(Directive),
    /// The `default` sentinel: stop forcing what earlier rules matched.
    Default,
    Malformed,
}

impl Directive {
    pub fn parse(raw: &str, keys: &MetadataKeys) -> ParsedDirective {
        let (key, value) = match raw.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (raw.trim(), ""),
        };

        if key == "default" {
            return ParsedDirective::Default;
        }

        let Some(mode) = ModeToken::parse(value) else {
            return ParsedDirective::Malformed;
        };

        let key = if key == keys.view_mode {
            ModeKey::View
        } else if key == keys.editing_mode {
            ModeKey::Editing
        } else {
            return ParsedDirective::Malformed;
        };

        if key == ModeKey::Editing && mode.source_flag().is_none() {
            return ParsedDirective::Malformed;
        }

        ParsedDirective::Force(Directive { key, mode })
    }

    /// Concrete pane state this directive forces.
    pub fn display_state(&self) -> DisplayState {
        match self.key {
            ModeKey::Editing => DisplayState {
                view_mode: ViewMode::Editing,
                source: self.mode.source_flag().unwrap_or(false),
            },
            ModeKey::View => DisplayState {
                view_mode: self.mode.view_mode(),
                source: false,
            },
        }
    }

    pub fn render(&self, keys: &MetadataKeys) -> String {
        let key = match self.key {
            ModeKey::View => &keys.view_mode,
            ModeKey::Editing => &keys.editing_mode,
        };
        format!("{key}: {}", self.mode.as_str())
    }

    /// Every directive string a rule may carry, `default` first.
    pub fn choices(keys: &MetadataKeys) -> Vec<String> {
        let mut choices = vec!["default".to_string()];
        for mode in [ModeToken::Source, ModeToken::Preview, ModeToken::Live] {
            choices.push(
                Directive {
                    key: ModeKey::View,
                    mode,
                }
                .render(keys),
            );
        }
        for mode in [ModeToken::Source, ModeToken::Live] {
            choices.push(
                Directive {
                    key: ModeKey::Editing,
                    mode,
                }
                .render(keys),
            );
        }
        choices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> MetadataKeys {
        MetadataKeys::default()
    }

    #[test]
    fn parses_view_and_editing_directives() {
        assert_eq!(
            Directive::parse("obsidianUIMode: preview", &keys()),
            ParsedDirective::Force(Directive {
                key: ModeKey::View,
                mode: ModeToken::Preview,
            })
        );
        assert_eq!(
            Directive::parse("  obsidianEditingMode:source ", &keys()),
            ParsedDirective::Force(Directive {
                key: ModeKey::Editing,
                mode: ModeToken::Source,
            })
        );
    }

    #[test]
    fn default_sentinel_ignores_any_value() {
        assert_eq!(Directive::parse("default", &keys()), ParsedDirective::Default);
        assert_eq!(
            Directive::parse("default: whatever", &keys()),
            ParsedDirective::Default
        );
    }

    #[test]
    fn malformed_directives() {
        for raw in [
            "",
            "obsidianUIMode: reading",
            "obsidianUIMode: Preview",
            "unknownKey: preview",
            "obsidianEditingMode: preview",
        ] {
            assert_eq!(
                Directive::parse(raw, &keys()),
                ParsedDirective::Malformed,
                "{raw}"
            );
        }
    }

    #[test]
    fn editing_directives_always_edit() {
        let live = Directive {
            key: ModeKey::Editing,
            mode: ModeToken::Live,
        };
        let raw = Directive {
            key: ModeKey::Editing,
            mode: ModeToken::Source,
        };
        assert_eq!(live.display_state(), DisplayState::LIVE);
        assert_eq!(raw.display_state(), DisplayState::SOURCE);
    }

    #[test]
    fn view_directives_never_force_raw_source() {
        let source = Directive {
            key: ModeKey::View,
            mode: ModeToken::Source,
        };
        let preview = Directive {
            key: ModeKey::View,
            mode: ModeToken::Preview,
        };
        assert_eq!(source.display_state(), DisplayState::LIVE);
        assert_eq!(preview.display_state(), DisplayState::READING);
    }

    #[test]
    fn every_choice_parses() {
        let keys = keys();
        let choices = Directive::choices(&keys);
        assert_eq!(choices.len(), 6);
        for choice in choices {
            assert_ne!(Directive::parse(&choice, &keys), ParsedDirective::Malformed);
        }
    }
}
