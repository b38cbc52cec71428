use regex::Regex;

use crate::error::RuleError;
use crate::model::config::Settings;
use crate::model::note::{NoteRef, folder_contains, normalize_folder};
use crate::rules::directive::{Directive, ParsedDirective};

#[derive(Debug, Clone)]
struct FolderMatch {
    index: usize,
    folder: String,
    directive: ParsedDirective,
}

#[derive(Debug, Clone)]
struct FileMatch {
    pattern: Regex,
    directive: ParsedDirective,
}

/// Folder and file rules compiled once per settings change.
///
/// Malformed directives and invalid patterns are dropped here and kept in
/// [`RuleSet::problems`] for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    folders: Vec<FolderMatch>,
    files: Vec<FileMatch>,
    problems: Vec<RuleError>,
}

impl RuleSet {
    pub fn compile(settings: &Settings) -> Self {
        let mut rules = Self::default();

        for (index, rule) in settings.folders.iter().enumerate() {
            // `""` and `/` both normalize to the vault root.
            if rule.directive.trim().is_empty() {
                continue;
            }
            match Directive::parse(&rule.directive, &settings.keys) {
                ParsedDirective::Malformed => {
                    tracing::debug!("ignoring folder rule {index}: `{}`", rule.directive);
                    rules.problems.push(RuleError::MalformedDirective {
                        kind: "folder",
                        index,
                        directive: rule.directive.clone(),
                    });
                }
                directive => rules.folders.push(FolderMatch {
                    index,
                    folder: normalize_folder(&rule.path),
                    directive,
                }),
            }
        }

        for (index, rule) in settings.files.iter().enumerate() {
            if rule.pattern.is_empty() || rule.directive.trim().is_empty() {
                continue;
            }
            let directive = Directive::parse(&rule.directive, &settings.keys);
            if directive == ParsedDirective::Malformed {
                tracing::debug!("ignoring file rule {index}: `{}`", rule.directive);
                rules.problems.push(RuleError::MalformedDirective {
                    kind: "file",
                    index,
                    directive: rule.directive.clone(),
                });
                continue;
            }
            match Regex::new(&rule.pattern) {
                Ok(pattern) => rules.files.push(FileMatch { pattern, directive }),
                Err(source) => {
                    let err = RuleError::InvalidPattern {
                        index,
                        pattern: rule.pattern.clone(),
                        source,
                    };
                    tracing::warn!("{err}");
                    rules.problems.push(err);
                }
            }
        }

        rules
    }

    pub fn problems(&self) -> &[RuleError] {
        &self.problems
    }

    /// Folder rules whose folder the host does not know.
    pub fn check_folders(&self, folder_exists: impl Fn(&str) -> bool) -> Vec<RuleError> {
        self.folders
            .iter()
            .filter(|rule| !folder_exists(&rule.folder))
            .map(|rule| RuleError::UnknownFolder {
                index: rule.index,
                folder: rule.folder.clone(),
            })
            .collect()
    }

    /// The directive that applies to `note`, if any.
    ///
    /// Folder rules run first, then file rules; within each list the last match
    /// wins and any file match replaces the folder result. A `default` match clears
    /// whatever was matched before it.
    pub fn match_note(
        &self,
        note: &NoteRef,
        folder_exists: impl Fn(&str) -> bool,
    ) -> Option<Directive> {
        let mut matched = None;
        let folder = note.folder();

        for rule in &self.folders {
            if !folder_exists(&rule.folder) {
                tracing::warn!(
                    "folder rule {}: folder `{}` does not exist or is not a folder",
                    rule.index,
                    rule.folder
                );
                continue;
            }
            if folder_contains(&rule.folder, folder) {
                matched = apply(matched, rule.directive);
            }
        }

        let basename = note.basename();
        for rule in &self.files {
            if rule.pattern.is_match(basename) {
                matched = apply(matched, rule.directive);
            }
        }

        matched
    }
}

fn apply(current: Option<Directive>, directive: ParsedDirective) -> Option<Directive> {
    match directive {
        ParsedDirective::Force(directive) => Some(directive),
        ParsedDirective::Default => None,
        ParsedDirective::Malformed => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{FileRule, FolderRule};
    use crate::rules::directive::{ModeKey, ModeToken};

    const PREVIEW: Directive = Directive {
        key: ModeKey::View,
        mode: ModeToken::Preview,
    };
    const RAW: Directive = Directive {
        key: ModeKey::Editing,
        mode: ModeToken::Source,
    };
    const LIVE: Directive = Directive {
        key: ModeKey::Editing,
        mode: ModeToken::Live,
    };

    fn settings(folders: Vec<FolderRule>, files: Vec<FileRule>) -> Settings {
        Settings {
            folders,
            files,
            ..Settings::default()
        }
    }

    fn any_folder(_: &str) -> bool {
        true
    }

    #[test]
    fn folder_rule_matches_descendants() {
        let rules = RuleSet::compile(&settings(
            vec![FolderRule::new("notes/daily", "obsidianUIMode: preview")],
            vec![],
        ));

        let note = NoteRef::new("notes/daily/2024-01-01.md");
        assert_eq!(rules.match_note(&note, any_folder), Some(PREVIEW));
        let nested = NoteRef::new("notes/daily/old/2023-01-01.md");
        assert_eq!(rules.match_note(&nested, any_folder), Some(PREVIEW));
        let sibling = NoteRef::new("notes/weekly/w1.md");
        assert_eq!(rules.match_note(&sibling, any_folder), None);
    }

    #[test]
    fn later_child_rule_overrides_parent() {
        let rules = RuleSet::compile(&settings(
            vec![
                FolderRule::new("notes", "obsidianUIMode: preview"),
                FolderRule::new("notes/drafts", "obsidianEditingMode: source"),
            ],
            vec![],
        ));

        let draft = NoteRef::new("notes/drafts/idea.md");
        assert_eq!(rules.match_note(&draft, any_folder), Some(RAW));
        let other = NoteRef::new("notes/idea.md");
        assert_eq!(rules.match_note(&other, any_folder), Some(PREVIEW));
    }

    #[test]
    fn parent_rule_listed_last_wins() {
        let rules = RuleSet::compile(&settings(
            vec![
                FolderRule::new("notes/drafts", "obsidianEditingMode: source"),
                FolderRule::new("notes", "obsidianUIMode: preview"),
            ],
            vec![],
        ));

        let draft = NoteRef::new("notes/drafts/idea.md");
        assert_eq!(rules.match_note(&draft, any_folder), Some(PREVIEW));
    }

    #[test]
    fn default_clears_parent_match() {
        let rules = RuleSet::compile(&settings(
            vec![
                FolderRule::new("notes", "obsidianUIMode: preview"),
                FolderRule::new("notes/drafts", "default"),
            ],
            vec![],
        ));

        let draft = NoteRef::new("notes/drafts/idea.md");
        assert_eq!(rules.match_note(&draft, any_folder), None);
    }

    #[test]
    fn file_rule_beats_folder_rule() {
        let rules = RuleSet::compile(&settings(
            vec![FolderRule::new("notes", "obsidianUIMode: preview")],
            vec![FileRule::new("^Untitled", "obsidianEditingMode: live")],
        ));

        let note = NoteRef::new("notes/Untitled 3.md");
        assert_eq!(rules.match_note(&note, any_folder), Some(LIVE));
    }

    #[test]
    fn file_default_clears_folder_match() {
        let rules = RuleSet::compile(&settings(
            vec![FolderRule::new("notes", "obsidianUIMode: preview")],
            vec![FileRule::new("scratch", "default")],
        ));

        let note = NoteRef::new("notes/my scratch pad.md");
        assert_eq!(rules.match_note(&note, any_folder), None);
    }

    #[test]
    fn file_pattern_searches_basename_only() {
        let rules = RuleSet::compile(&settings(
            vec![],
            vec![
                FileRule::new("daily", "obsidianUIMode: preview"),
                FileRule::new(r"\.md$", "obsidianEditingMode: source"),
            ],
        ));

        let note = NoteRef::new("journal/my-daily-log.md");
        assert_eq!(rules.match_note(&note, any_folder), Some(PREVIEW));
        let in_daily_folder = NoteRef::new("daily/log.md");
        assert_eq!(rules.match_note(&in_daily_folder, any_folder), None);
    }

    #[test]
    fn missing_folder_is_skipped_not_fatal() {
        let rules = RuleSet::compile(&settings(
            vec![
                FolderRule::new("notes", "obsidianUIMode: preview"),
                FolderRule::new("gone", "obsidianEditingMode: source"),
            ],
            vec![],
        ));
        let exists = |folder: &str| folder != "gone";

        let note = NoteRef::new("notes/a.md");
        assert_eq!(rules.match_note(&note, exists), Some(PREVIEW));

        let problems = rules.check_folders(exists);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].to_string().contains("`gone`"));
    }

    #[test]
    fn malformed_and_invalid_rules_are_recorded_and_ignored() {
        let rules = RuleSet::compile(&settings(
            vec![
                FolderRule::new("notes", "obsidianUIMode: preview"),
                FolderRule::new("notes", "obsidianUIMode: fullscreen"),
            ],
            vec![FileRule::new("([", "obsidianEditingMode: source")],
        ));

        let note = NoteRef::new("notes/([.md");
        assert_eq!(rules.match_note(&note, any_folder), Some(PREVIEW));
        assert_eq!(rules.problems().len(), 2);
    }

    #[test]
    fn empty_folder_path_is_the_vault_root() {
        let rules = RuleSet::compile(&settings(
            vec![FolderRule::new("", "obsidianUIMode: preview")],
            vec![],
        ));

        assert_eq!(
            rules.match_note(&NoteRef::new("Inbox.md"), any_folder),
            Some(PREVIEW)
        );
        assert_eq!(
            rules.match_note(&NoteRef::new("deep/down/note.md"), any_folder),
            Some(PREVIEW)
        );
    }

    #[test]
    fn root_folder_rule_matches_everything() {
        let rules = RuleSet::compile(&settings(
            vec![
                FolderRule::new("", "obsidianUIMode: source"),
                FolderRule::new("/", "obsidianUIMode: preview"),
            ],
            vec![],
        ));

        let note = NoteRef::new("Inbox.md");
        assert_eq!(rules.match_note(&note, any_folder), Some(PREVIEW));
    }
}
