use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::mode::GlobalDefaults;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub defaults: GlobalDefaults,
    #[serde(default)]
    pub keys: MetadataKeys,
    #[serde(default)]
    pub rules: Settings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub vault_path: String,
}

/// Frontmatter keys that declare a note's modes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataKeys {
    /// Values: `source`, `preview`, `live`.
    pub view_mode: String,
    /// Values: `source`, `live`.
    pub editing_mode: String,
}

impl Default for MetadataKeys {
    fn default() -> Self {
        Self {
            view_mode: "obsidianUIMode".to_string(),
            editing_mode: "obsidianEditingMode".to_string(),
        }
    }
}

/// User rules and forcing policy consumed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debounce_ms: u64,
    /// Skip notes that were already showing in some pane.
    pub suppress_already_open: bool,
    /// Leave notes alone when no rule or frontmatter key applies.
    pub suppress_global_default: bool,
    pub folders: Vec<FolderRule>,
    pub files: Vec<FileRule>,
    #[serde(skip)]
    pub keys: MetadataKeys,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            suppress_already_open: false,
            suppress_global_default: false,
            folders: Vec::new(),
            files: Vec::new(),
            keys: MetadataKeys::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FolderRule {
    pub path: String,
    pub directive: String,
}

impl FolderRule {
    pub fn new(path: impl Into<String>, directive: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            directive: directive.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRule {
    pub pattern: String,
    pub directive: String,
}

impl FileRule {
    pub fn new(pattern: impl Into<String>, directive: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            directive: directive.into(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let user_path = directories::ProjectDirs::from("", "", "view-mode-rules")
            .map(|dirs| dirs.config_dir().join("config.toml"));
        Self::load_from(user_path.as_deref())
    }

    /// Same as [`AppConfig::load`] with an explicit user config location.
    pub fn load_from(user_path: Option<&Path>) -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        let mut config = Self::parse(defaults)?;

        if let Some(config_path) = user_path
            && config_path.exists()
        {
            let user_str = fs::read_to_string(config_path)?;
            config = Self::parse(&user_str)
                .map_err(|e| anyhow!("{}: {e}", config_path.display()))?;
            tracing::info!("loaded config from {}", config_path.display());
        }

        // Expand ~ in vault_path
        if config.general.vault_path.starts_with('~') {
            let home = dirs_home().ok_or_else(|| anyhow!("cannot determine home directory"))?;
            config.general.vault_path =
                config
                    .general
                    .vault_path
                    .replacen('~', &home.to_string_lossy(), 1);
        }

        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(raw)?;
        config.rules.keys = config.keys.clone();
        Ok(config)
    }

    pub fn vault_path(&self) -> PathBuf {
        PathBuf::from(&self.general.vault_path)
    }

    pub fn settings(&self) -> Settings {
        self.rules.clone()
    }
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mode::ViewMode;

    #[test]
    fn bundled_defaults_parse() {
        let config = AppConfig::parse(include_str!("../../config/default.toml")).unwrap();

        assert_eq!(config.rules.debounce_ms, 300);
        assert!(!config.rules.suppress_already_open);
        assert!(config.rules.folders.is_empty());
        assert_eq!(config.defaults.view_mode, ViewMode::Editing);
        assert!(config.defaults.live_preview);
        assert_eq!(config.rules.keys.view_mode, "obsidianUIMode");
    }

    #[test]
    fn rules_keep_list_order_and_custom_keys() {
        let raw = r#"
[general]
vault_path = "/vault"

[keys]
view_mode = "view"
editing_mode = "editing"

[rules]
debounce_ms = 0

[[rules.folders]]
path = "notes"
directive = "view: preview"

[[rules.folders]]
path = "notes/drafts"
directive = "default"

[[rules.files]]
pattern = "^Untitled"
directive = "editing: source"
"#;
        let config = AppConfig::parse(raw).unwrap();
        let settings = config.settings();

        assert_eq!(settings.debounce_ms, 0);
        assert_eq!(
            settings.folders,
            vec![
                FolderRule::new("notes", "view: preview"),
                FolderRule::new("notes/drafts", "default"),
            ]
        );
        assert_eq!(settings.files[0].pattern, "^Untitled");
        assert_eq!(settings.keys.editing_mode, "editing");
        assert!(!settings.suppress_global_default);
    }

    #[test]
    fn user_file_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[general]\nvault_path = \"/elsewhere\"\n[rules]\nsuppress_already_open = true\n",
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.vault_path(), PathBuf::from("/elsewhere"));
        assert!(config.rules.suppress_already_open);
        assert_eq!(config.rules.debounce_ms, 300);
    }
}
