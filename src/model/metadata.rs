use std::collections::BTreeMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde_yaml::{Mapping, Value};

/// Key/value pairs declared in a note's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteMetadata {
    entries: BTreeMap<String, String>,
}

impl NoteMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the leading `---` metadata block of a markdown document.
    ///
    /// The block is parsed as YAML and only top-level string values are kept.
    /// Nested maps, lists, numbers and booleans are skipped.
    pub fn from_markdown(text: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

        let mut block = String::new();
        let mut in_block = false;
        for event in Parser::new_ext(text, options) {
            match event {
                Event::Start(Tag::MetadataBlock(_)) => in_block = true,
                Event::End(TagEnd::MetadataBlock(_)) => break,
                Event::Text(chunk) if in_block => block.push_str(&chunk),
                // The block can only open the document.
                _ if !in_block => break,
                _ => {}
            }
        }

        Self {
            entries: scalar_entries(&block),
        }
    }
}

/// Top-level string values of a YAML mapping. Anything else is skipped.
fn scalar_entries(block: &str) -> BTreeMap<String, String> {
    if block.trim().is_empty() {
        return BTreeMap::new();
    }
    let mapping = match serde_yaml::from_str::<Mapping>(block) {
        Ok(mapping) => mapping,
        Err(err) => {
            tracing::warn!("unreadable frontmatter: {err}");
            return BTreeMap::new();
        }
    };

    mapping
        .into_iter()
        .filter_map(|(key, value)| match (key, value) {
            (Value::String(key), Value::String(value)) => Some((key, value)),
            _ => None,
        })
        .collect()
}
