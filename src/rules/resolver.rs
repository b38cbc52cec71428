use crate::model::config::MetadataKeys;
use crate::model::metadata::NoteMetadata;
use crate::model::mode::{DisplayState, GlobalDefaults};
use crate::rules::directive::{Directive, ModeToken};

/// Precedence tier that produced a target state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Rule,
    Metadata,
    Default,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Rule => "rule",
            Tier::Metadata => "frontmatter",
            Tier::Default => "global default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub state: DisplayState,
    pub tier: Tier,
}

/// Inputs to a single resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub keys: &'a MetadataKeys,
    pub defaults: GlobalDefaults,
    /// Pane state before the pass; used for fields nothing else decides.
    pub current: DisplayState,
    pub force_default: bool,
}

/// Compute the target state for a note.
///
/// First applicable tier wins: matched rule directive, then frontmatter keys, then
/// the global default. `None` means nothing should be forced.
pub fn resolve(
    directive: Option<Directive>,
    metadata: &NoteMetadata,
    ctx: &ResolveContext<'_>,
) -> Option<Resolution> {
    if let Some(directive) = directive {
        return Some(Resolution {
            state: directive.display_state(),
            tier: Tier::Rule,
        });
    }

    if let Some(state) = from_metadata(metadata, ctx) {
        return Some(Resolution {
            state,
            tier: Tier::Metadata,
        });
    }

    ctx.force_default.then(|| Resolution {
        state: ctx.defaults.display_state(),
        tier: Tier::Default,
    })
}

fn from_metadata(metadata: &NoteMetadata, ctx: &ResolveContext<'_>) -> Option<DisplayState> {
    let view = metadata
        .get(&ctx.keys.view_mode)
        .and_then(ModeToken::parse)
        .map(|token| token.view_mode());
    let source = metadata
        .get(&ctx.keys.editing_mode)
        .and_then(ModeToken::parse)
        .and_then(|token| token.source_flag());

    if view.is_none() && source.is_none() {
        return None;
    }

    let mut state = if ctx.force_default {
        ctx.defaults.display_state()
    } else {
        ctx.current
    };
    // Applied in order; a declared editing mode overrides what the view key implies.
    if let Some(view_mode) = view {
        state.view_mode = view_mode;
        state.source = false;
    }
    if let Some(source) = source {
        state.source = source;
    }
    Some(state)
}
