use crate::engine::host::{Host, PaneId};
use crate::engine::registry::OpenNotes;
use crate::error::HostError;
use crate::model::config::Settings;
use crate::model::metadata::NoteMetadata;
use crate::model::mode::DisplayState;
use crate::rules::{ResolveContext, RuleSet, Tier, resolve};

/// What one resolution pass did to its pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// No pane, a closed pane, or a pane without a note.
    NotANote,
    /// Suppressed because the note was already showing somewhere.
    AlreadyOpen,
    /// No tier wanted to force anything.
    NotForced,
    /// Target already matched the pane.
    Unchanged(Tier),
    Applied(Tier),
    WriteFailed(Tier),
}

/// Write `target` to the pane unless it already shows it.
pub fn reconcile<H: Host + ?Sized>(
    host: &mut H,
    pane: PaneId,
    current: DisplayState,
    target: DisplayState,
) -> Result<bool, HostError> {
    if current == target {
        return Ok(false);
    }
    host.write_display_state(pane, target)?;
    Ok(true)
}

/// Resolve and apply the target state for `pane`.
///
/// `registry` is read before resolving and rescanned afterwards whenever
/// suppression of already-open notes is on. Host failures end the pass.
pub fn run_pass<H: Host + ?Sized>(
    host: &mut H,
    pane: Option<PaneId>,
    rules: &RuleSet,
    settings: &Settings,
    registry: &mut OpenNotes,
) -> PassOutcome {
    let suppress = settings.suppress_already_open;

    let Some((pane, view)) = pane.and_then(|id| host.pane_view(id).map(|view| (id, view))) else {
        if suppress {
            registry.rebuild(&*host);
        }
        return PassOutcome::NotANote;
    };

    if suppress && registry.contains(&view.note) {
        tracing::debug!("{} already open, leaving its mode alone", view.note);
        registry.rebuild(&*host);
        return PassOutcome::AlreadyOpen;
    }

    let directive = rules.match_note(&view.note, |folder| host.folder_exists(folder));
    let metadata = if directive.is_some() {
        NoteMetadata::default()
    } else {
        host.note_metadata(&view.note)
    };
    let ctx = ResolveContext {
        keys: &settings.keys,
        defaults: host.global_defaults(),
        current: view.state,
        force_default: !settings.suppress_global_default,
    };

    let outcome = match resolve(directive, &metadata, &ctx) {
        None => PassOutcome::NotForced,
        Some(resolution) => match reconcile(host, pane, view.state, resolution.state) {
            Ok(true) => {
                tracing::info!(
                    "{}: {} -> {} ({})",
                    view.note,
                    view.state.label(),
                    resolution.state.label(),
                    resolution.tier.label()
                );
                PassOutcome::Applied(resolution.tier)
            }
            Ok(false) => PassOutcome::Unchanged(resolution.tier),
            Err(err) => {
                tracing::warn!("{}: could not set {}: {err}", view.note, resolution.state.label());
                return PassOutcome::WriteFailed(resolution.tier);
            }
        },
    };

    if suppress {
        registry.rebuild(&*host);
    }
    outcome
}
