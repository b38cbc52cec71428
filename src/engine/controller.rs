use std::time::{Duration, Instant};

use crate::engine::debounce::Debouncer;
use crate::engine::host::{Host, PaneId};
use crate::engine::reconciler::{PassOutcome, run_pass};
use crate::engine::registry::OpenNotes;
use crate::model::config::Settings;
use crate::rules::RuleSet;

/// Drives resolution passes from host pane events.
///
/// Owns the compiled rules, the open-notes registry and the pending debounced
/// event. All methods run on the host's event thread.
#[derive(Debug)]
pub struct Controller {
    settings: Settings,
    rules: RuleSet,
    registry: OpenNotes,
    debounce: Debouncer<Option<PaneId>>,
}

impl Controller {
    pub fn new(settings: Settings) -> Self {
        let rules = RuleSet::compile(&settings);
        for problem in rules.problems() {
            tracing::warn!("{problem}");
        }
        let debounce = Debouncer::new(Duration::from_millis(settings.debounce_ms));
        Self {
            settings,
            rules,
            registry: OpenNotes::default(),
            debounce,
        }
    }

    /// Take a first inventory of the host's open notes.
    pub fn attach<H: Host + ?Sized>(&mut self, host: &H) {
        self.registry.rebuild(host);
        for problem in self.rules.check_folders(|folder| host.folder_exists(folder)) {
            tracing::warn!("{problem}");
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn registry(&self) -> &OpenNotes {
        &self.registry
    }

    pub fn has_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// The host focused `pane`. Resolves now when debouncing is off, otherwise
    /// replaces any pending event and waits for [`Controller::tick`].
    pub fn on_active_pane_changed<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        pane: Option<PaneId>,
        now: Instant,
    ) -> Option<PassOutcome> {
        if self.debounce.is_immediate() {
            return Some(self.run(host, pane));
        }
        self.debounce.schedule(now, pane);
        None
    }

    /// Fire the pending event once its window has elapsed. Returns the pane the
    /// last event carried along with the pass outcome.
    pub fn tick<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        now: Instant,
    ) -> Option<(Option<PaneId>, PassOutcome)> {
        let pane = self.debounce.poll(now)?;
        Some((pane, self.run(host, pane)))
    }

    /// Run a pass for `pane` right away, bypassing the debounce.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H, pane: Option<PaneId>) -> PassOutcome {
        let outcome = run_pass(host, pane, &self.rules, &self.settings, &mut self.registry);
        tracing::debug!("pass finished: {outcome:?}");
        outcome
    }

    pub fn on_pane_closed<H: Host + ?Sized>(&mut self, host: &H) {
        self.sweep(host);
    }

    /// Rescan the host's panes for open notes.
    pub fn sweep<H: Host + ?Sized>(&mut self, host: &H) {
        self.registry.rebuild(host);
    }

    /// Swap in new settings. Later events use the new delay; a pending event keeps
    /// its deadline.
    pub fn update_settings<H: Host + ?Sized>(&mut self, host: &H, settings: Settings) {
        self.rules = RuleSet::compile(&settings);
        for problem in self.rules.problems() {
            tracing::warn!("{problem}");
        }
        self.debounce
            .set_delay(Duration::from_millis(settings.debounce_ms));
        self.settings = settings;
        self.registry.rebuild(host);
        tracing::info!(
            "settings updated: debounce {}ms, suppress open {}, suppress default {}",
            self.settings.debounce_ms,
            self.settings.suppress_already_open,
            self.settings.suppress_global_default
        );
    }
}
