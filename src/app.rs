use std::time::Instant;

use anyhow::Result;
use view_mode_rules::rules::Directive;
use view_mode_rules::{AppConfig, Controller, Host, PaneId, PassOutcome, Workspace};

use crate::msg::Msg;

/// Headless host: a vault-backed workspace driven by text commands.
pub struct App {
    workspace: Workspace,
    controller: Controller,
    pub should_quit: bool,
    output: Vec<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let vault_path = config.vault_path();
        let workspace = if vault_path.is_dir() {
            Workspace::from_vault(&vault_path, config.defaults)?
        } else {
            tracing::warn!("vault {} not found, starting empty", vault_path.display());
            Workspace::new(config.defaults)
        };

        let mut controller = Controller::new(config.settings());
        controller.attach(&workspace);

        let output = vec![format!(
            "vault {}: {} notes (type help for commands)",
            vault_path.display(),
            workspace.note_count()
        )];

        Ok(Self {
            workspace,
            controller,
            should_quit: false,
            output,
        })
    }

    /// Lines produced since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Line(line) => {
                if line.trim().is_empty() {
                    return Ok(());
                }
                match Msg::parse(&line) {
                    Ok(msg) => self.update(msg)?,
                    Err(err) => self.output.push(err),
                }
            }
            Msg::OpenNote(path) => {
                let pane = self.workspace.open_note(path);
                self.focus_changed(Some(pane));
            }
            Msg::OpenOther => {
                let pane = self.workspace.open_other();
                self.focus_changed(Some(pane));
            }
            Msg::Focus(index) => match self.workspace.pane_at(index) {
                Some(pane) => {
                    self.workspace.focus(pane);
                    self.focus_changed(Some(pane));
                }
                None => self.output.push(format!("no pane {}", index + 1)),
            },
            Msg::Close(index) => match self.workspace.pane_at(index) {
                Some(pane) => {
                    self.workspace.close(pane);
                    self.controller.on_pane_closed(&self.workspace);
                    let active = self.workspace.active_pane();
                    self.focus_changed(active);
                }
                None => self.output.push(format!("no pane {}", index + 1)),
            },
            Msg::SetState(index, state) => match self.workspace.pane_at(index) {
                Some(pane) => {
                    self.workspace.set_state(pane, state);
                    self.list_panes();
                }
                None => self.output.push(format!("no pane {}", index + 1)),
            },
            Msg::ListPanes => self.list_panes(),
            Msg::Check => self.check(),
            Msg::Sweep => {
                self.controller.sweep(&self.workspace);
                self.output.push(format!(
                    "open notes: {}",
                    self.controller.registry().len()
                ));
            }
            Msg::Help => self.help(),
            Msg::Tick => self.handle_tick(),
            Msg::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn focus_changed(&mut self, pane: Option<PaneId>) {
        if let Some(outcome) =
            self.controller
                .on_active_pane_changed(&mut self.workspace, pane, Instant::now())
        {
            self.report(pane, outcome);
        }
    }

    fn handle_tick(&mut self) {
        if let Some((pane, outcome)) = self.controller.tick(&mut self.workspace, Instant::now()) {
            self.report(pane, outcome);
        }
    }

    fn report(&mut self, pane: Option<PaneId>, outcome: PassOutcome) {
        let label = pane
            .and_then(|id| self.workspace.pane_view(id))
            .map(|view| format!("{} [{}]", view.note, view.state.label()))
            .unwrap_or_else(|| "(no note)".to_string());

        let line = match outcome {
            PassOutcome::NotANote => return,
            PassOutcome::AlreadyOpen => format!("{label}: already open, left alone"),
            PassOutcome::NotForced => format!("{label}: nothing to force"),
            PassOutcome::Unchanged(tier) => format!("{label}: already matches {}", tier.label()),
            PassOutcome::Applied(tier) => format!("{label}: forced by {}", tier.label()),
            PassOutcome::WriteFailed(tier) => format!("{label}: {} write failed", tier.label()),
        };
        self.output.push(line);
    }

    fn list_panes(&mut self) {
        let active = self.workspace.active_pane();
        let rows: Vec<String> = self
            .workspace
            .panes()
            .enumerate()
            .map(|(index, (id, pane))| {
                let marker = if Some(id) == active { "*" } else { " " };
                let note = pane
                    .note
                    .as_ref()
                    .map(|note| note.to_string())
                    .unwrap_or_else(|| "(other view)".to_string());
                format!("{marker}{:>3} {note} [{}]", index + 1, pane.state.label())
            })
            .collect();

        if rows.is_empty() {
            self.output.push("no panes open".to_string());
        } else {
            self.output.extend(rows);
        }
    }

    fn check(&mut self) {
        let rules = self.controller.rules();
        let mut problems: Vec<String> = rules.problems().iter().map(|p| p.to_string()).collect();
        problems.extend(
            rules
                .check_folders(|folder| self.workspace.folder_exists(folder))
                .iter()
                .map(|p| p.to_string()),
        );

        if problems.is_empty() {
            self.output.push("rules: no problems".to_string());
        } else {
            self.output.extend(problems);
        }

        let keys = &self.controller.settings().keys;
        self.output.push(format!(
            "directives: {}",
            Directive::choices(keys).join(" | ")
        ));
    }

    fn help(&mut self) {
        self.output.extend(
            [
                "open <note path>                  open a note in a new pane",
                "open                              open a non-note pane",
                "focus <n> | close <n>             focus or close pane n",
                "view <n> <preview|source|live>    change pane n by hand",
                "panes | sweep | check | quit",
            ]
            .map(String::from),
        );
    }
}
