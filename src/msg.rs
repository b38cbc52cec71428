use view_mode_rules::DisplayState;

/// All possible messages that drive state transitions.
#[derive(Debug)]
pub enum Msg {
    // -- Input events (raw)
    Line(String),

    // -- Pane events
    OpenNote(String),
    OpenOther,
    Focus(usize),
    Close(usize),
    SetState(usize, DisplayState),

    // -- Queries
    ListPanes,
    Check,
    Sweep,
    Help,

    // -- System
    Tick,
    Quit,
}

impl Msg {
    /// Parse one line of driver input. Pane numbers are 1-based.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let rest = parts.next().map(str::trim).unwrap_or_default();

        let msg = match command {
            "open" if !rest.is_empty() => Msg::OpenNote(rest.to_string()),
            "open" => Msg::OpenOther,
            "focus" => Msg::Focus(pane_number(rest)?),
            "close" => Msg::Close(pane_number(rest)?),
            "view" => {
                let (pane, mode) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: view <pane> <preview|source|live>".to_string())?;
                let state = match mode.trim() {
                    "preview" => DisplayState::READING,
                    "source" => DisplayState::SOURCE,
                    "live" => DisplayState::LIVE,
                    other => return Err(format!("unknown mode: {other}")),
                };
                Msg::SetState(pane_number(pane)?, state)
            }
            "panes" | "ls" => Msg::ListPanes,
            "check" => Msg::Check,
            "sweep" => Msg::Sweep,
            "help" | "?" => Msg::Help,
            "quit" | "q" | "exit" => Msg::Quit,
            other => return Err(format!("unknown command: {other} (try help)")),
        };
        Ok(msg)
    }
}

fn pane_number(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("expected a pane number, got `{raw}`"))
}
