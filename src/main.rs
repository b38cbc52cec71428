mod app;
mod msg;

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use app::App;
use msg::Msg;
use view_mode_rules::AppConfig;

fn main() -> Result<()> {
    // Initialize logging to file (never stdout)
    let log_dir = directories::ProjectDirs::from("", "", "view-mode-rules")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "view-mode-rules.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "view_mode_rules=info".into()),
        )
        .init();

    tracing::info!("view-mode-rules starting");

    let config = AppConfig::load()?;

    if let Err(e) = run(config) {
        eprintln!("view-mode-rules error: {e:?}");
    }

    Ok(())
}

fn run(config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Msg>();
    let mut app = App::new(&config)?;

    // Input thread — one command per stdin line; EOF quits
    let tx_input = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx_input.send(Msg::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx_input.send(Msg::Quit);
    });

    // Tick thread — 50ms periodic tick for debounce checks
    let tx_tick = tx.clone();
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(50));
            if tx_tick.send(Msg::Tick).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    flush_output(&mut app, &mut stdout)?;

    // ── Main event loop ──
    loop {
        // Batch-drain all pending messages
        let first = rx.recv()?;
        app.update(first)?;

        while let Ok(msg) = rx.try_recv() {
            app.update(msg)?;
        }

        flush_output(&mut app, &mut stdout)?;

        if app.should_quit {
            break;
        }
    }

    tracing::info!("view-mode-rules stopping");
    Ok(())
}

fn flush_output(app: &mut App, stdout: &mut io::Stdout) -> Result<()> {
    for line in app.take_output() {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;
    Ok(())
}
