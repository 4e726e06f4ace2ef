mod term;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use crossterm::terminal;
use rand::thread_rng;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

use invaders::config::{Config, LOG_FILTER_VAR};
use invaders::persist::FileScoreStore;
use invaders::platform::SystemClock;
use invaders::GameSession;

use term::{TerminalAssets, TerminalAudio, TerminalInput, TerminalRenderer};

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game while it runs, so logs go to a file.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// One frame per iteration: input, update, render, then sleep off whatever
/// is left of the frame budget.
fn run<W: Write>(out: &mut W, config: &Config) -> anyhow::Result<()> {
    let store = match &config.score_file {
        Some(path) => FileScoreStore::new(path),
        None => FileScoreStore::at_default_location(),
    };
    info!(path = ?store.path(), "high score file");

    let mut session = GameSession::new(
        config,
        &mut TerminalAssets,
        Box::new(TerminalAudio::default()),
        Box::new(SystemClock::new()),
        Box::new(store),
        thread_rng(),
    )
    .context("failed to load game assets")?;

    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(cols, rows, config.screen_width, config.screen_height);
    let mut input = TerminalInput::new(term::spawn_event_reader());
    let frame = config.frame_duration();

    while !session.should_quit() {
        let frame_start = Instant::now();

        input.poll();
        if let Some((cols, rows)) = input.take_resize() {
            renderer.resize(cols, rows);
        }

        session.handle_input(&input);
        session.update();
        session.render(&mut renderer);
        renderer.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }

    info!(score = session.score, high_score = session.high_score, "quit");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_logging(&config)?;

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = term::enter(&mut out)?;

    let result = run(&mut out, &config);

    term::leave(&mut out, keyboard_enhanced);

    if let Err(err) = &result {
        error!("{err:#}");
    }
    result
}
