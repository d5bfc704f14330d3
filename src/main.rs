//! Terminal Kung Fu Chess runner (default binary).
//!
//! Two players share the keyboard. The loop renders a snapshot, waits for
//! input until the next tick, and calls `Game::update` on a fixed timestep.
//!
//! Logs go to the file named by `KFCHESS_LOG_FILE` (the terminal is busy
//! drawing the board); `RUST_LOG` refines the default `kfchess=info` filter.

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kfchess::core::{Game, GameConfig};
use kfchess::events::{listener_fn, EventBus, EventKind, MovesLogger};
use kfchess::input::{map_key, should_quit};
use kfchess::term::{BoardView, Frame, TerminalRenderer};
use kfchess::types::TICK_MS;

/// Move-log lines shown under the board.
const LOG_LINES: usize = 5;

fn main() -> Result<()> {
    init_tracing()?;

    let config = GameConfig::from_env().context("reading KFCHESS_* configuration")?;
    tracing::info!(?config, "configuration loaded");

    let bus = Arc::new(EventBus::new());
    let moves = Arc::new(MovesLogger::new());
    bus.subscribe(moves.clone());
    bus.subscribe(Arc::new(listener_fn(EventKind::GameEnded, |event| {
        if let Some(game) = event.as_game() {
            tracing::info!("{}", game.message);
        }
        Ok(())
    })));

    let mut game = Game::standard(&config, bus)?;
    game.start();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game, &moves);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_tracing() -> Result<()> {
    let file_layer = match std::env::var_os("KFCHESS_LOG_FILE") {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(EnvFilter::from_default_env().add_directive("kfchess=info".parse()?))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, game: &mut Game, moves: &MovesLogger) -> Result<()> {
    let view = BoardView::new();
    let mut frame = Frame::new(0, 0);

    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        view.render(&game.snapshot(), &moves.recent(LOG_LINES), &mut frame);
        term.draw(&frame)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                    if let Some((player, action)) = map_key(key) {
                        game.apply_cursor_action(player, action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.update();
        }
    }
}
