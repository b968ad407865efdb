//! # Game of Life on a torus
//!
//! A terminal implementation of Conway's Game of Life using `ratatui` for the
//! interface and `crossterm` for terminal control and input.
//!
//! ## Features
//!
//! * Toroidal grid: opposite edges are adjacent
//! * Click a cell to toggle it
//! * Adjustable speed, pause and single stepping
//! * Live statistics and memory monitoring

mod app;
mod config;
mod grid;
mod input;
mod mapper;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    panic,
    time::{Duration, Instant},
};

use app::{App, Flow, FrameInput};
use config::Cli;
use ui::Panes;

/// Target time per frame, about 60 fps.
const FRAME: Duration = Duration::from_millis(16);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Main entry point.
///
/// # Controls
///
/// * Space: Play/Pause the simulation
/// * Enter: Step forward one generation
/// * Up/Down: Slow down/Speed up
/// * Left click: Toggle a cell
/// * q/Esc: Quit the application
///
/// # Errors
///
/// Returns an error if terminal manipulation fails.
fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;
    info!(
        "starting {}x{} grid, delay {}ms, seed {:?}",
        cli.width, cli.height, cli.delay, cli.seed
    );

    install_panic_hook(|| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        );
    });
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &cli);
    if let Err(err) = restore_terminal(&mut terminal) {
        error!("failed to restore terminal: {err:#}");
        result?;
        return Err(err);
    }
    result
}

/// Runs `restore` before the previously installed panic hook, so a panic
/// message lands on a usable terminal instead of the alternate screen.
fn install_panic_hook<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("creating terminal")
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("disabling raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leaving alternate screen")?;
    terminal.show_cursor().context("showing cursor")?;
    Ok(())
}

fn run(terminal: &mut Term, cli: &Cli) -> Result<()> {
    let clock = Instant::now();
    let panes = Panes::split(terminal.size()?);
    let mut app = App::new(cli.initial_grid(), panes.window(), cli.delay, !cli.paused);
    info!("initial scale {}", app.scale());

    loop {
        let frame_start = Instant::now();
        let panes = Panes::split(terminal.size()?);
        let board = panes.board_inner();

        let mut commands = Vec::new();
        let mut timeout = FRAME;
        while event::poll(timeout)? {
            let event = event::read()?;
            commands.extend(input::command_for(&event, board));
            timeout = FRAME.saturating_sub(frame_start.elapsed());
        }

        let frame = FrameInput {
            window: panes.window(),
            now_ms: clock.elapsed().as_millis() as u64,
            commands,
        };
        if app.update(&frame) == Flow::Quit {
            info!("quit after {} generations", app.stats().generation);
            return Ok(());
        }

        terminal.draw(|f| ui::draw(f, &app))?;
    }
}
