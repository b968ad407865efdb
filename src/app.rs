//! Per-frame application state: the grid, its viewport, pacing and statistics.

use log::{debug, info};
use sysinfo::{System, SystemExt};

use crate::grid::{Grid, Size, StepSummary};
use crate::mapper::Viewport;

pub const MIN_DELAY_MS: u64 = 1;
pub const MAX_DELAY_MS: u64 = 2000;

/// A discrete request from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flip the cell under a window pixel.
    ToggleAt { px: u32, py: u32 },
    /// Advance one generation now, paused or not.
    Step,
    TogglePause,
    /// Shorten the step delay.
    Faster,
    /// Lengthen the step delay.
    Slower,
    Quit,
}

/// Everything the platform layer hands over for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub window: Size,
    /// Monotonic clock in milliseconds.
    pub now_ms: u64,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Stores statistics about the simulation.
#[derive(Debug, Default)]
pub struct Stats {
    /// Current generation number
    pub generation: u64,
    /// Total number of cells born since start
    pub cells_created: u64,
    /// Total number of cells that died since start
    pub cells_destroyed: u64,
    /// Current number of living cells
    pub current_population: u64,
}

impl Stats {
    fn record(&mut self, summary: StepSummary, population: usize) {
        self.generation += 1;
        self.cells_created += summary.births;
        self.cells_destroyed += summary.deaths;
        self.current_population = population as u64;
    }

    pub fn birth_rate(&self) -> f64 {
        self.cells_created as f64 / self.generation.max(1) as f64
    }

    pub fn death_rate(&self) -> f64 {
        self.cells_destroyed as f64 / self.generation.max(1) as f64
    }
}

/// Main application state container.
#[derive(Debug)]
pub struct App {
    grid: Grid,
    viewport: Viewport,
    running: bool,
    delay_ms: u64,
    next_step_ms: u64,
    stats: Stats,
    /// System information for resource monitoring
    sys: System,
}

impl App {
    /// Creates the application around an initial grid.
    ///
    /// # Arguments
    ///
    /// * `grid` - The starting generation
    /// * `window` - Board size in pixels, used for the initial scale
    /// * `delay_ms` - Time between generations, clamped to the allowed range
    /// * `running` - Whether the simulation starts unpaused
    ///
    /// # Returns
    ///
    /// A new `App` at generation zero.
    pub fn new(grid: Grid, window: Size, delay_ms: u64, running: bool) -> App {
        let viewport = Viewport::new(grid.size(), window);
        let mut sys = System::new();
        sys.refresh_memory();
        let stats = Stats {
            current_population: grid.population() as u64,
            ..Stats::default()
        };
        App {
            grid,
            viewport,
            running,
            delay_ms: delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS),
            next_step_ms: 0,
            stats,
            sys,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scale(&self) -> u32 {
        self.viewport.scale()
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Used and total system memory in KB, as of the last step.
    pub fn memory_kb(&self) -> (u64, u64) {
        (self.sys.used_memory() / 1024, self.sys.total_memory() / 1024)
    }

    /// Applies one frame of input and advances the simulation when due.
    ///
    /// # Arguments
    ///
    /// * `input` - Window size, clock and commands collected this frame
    ///
    /// # Returns
    ///
    /// `Flow::Quit` as soon as a quit command is seen, `Flow::Continue` otherwise.
    pub fn update(&mut self, input: &FrameInput) -> Flow {
        if self.viewport.resize(self.grid.size(), input.window) {
            info!(
                "window resized to {}x{}, scale {}",
                self.viewport.window().width,
                self.viewport.window().height,
                self.viewport.scale()
            );
        }

        let mut step_requested = false;
        for &command in &input.commands {
            match command {
                Command::Quit => return Flow::Quit,
                Command::TogglePause => self.toggle_running(),
                Command::ToggleAt { px, py } => {
                    self.click(px, py);
                }
                Command::Faster => self.faster(),
                Command::Slower => self.slower(),
                Command::Step => {
                    step_requested = true;
                    self.next_step_ms = 0;
                }
            }
        }

        if (self.running || step_requested) && input.now_ms > self.next_step_ms {
            self.step();
            self.next_step_ms = input.now_ms + self.delay_ms;
        }
        Flow::Continue
    }

    fn step(&mut self) {
        let summary = self.grid.step();
        self.stats.record(summary, self.grid.population());
        self.sys.refresh_memory();
    }

    /// Toggles the simulation between running and paused states.
    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        debug!("{}", if self.running { "resumed" } else { "paused" });
    }

    /// Flips the cell under a window pixel. Returns whether a cell changed.
    pub fn click(&mut self, px: u32, py: u32) -> bool {
        let Some(cell) = self.viewport.cell_at(px, py).filter(|&c| self.grid.toggle(c)) else {
            debug!("click at ({px},{py}) is outside the grid");
            return false;
        };
        self.stats.current_population = self.grid.population() as u64;
        debug!(
            "cell ({},{}) is now {}",
            cell.x,
            cell.y,
            if self.grid.get(cell) == Some(true) { "alive" } else { "dead" }
        );
        true
    }

    pub fn faster(&mut self) {
        self.delay_ms = (self.delay_ms - (self.delay_ms / 4).max(1)).max(MIN_DELAY_MS);
        debug!("step delay {}ms", self.delay_ms);
    }

    pub fn slower(&mut self) {
        self.delay_ms = (self.delay_ms + (self.delay_ms / 4).max(1)).min(MAX_DELAY_MS);
        debug!("step delay {}ms", self.delay_ms);
    }
}
