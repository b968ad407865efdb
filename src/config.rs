//! Command-line configuration and logger setup.

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use rand::{rngs::StdRng, SeedableRng};

use crate::app::{MAX_DELAY_MS, MIN_DELAY_MS};
use crate::grid::Grid;

/// Conway's Game of Life on a torus, in the terminal.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Grid width in cells.
    #[arg(short = 'W', long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub width: u32,

    /// Grid height in cells.
    #[arg(short = 'H', long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub height: u32,

    /// Initial delay between generations, in milliseconds.
    #[arg(short, long, default_value_t = 250, value_parser = clap::value_parser!(u64).range(MIN_DELAY_MS..=MAX_DELAY_MS))]
    pub delay: u64,

    /// Seed for the initial random fill. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with the simulation paused.
    #[arg(long)]
    pub paused: bool,

    /// Write log records to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Builds the starting generation, each cell alive with probability 1/2.
    pub fn initial_grid(&self) -> Grid {
        match self.seed {
            Some(seed) => Grid::random(self.width, self.height, &mut StdRng::seed_from_u64(seed)),
            None => Grid::random(self.width, self.height, &mut rand::thread_rng()),
        }
    }

    /// Sets up `env_logger`. The terminal belongs to the UI, so records only
    /// go to stderr when `RUST_LOG` asks for them explicitly.
    pub fn init_logging(&self) -> Result<()> {
        match &self.log_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot create log file {}", path.display()))?;
                env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                    .target(Target::Pipe(Box::new(file)))
                    .init();
            }
            None => {
                env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_classic_board() {
        let cli = Cli::try_parse_from(["life_torus"]).unwrap();
        assert_eq!((cli.width, cli.height, cli.delay), (32, 24, 250));
        assert!(!cli.paused);
        assert!(cli.seed.is_none());
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "life_torus", "-W", "10", "-H", "8", "--delay", "40", "--seed", "3", "--paused",
        ])
        .unwrap();
        assert_eq!((cli.width, cli.height, cli.delay), (10, 8, 40));
        assert_eq!(cli.seed, Some(3));
        assert!(cli.paused);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(Cli::try_parse_from(["life_torus", "--width", "0"]).is_err());
        assert!(Cli::try_parse_from(["life_torus", "--delay", "5000"]).is_err());
    }

    #[test]
    fn seeded_grids_repeat() {
        let cli = Cli::try_parse_from(["life_torus", "--seed", "11"]).unwrap();
        let a: Vec<bool> = cli.initial_grid().cells().map(|(_, alive)| alive).collect();
        let b: Vec<bool> = cli.initial_grid().cells().map(|(_, alive)| alive).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32 * 24);
    }
}
