mod input;
mod round;
mod screen;

use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use rand::Rng;
use simplelog::{ConfigBuilder, WriteLogger};

use sapper_core::{CellCount, Coord, GameConfig};

#[derive(Parser)]
#[command(name = "sapper", about = "Minesweeper for the terminal")]
struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = 10)]
    width: Coord,
    /// Board height in cells
    #[arg(long, default_value_t = 10)]
    height: Coord,
    /// Number of mines to place
    #[arg(long, default_value_t = 10)]
    mines: CellCount,
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Log to a file: the terminal itself is in raw mode while playing.
    let level = args.verbosity.log_level_filter();
    if level != log::LevelFilter::Off {
        let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
        if let Ok(log_file) = File::create("sapper.log") {
            let _ = WriteLogger::init(level, log_config, log_file);
        }
    }

    let config = GameConfig::new((args.width, args.height), args.mines)
        .context("invalid board configuration")?;
    log::info!(
        "starting: {}x{} board, {} mines",
        args.width,
        args.height,
        args.mines
    );

    let screen = Mutex::new(screen::Screen::new()?);
    loop {
        let seed: u64 = rand::rng().random();
        let score = round::run(config, seed, &screen)?;
        log::info!("round over after {} seconds", score);

        screen.lock().unwrap().prompt_new_game(score)?;
        if !input::confirm()? {
            break;
        }
    }
    Ok(())
}
