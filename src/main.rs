use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use duel::chess::game::GameState;
use duel::interface::Session;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

/// Two players, one board: reads moves and commands from standard input.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Start from the given position in FEN instead of the standard one.
    #[arg(long)]
    fen: Option<String>,
    /// Maximum level of the log records to emit.
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
    /// Write the log into this file instead of the standard error.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    match &args.log_file {
        Some(path) => WriteLogger::init(args.log_level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(
            args.log_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    log::info!("logger initialized at level {}", args.log_level);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    duel::print_engine_info();
    duel::print_binary_info();

    let game = match &args.fen {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new(),
    };
    println!("{game}");

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Session::new(game, &mut input, &mut output).run()
}
