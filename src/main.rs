use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use rough_steps::{
    canvas::CellCanvas,
    config::{self, PlayerConfig},
    deck::{Deck, builtin},
    input::InputMapper,
    player::Player,
    position::{MemoryPublisher, UrlStatePublisher, parse_step_query},
    sequencer::Sequencer,
    surface::Recording,
    types::Seed,
};

#[derive(Parser)]
#[command(name = "rough-steps", version, about = "Step through hand-drawn sketches in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a deck interactively.
    Play {
        #[command(flatten)]
        source: Source,
        /// URL whose `step` parameter picks the starting position.
        #[arg(long)]
        url: Option<String>,
        /// File the current position URL is written to.
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Print the canvas at a given step as plain text.
    Render {
        #[command(flatten)]
        source: Source,
    },
    /// Write the surface calls made to reach a step as JSON.
    Trace {
        #[command(flatten)]
        source: Source,
        /// Output file; stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Source {
    /// Deck file (JSON). The built-in deck is used when absent.
    deck: Option<PathBuf>,
    /// Step to start at.
    #[arg(long)]
    step: Option<usize>,
    /// Base seed for the stroke style; random when absent.
    #[arg(long)]
    seed: Option<Seed>,
}

impl Source {
    fn deck(&self) -> Result<Deck> {
        match &self.deck {
            Some(path) => Deck::load(path),
            None => Ok(builtin::git_areas()),
        }
    }

    fn seed(&self) -> Seed {
        // Same range the browser build used: [0, 2^31).
        self.seed
            .unwrap_or_else(|| rand::random_range(0..(1 << 31)))
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Play { source, url, state } => {
            init_file_logging()?;
            play(&source, url.as_deref(), state)
        }
        Command::Render { source } => {
            init_stderr_logging();
            render(&source)
        }
        Command::Trace { source, output } => {
            init_stderr_logging();
            trace(&source, output)
        }
    }
}

fn play(source: &Source, url: Option<&str>, state: Option<PathBuf>) -> Result<()> {
    let deck = source.deck()?;
    let config = PlayerConfig::load();

    let from_url = match url.map(parse_step_query).transpose() {
        Ok(step) => step.flatten(),
        Err(e) => {
            warn!("{e}, starting at step 0");
            Some(0)
        }
    };
    let explicit = source.step.or(from_url);
    let base_url = url.unwrap_or(&config.base_url);
    let state_path = state.unwrap_or_else(config::default_state_path);
    let publisher = UrlStatePublisher::new(base_url, state_path, explicit);

    let sequencer = Sequencer::new(
        deck.catalog(),
        CellCanvas::new(deck.width, deck.height),
        publisher,
        source.seed(),
    );
    let mut player = Player::new(sequencer, InputMapper::new(config.key_bindings));
    player.play()?;

    let seq = player.sequencer();
    eprintln!(
        "Stopped at step {}/{}: {}",
        seq.cursor(),
        seq.len(),
        seq.publisher().current_url(seq.cursor()),
    );
    Ok(())
}

fn render(source: &Source) -> Result<()> {
    let deck = source.deck()?;
    let mut sequencer = Sequencer::new(
        deck.catalog(),
        CellCanvas::new(deck.width, deck.height),
        MemoryPublisher::starting_at(source.step),
        source.seed(),
    );
    sequencer.resume()?;
    print!("{}", sequencer.surface().to_text());
    Ok(())
}

fn trace(source: &Source, output: Option<PathBuf>) -> Result<()> {
    let deck = source.deck()?;
    let mut sequencer = Sequencer::new(
        deck.catalog(),
        Recording::new(),
        MemoryPublisher::starting_at(source.step),
        source.seed(),
    );
    let reached = sequencer.resume()?;
    let json = serde_json::to_string_pretty(sequencer.surface().calls())?;

    match output {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Traced {} calls up to step {} -> {}",
                sequencer.surface().calls().len(),
                reached,
                path.display(),
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// `RUST_LOG` when set and valid, `warn` otherwise.
fn env_log_filter() -> tracing_subscriber::EnvFilter {
    let directives = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    config::log_filter(directives.as_deref())
}

/// Log to a file so the full-screen player is not disturbed.
fn init_file_logging() -> Result<()> {
    let log_path = config::log_file_path();
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_log_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_log_filter())
        .with_writer(std::io::stderr)
        .init();
}
