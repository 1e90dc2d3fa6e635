//! Command-line front end for chess sessions.
//!
//! Games live in a SQLite database, keyed by a scope and a name, and are
//! addressed by name within the current scope.

mod commands;
mod config;
mod store;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::App;
use config::ChessConfig;
use store::Store;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Play chess games stored in a local database")]
struct Cli {
    /// Group of games to work in
    #[arg(short, long, default_value = "default")]
    scope: String,

    /// SQLite database, overriding the configured one
    #[arg(long)]
    db: Option<PathBuf>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a game; you play Black and your opponent moves first
    Start {
        /// Your player name
        me: String,
        /// Opponent's player name
        opponent: String,
        /// Game name, made unique within the scope
        #[arg(short, long)]
        name: Option<String>,
        /// Variant tag: standard, chess960 or chess960:<n>
        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Make a move in Standard Algebraic Notation
    Move {
        game: String,
        player: String,
        san: String,
    },
    /// Resign a game
    Resign { game: String, player: String },
    /// Draw related commands
    Draw {
        #[command(subcommand)]
        command: DrawCommands,
    },
    /// List games
    List {
        /// Include every scope
        #[arg(short, long)]
        all: bool,
    },
    /// Write the board of a game as PNG
    Show {
        game: String,
        /// Output file
        #[arg(short, long, default_value = "board.png")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum DrawCommands {
    /// Claim a draw: "Fifty moves" or "Threefold repetition"
    Claim {
        game: String,
        player: String,
        reason: String,
    },
    /// End the game as a draw both players agreed to
    Agree {
        game: String,
        player: String,
        opponent: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChessConfig::load_from(path),
        None => ChessConfig::load(),
    }
    .context("loading configuration")?;
    let db = cli.db.unwrap_or_else(|| config.database.clone());
    tracing::debug!("Database: {:?}", db);
    let store = Store::open(&db).with_context(|| format!("opening {}", db.display()))?;

    let app = App {
        store,
        config,
        scope: cli.scope,
    };

    let output = match cli.command {
        Commands::Start {
            me,
            opponent,
            name,
            variant,
        } => app.start(&me, &opponent, name.as_deref(), variant.as_deref()),
        Commands::Move { game, player, san } => app.play(&game, &player, &san),
        Commands::Resign { game, player } => app.resign(&game, &player),
        Commands::Draw { command } => match command {
            DrawCommands::Claim {
                game,
                player,
                reason,
            } => app.claim_draw(&game, &player, &reason),
            DrawCommands::Agree {
                game,
                player,
                opponent,
            } => app.agree_draw(&game, &player, &opponent),
        },
        Commands::List { all } => app.list(all),
        Commands::Show { game, out } => app.show(&game, &out),
    }?;

    println!("{}", output);
    Ok(())
}
