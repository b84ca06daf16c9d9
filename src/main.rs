//! Strictly Qwixx - CLI
//!
//! Plays Qwixx in the terminal between computer, human, and bad-actor players.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_qwixx::{
    BadActorPlayer, Board, ComputerPlayer, GameConfig, GameEvent, GameRunner, GameSummary,
    HumanPlayer, Outcome, Player, PlayerKind, PlayerSpec, TurnOutcome,
};
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Board => {
            println!("{}", Board::new());
            Ok(())
        }
        Command::Play {
            config,
            seed,
            players,
            human,
            bad_actor,
            json,
        } => {
            let config = build_config(config, seed, players, human, bad_actor)?;
            run_game(config, json).await
        }
    }
}

/// Merges the config file (or defaults) with command-line overrides.
#[instrument]
fn build_config(
    path: Option<std::path::PathBuf>,
    seed: Option<u64>,
    players: Vec<String>,
    human: Option<String>,
    bad_actor: Option<String>,
) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if seed.is_some() {
        config = config.with_seed(seed);
    }

    let mut seats = if players.is_empty() {
        config.players().clone()
    } else {
        players
            .into_iter()
            .map(|name| PlayerSpec::new(name, PlayerKind::Computer))
            .collect()
    };
    if let Some(name) = human {
        seats.push(PlayerSpec::new(name, PlayerKind::Human));
    }
    if let Some(name) = bad_actor {
        seats.push(PlayerSpec::new(name, PlayerKind::BadActor));
    }
    let config = config.with_players(seats);
    config.validate()?;
    Ok(config)
}

/// Builds the players, runs the game, and prints the result.
#[instrument(skip(config), fields(players = config.players().len(), seed = ?config.seed()))]
async fn run_game(config: GameConfig, json: bool) -> Result<()> {
    let humans = config
        .players()
        .iter()
        .filter(|p| *p.kind() == PlayerKind::Human)
        .count();
    anyhow::ensure!(humans <= 1, "Only one human player can read from stdin");

    let mut players: Vec<Box<dyn Player>> = Vec::with_capacity(config.players().len());
    for spec in config.players() {
        let player: Box<dyn Player> = match spec.kind() {
            PlayerKind::Computer => Box::new(ComputerPlayer::new(spec.name().clone())),
            PlayerKind::BadActor => Box::new(BadActorPlayer::new(spec.name().clone())),
            PlayerKind::Human => Box::new(spawn_human(spec.name().clone())),
        };
        players.push(player);
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(render_events(event_rx, json));

    info!("Starting game");
    let summary = GameRunner::new(players, *config.rules(), *config.seed())
        .with_events(event_tx)
        .run()
        .await?;
    renderer.await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Wires a human player to stdin and stdout.
fn spawn_human(name: String) -> HumanPlayer {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel::<String>();

    // plain thread: a pending stdin read must not hold the runtime open at exit
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
        debug!("Stdin closed");
    });
    tokio::spawn(async move {
        while let Some(prompt) = prompt_rx.recv().await {
            println!("{prompt}");
        }
    });

    HumanPlayer::new(name, input_rx, prompt_tx)
}

/// Prints the play-by-play.
async fn render_events(mut rx: mpsc::UnboundedReceiver<GameEvent>, quiet: bool) {
    while let Some(event) = rx.recv().await {
        if quiet {
            continue;
        }
        match event {
            GameEvent::PlayOrder(names) => println!("Play order: {}", names.join(", ")),
            GameEvent::TurnStarted { turn, player } => {
                println!("\n--- Turn {} - {}'s roll ---", turn + 1, player)
            }
            GameEvent::DiceRolled(roll) => println!("Dice: {roll}"),
            GameEvent::TurnPlayed {
                player,
                outcome: TurnOutcome::Applied(applied),
            } => {
                let moves: Vec<String> = applied.crossed.iter().map(ToString::to_string).collect();
                println!("{player} crossed {}", moves.join(" then "));
            }
            GameEvent::TurnPlayed { .. } => {}
            GameEvent::ProposalRejected {
                player,
                attempt,
                reason,
            } => println!("{player} proposed an invalid turn (attempt {attempt}): {reason}"),
            GameEvent::Penalty { player, total } => {
                println!("{player} took a penalty ({total} so far)")
            }
            GameEvent::RowLocked(color) => println!("The {color} row is locked!"),
            GameEvent::BoardChanged { player, board } => println!("{player}'s board:\n{board}"),
            GameEvent::GameOver(_) => println!("\nGAME OVER"),
        }
    }
}

fn print_summary(summary: &GameSummary) {
    println!(
        "Game ended after {} turns ({})",
        summary.turns_played(),
        summary.reason()
    );
    for player in summary.players() {
        println!(
            "  {:<12} score {:>3}  penalties {}",
            player.name(),
            player.score(),
            player.penalties()
        );
    }
    match summary.outcome() {
        Outcome::Winner(_) => println!("Winner: {}", summary.winner_names().join(", ")),
        Outcome::Tie(_) => println!("Tie between: {}", summary.winner_names().join(", ")),
    }
}
