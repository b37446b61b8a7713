mod storage;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use daydeck_engine::{ActionKind, Card, CardsEngine, SystemClock, asset_key};
use log::debug;

use storage::{FileLoader, JsonFileStorage};

type Engine = CardsEngine<JsonFileStorage, SystemClock>;

#[derive(Debug, Parser)]
#[command(name = "daydeck", version)]
#[command(about = "Daily prompt cards: draws, journeys, favorites, and streaks")]
struct Args {
    /// Path to the card dataset JSON
    #[arg(long, default_value = "cards.json")]
    data: PathBuf,

    /// Directory for persisted engagement records (defaults to the
    /// platform data directory)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Selection RNG seed, for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the card of the day, pinning one if needed
    Today,
    /// Draw a fresh card and pin it as today's card
    Draw,
    /// List eligible journeys, or show one journey's cards
    Journeys {
        /// Journey name to expand
        name: Option<String>,
    },
    /// Show streak and engagement stats
    Stats,
    /// Toggle a favorite; defaults to today's card
    Favorite {
        /// Concept to toggle
        concept: Option<String>,
    },
    /// Commit to an action on today's card (0-based index)
    Commit { action_index: usize },
    /// List every card ever shown, oldest first
    History,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let state_dir = resolve_state_dir(args.state_dir);
    debug!("state dir: {}", state_dir.display());
    let storage = JsonFileStorage::open(&state_dir)
        .with_context(|| format!("cannot open state directory {}", state_dir.display()))?;
    let loader = FileLoader::new(&args.data);
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut engine = CardsEngine::new(&loader, storage, SystemClock, seed)
        .with_context(|| format!("failed to load cards from {}", args.data.display()))?;
    engine.record_visit_today()?;

    match args.command {
        Command::Today => {
            let card = engine.card_of_the_day()?;
            print_card(&engine, &card);
        }
        Command::Draw => {
            let card = engine.draw_new_card()?;
            println!("{}", "Fresh draw:".dimmed());
            print_card(&engine, &card);
        }
        Command::Journeys { name } => match name {
            Some(name) => show_journey(&mut engine, &name)?,
            None => list_journeys(&mut engine),
        },
        Command::Stats => show_stats(&engine),
        Command::Favorite { concept } => {
            let concept = match concept {
                Some(concept) => concept,
                None => engine.card_of_the_day()?.concept,
            };
            let favorited = engine.toggle_favorite(&concept)?;
            if favorited {
                println!("{} {}", "Favorited".yellow(), concept.bold());
            } else {
                println!("{} {}", "Unfavorited".dimmed(), concept);
            }
        }
        Command::Commit { action_index } => {
            let card = engine.card_of_the_day()?;
            let actions = card.actions();
            if action_index >= actions.len() {
                bail!(
                    "card '{}' has {} action(s); index {} is out of range",
                    card.concept,
                    actions.len(),
                    action_index
                );
            }
            engine.record_commitment_today(&card.concept, action_index)?;
            println!(
                "{} {} -> {}",
                "Committed:".green(),
                card.concept.bold(),
                actions[action_index].text
            );
        }
        Command::History => {
            for (position, concept) in engine.store().card_history().iter().enumerate() {
                println!("{:>4}  {concept}", position + 1);
            }
        }
    }

    Ok(())
}

fn resolve_state_dir(requested: Option<PathBuf>) -> PathBuf {
    requested.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daydeck")
    })
}

fn print_card(engine: &Engine, card: &Card) {
    println!();
    println!("  {}", card.concept.bold().cyan());
    if !card.journal_prompt.is_empty() {
        println!("  {}", card.journal_prompt.italic());
    }
    for (index, action) in card.actions().iter().enumerate() {
        let kind = match action.kind {
            ActionKind::Internal => "reflect",
            ActionKind::External => "reach out",
        };
        println!("  [{index}] {:<9} {}", kind.dimmed(), action.text);
    }
    if engine.store().is_favorite(&card.concept) {
        println!("  {}", "* favorited".yellow());
    }
    println!("  {} {}", "asset:".dimmed(), asset_key(&card.concept).dimmed());
    println!();
}

fn list_journeys(engine: &mut Engine) {
    let summaries: Vec<(String, usize)> = engine
        .eligible_journeys()
        .into_iter()
        .map(|journey| (journey.name, journey.count))
        .collect();
    if summaries.is_empty() {
        println!("No journeys yet: every theme is below the card threshold.");
        return;
    }
    for (name, count) in summaries {
        let preview = engine
            .journey_preview(&name)
            .map(|card| card.concept)
            .unwrap_or_default();
        println!(
            "{:<24} {:>3} cards   {} {}",
            name.bold(),
            count,
            "e.g.".dimmed(),
            preview
        );
    }
}

fn show_journey(engine: &mut Engine, name: &str) -> Result<()> {
    let eligible = engine
        .eligible_journeys()
        .iter()
        .any(|journey| journey.name == name);
    if !eligible {
        bail!("no journey named '{name}' (themes need more than a handful of cards)");
    }
    println!("{}", name.bold().cyan());
    for card in engine.journey_cards_shuffled(name) {
        println!("  - {}: {}", card.concept.bold(), card.journal_prompt);
    }
    Ok(())
}

fn show_stats(engine: &Engine) {
    let stats = engine.store().stats();
    println!("{:<14} {}", "Day streak:".bold(), engine.streak_today());
    println!("{:<14} {}", "Cards drawn:".bold(), stats.total_cards_drawn);
    println!(
        "{:<14} {}",
        "Favorites:".bold(),
        engine.store().favorites().len()
    );
    match stats.last_visit {
        Some(when) => println!("{:<14} {}", "Last visit:".bold(), when.to_rfc3339()),
        None => println!("{:<14} {}", "Last visit:".bold(), "never".dimmed()),
    }
}
