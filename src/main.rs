//! Waystone command-line driver
//!
//! Loads a content directory and a character save, runs one operation, and
//! writes the save back.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use waystone::character::CharacterState;
use waystone::core::types::EffectId;
use waystone::effects::EffectMessage;
use waystone::time::{TravelOutcome, WaitDuration};
use waystone::{Engine, Result};

/// Drive a character's effects and time from the command line
#[derive(Parser, Debug)]
#[command(name = "waystone")]
#[command(about = "Advance time, apply effects and inspect a character save")]
struct Args {
    /// Content directory (effects/, skills/, engine.toml)
    #[arg(long, default_value = "data")]
    content: PathBuf,

    /// Character save file (JSON)
    #[arg(long, default_value = "character.json")]
    save: PathBuf,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a fresh character save
    New {
        name: String,
    },
    /// Let minutes of game time pass
    Advance {
        minutes: u32,
    },
    /// Wait in place (15 minutes to 6 hours)
    Wait {
        #[arg(long, conflicts_with = "hours", required_unless_present = "hours")]
        minutes: Option<u32>,
        #[arg(long)]
        hours: Option<u32>,
    },
    /// Sleep until morning
    Sleep,
    /// Apply a named effect
    Apply {
        effect: String,
    },
    /// Remove every instance of a named effect
    Remove {
        effect: String,
    },
    /// Show the character and its active effects
    Show,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("waystone=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let engine = Engine::open(&args.content)?;
    let mut character = match &args.command {
        Command::New { name } => CharacterState::new(name.as_str()),
        _ => CharacterState::from_json(&std::fs::read_to_string(&args.save)?)?,
    };

    match &args.command {
        Command::New { name } => {
            tracing::info!("Created {} at {}", name, args.save.display());
        }
        Command::Advance { minutes } => {
            let messages = engine.advance(&mut character, *minutes);
            print_messages(args, &messages)?;
            report_travel(args, engine.advance_travel(&mut character, *minutes))?;
        }
        Command::Wait { minutes, hours } => {
            let duration = match (minutes, hours) {
                (Some(minutes), _) => WaitDuration::Minutes(*minutes),
                (None, Some(hours)) => WaitDuration::Hours(*hours),
                (None, None) => WaitDuration::Minutes(0),
            };
            let messages = engine.wait(&mut character, duration)?;
            print_messages(args, &messages)?;
            report_travel(args, engine.advance_travel(&mut character, duration.as_minutes()))?;
        }
        Command::Sleep => {
            let report = engine.sleep(&mut character);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_messages(args, &report.messages)?;
                println!(
                    "Slept {}h{:02}m, woke {} (fatigue -{}, hunger -{})",
                    report.minutes_slept / 60,
                    report.minutes_slept % 60,
                    report.woke_at,
                    report.fatigue_recovered,
                    report.hunger_spent
                );
            }
        }
        Command::Apply { effect } => {
            let message = engine.apply_effect(&mut character, &EffectId::from(effect.as_str()))?;
            let mut messages = vec![message];
            messages.extend(engine.resolve_encumbrance(&mut character)?);
            messages.retain(EffectMessage::is_visible);
            print_messages(args, &messages)?;
        }
        Command::Remove { effect } => {
            let removed = engine.remove_effect(&mut character, &EffectId::from(effect.as_str()));
            tracing::info!("Removed {} instance(s) of {}", removed, effect);
            let messages: Vec<EffectMessage> = engine
                .resolve_encumbrance(&mut character)?
                .into_iter()
                .filter(EffectMessage::is_visible)
                .collect();
            print_messages(args, &messages)?;
        }
        Command::Show => show(args, &engine, &character)?,
    }

    save(&args.save, &character)
}

fn save(path: &Path, character: &CharacterState) -> Result<()> {
    std::fs::write(path, character.to_json()?)?;
    Ok(())
}

fn print_messages(args: &Args, messages: &[EffectMessage]) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(messages)?);
    } else {
        for message in messages {
            println!("{}", message.text);
        }
    }
    Ok(())
}

fn report_travel(args: &Args, outcome: TravelOutcome) -> Result<()> {
    if args.json {
        if outcome != TravelOutcome::NotTraveling {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        return Ok(());
    }
    match outcome {
        TravelOutcome::NotTraveling => {}
        TravelOutcome::Stopped { progress } => {
            println!("Journey paused at {:.0}%", progress * 100.0)
        }
        TravelOutcome::InProgress { progress } => {
            println!("Journey {:.0}% complete", progress * 100.0)
        }
        TravelOutcome::Arrived(arrival) => {
            println!("Arrived at {}", arrival.destination);
            if arrival.first_visit {
                println!("  New location discovered");
            }
            for key in arrival.unlocked {
                println!("  Unlocked: {}", key);
            }
        }
    }
    Ok(())
}

fn show(args: &Args, engine: &Engine, character: &CharacterState) -> Result<()> {
    let views = engine.enrich_active_effects(character);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    println!("=== {} ===", character.name);
    println!("{} ({:?})", character.clock.now(), character.clock.current_time_period());
    println!(
        "HP {}/{}  Mana {}/{}",
        character.hp, character.max_hp, character.mana, character.max_mana
    );
    println!("Fatigue {}  Hunger {}", character.fatigue, character.hunger);
    println!("Location: {}", character.location.location);

    if views.is_empty() {
        println!("No active effects");
    }
    for view in views {
        let remaining = view
            .remaining_minutes
            .map(|m| format!(" ({}m left)", m))
            .unwrap_or_default();
        println!("- {} [{:?}]{}", view.name, view.category, remaining);
        for modifier in view.modifiers {
            let interval = modifier
                .effective_interval
                .map(|m| format!(" every {}m", m))
                .unwrap_or_default();
            println!("    {} {} {:+}{}", modifier.kind, modifier.stat, modifier.value, interval);
        }
    }
    Ok(())
}
