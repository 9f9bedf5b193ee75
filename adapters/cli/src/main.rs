#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays scripted moves through an Errand level.

mod catalog;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use errand_core::{Command, Event, MoveResult, Thing};
use errand_world::{apply, query, Level};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plays a move script through one level of the catalog.
#[derive(Debug, Parser)]
#[command(name = "errand", version, about)]
struct Args {
    /// Directory holding `<id>.json` or `<id>.toml` level files.
    #[arg(long, default_value = "levels")]
    levels: PathBuf,
    /// Identifier of the level to play.
    #[arg(long)]
    level: String,
    /// Steps to play: U D L R move, T ticks, M remembers, S cycles the spell.
    #[arg(long, default_value = "")]
    moves: String,
    /// Moves through everything, ignoring every movement rule.
    #[arg(long)]
    no_collision: bool,
    /// Keeps monsters still.
    #[arg(long)]
    no_ticking: bool,
    /// Ticks monsters after every N moves; 0 disables automatic ticks.
    #[arg(long, default_value_t = 0)]
    tick_every: u32,
}

/// Entry point for the Errand command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let description = catalog::load_level(&args.levels, &args.level)?;
    let steps = script::parse(&args.moves).context("failed to parse the move script")?;
    let steps = script::with_ticks(steps, args.tick_every);

    let mut level = Level::new(description);
    info!(level = %query::metadata(&level).id, steps = steps.len(), "playing script");
    println!("{}", query::metadata(&level).title);

    let mut setup = Vec::new();
    if args.no_collision {
        setup.push(Command::SetCollision { enabled: false });
    }
    if args.no_ticking {
        setup.push(Command::SetTicking { enabled: false });
    }

    for (index, command) in setup.into_iter().chain(steps).enumerate() {
        let mut events = Vec::new();
        apply(&mut level, command, &mut events)
            .with_context(|| format!("step {} could not be applied", index + 1))?;
        for event in &events {
            println!("{}", describe(event));
        }
    }

    let player = query::player_coords(&level);
    println!(
        "player at ({}, {}), holding [{}]{}",
        player.x(),
        player.y(),
        query::inventory_labels(&level).join(", "),
        if query::is_complete(&level) {
            ", level complete"
        } else {
            ""
        }
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn describe(event: &Event) -> String {
    match event {
        Event::Moved(result) => describe_move(result),
        Event::Ticked(outcome) => {
            let mut line = format!("tick: {} monster(s) moved", outcome.moved_things.len());
            if outcome.died {
                line.push_str(", caught by a monster");
            }
            line
        }
        Event::Remembered => "remembered the last checkpoint".to_owned(),
        Event::InventoryForwarded { labels } => {
            format!("delivered to the game: [{}]", labels.join(", "))
        }
        Event::SpellSelected { spell } => match spell {
            Some(spell) => format!("spell selected: {spell}"),
            None => "no spell selected".to_owned(),
        },
        Event::CollisionChanged { enabled } => format!("collision enabled: {enabled}"),
        Event::TickingChanged { enabled } => format!("ticking enabled: {enabled}"),
        Event::ThingAdded { thing, at } => {
            format!("added {} at ({}, {})", name(thing), at.x(), at.y())
        }
        Event::ThingRemoved { thing, at } => {
            format!("removed {} at ({}, {})", name(thing), at.x(), at.y())
        }
    }
}

fn describe_move(result: &MoveResult) -> String {
    let mut parts = vec![if result.moved { "moved" } else { "blocked" }.to_owned()];
    if result.died {
        parts.push("died".to_owned());
    }
    for (verb, things) in [
        ("took", &result.removed_things),
        ("pushed", &result.pushed),
        ("changed", &result.changed_state),
    ] {
        if !things.is_empty() {
            parts.push(format!("{verb} {}", names(things)));
        }
    }
    if !result.added_things.is_empty() {
        let placed: Vec<Thing> = result
            .added_things
            .iter()
            .map(|placed| placed.thing.clone())
            .collect();
        parts.push(format!("placed {}", names(&placed)));
    }
    if result.casting {
        parts.push("casting".to_owned());
    }
    if result.level_complete {
        parts.push("level complete".to_owned());
    }
    if let Some(text) = &result.text {
        parts.push(format!("\"{text}\""));
    }
    parts.join(", ")
}

fn name(thing: &Thing) -> &str {
    thing.label().unwrap_or(&thing.description().sprite)
}

fn names(things: &[Thing]) -> String {
    things.iter().map(name).collect::<Vec<_>>().join(" ")
}
