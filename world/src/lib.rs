#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for the Errand puzzle engine.
//!
//! A [`Level`] owns the grid, the player position, the inventory, the
//! changed-state ledger and at most one checkpoint. Player intent arrives
//! either through the direct methods ([`Level::try_to_move`], [`Level::tick`],
//! [`Level::remember`]) or as [`Command`] values passed to [`apply`], which
//! reports outcomes as [`Event`] values.

mod checkpoint;
mod movement;

use std::collections::{BTreeMap, BTreeSet};

use errand_core::{
    tags, Command, CompletionCriteria, Coords, Event, InventorySink, LevelDescription,
    LevelError, LevelMap, LevelMetadata, LevelText, PlacedThing, Thing, ThingDescription,
    ThingId, ThingIdAllocator, TickOutcome,
};
use errand_system_monsters::{self as monsters, HeadingError};
use errand_system_spells::PreparedSpells;
use tracing::debug;

use crate::checkpoint::Checkpoint;

/// Represents one play session of a level.
#[derive(Debug)]
pub struct Level {
    metadata: LevelMetadata,
    start_coords: Coords,
    completion_criteria: CompletionCriteria,
    texts: BTreeMap<String, LevelText>,
    map: LevelMap,
    player: Coords,
    inventory: Vec<Thing>,
    done_receivers: Vec<String>,
    ambient_sound: Option<String>,
    changed_state: Vec<ThingId>,
    checkpoint: Option<Checkpoint>,
    spells: Option<PreparedSpells>,
    allocator: ThingIdAllocator,
    collision_enabled: bool,
    ticking_enabled: bool,
}

impl Level {
    /// Starts a session from an authored description.
    ///
    /// Every authored Thing and every initial inventory item receives a
    /// fresh identifier.
    #[must_use]
    pub fn new(description: LevelDescription) -> Self {
        let mut allocator = ThingIdAllocator::new();
        let map = LevelMap::instantiate(&description.map, &mut allocator);
        let inventory = description
            .initial_inventory
            .into_iter()
            .map(|item| allocator.instantiate(item))
            .collect();
        let spells =
            Some(PreparedSpells::new(description.spells)).filter(|spells| !spells.is_empty());

        debug!(
            level = %description.metadata.id,
            width = map.width(),
            height = map.height(),
            "level started"
        );

        Self {
            metadata: description.metadata,
            start_coords: description.start_coords,
            completion_criteria: description.completion_criteria,
            texts: description.texts,
            map,
            player: description.start_coords,
            inventory,
            done_receivers: Vec::new(),
            ambient_sound: description.initial_ambient_sound,
            changed_state: Vec::new(),
            checkpoint: None,
            spells,
            allocator,
            collision_enabled: true,
            ticking_enabled: true,
        }
    }

    /// Enables or disables every movement rule; used by the level editor.
    pub fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    /// Enables or disables monster ticks; used by the level editor.
    pub fn set_ticking_enabled(&mut self, enabled: bool) {
        self.ticking_enabled = enabled;
    }

    /// Advances the prepared spell cursor, returning the newly selected spell.
    pub fn change_selected_spell(&mut self) -> Option<String> {
        let spells = self.spells.as_mut()?;
        spells.change_selected_spell();
        spells.selected_id().map(str::to_owned)
    }

    /// Advances every monster one step along its wall-following patrol.
    ///
    /// Monsters move in grid scan order. A malformed monster label aborts the
    /// tick before any monster moves.
    pub fn tick(&mut self) -> Result<TickOutcome, LevelError> {
        if !self.ticking_enabled {
            return Ok(TickOutcome::default());
        }

        let roster: Vec<(ThingId, Coords)> = self
            .map
            .locations()
            .flat_map(|location| {
                location
                    .all_with(tags::MONSTER)
                    .map(move |monster| (monster.id(), location.coords()))
            })
            .collect();

        for (id, at) in &roster {
            if let Some(monster) = self.map.location_at(*at).and_then(|l| l.thing(*id)) {
                let _ = monsters::parse_heading(monster.label().unwrap_or_default())
                    .map_err(heading_error)?;
            }
        }

        let mut outcome = TickOutcome::default();
        for (id, at) in roster {
            let Some(monster) = self.map.location_at(at).and_then(|l| l.thing(id)) else {
                continue;
            };
            let Some(step) = monsters::step(monster, &self.map, at).map_err(heading_error)? else {
                outcome.died |= at == self.player;
                continue;
            };

            if let Some(monster) = self
                .map
                .location_at_mut(step.from)
                .and_then(|location| location.thing_mut(step.monster))
            {
                monster.set_label(step.label);
            }
            if !self.map.relocate(step.monster, step.from, step.to) {
                continue;
            }
            outcome.died |= step.to == self.player;
            if let Some(monster) = self
                .map
                .location_at(step.to)
                .and_then(|location| location.thing(step.monster))
            {
                outcome.moved_things.push(PlacedThing {
                    thing: monster.clone(),
                    at: step.to,
                });
            }
        }

        if outcome.died {
            debug!(at = ?self.player, "player caught by a monster");
            self.player = self.start_coords;
        }
        Ok(outcome)
    }

    /// Restores the last checkpoint, replacing the session state wholesale.
    ///
    /// Returns `false` without effect when nothing was remembered yet.
    pub fn remember(&mut self) -> bool {
        let Some(checkpoint) = &self.checkpoint else {
            return false;
        };
        let restored = checkpoint.restore();
        self.player = restored.player;
        self.inventory = restored.inventory;
        self.map = restored.map;
        self.ambient_sound = restored.ambient_sound;
        self.changed_state = restored.changed_state;
        debug!(at = ?self.player, "checkpoint restored");
        true
    }

    /// Adds a Thing built from the description, refusing exact duplicates.
    pub fn add_thing(&mut self, coords: Coords, description: ThingDescription) -> Option<Thing> {
        let location = self.map.location_at(coords)?;
        if location
            .things()
            .iter()
            .any(|thing| *thing.description() == description)
        {
            return None;
        }
        let thing = self.allocator.instantiate(description);
        self.map.location_at_mut(coords)?.push(thing.clone());
        Some(thing)
    }

    /// Removes a Thing the caller believes to be at the location.
    pub fn remove_thing(&mut self, coords: Coords, thing: ThingId) -> Result<Thing, LevelError> {
        self.map
            .location_at_mut(coords)
            .ok_or(LevelError::LocationOutOfBounds { coords })?
            .remove(thing)
            .ok_or(LevelError::ThingNotAtLocation { thing, coords })
    }

    fn capture_checkpoint(&mut self, remembering_stone: ThingId) {
        let mut changed: BTreeSet<ThingId> = self.changed_state.iter().copied().collect();
        let _ = changed.insert(remembering_stone);
        self.checkpoint = Some(Checkpoint::capture(
            self.player,
            &self.inventory,
            &self.map,
            self.ambient_sound.as_deref(),
            changed,
        ));
        debug!(at = ?self.player, "checkpoint captured");
    }

    fn inventory_labels(&self) -> Vec<String> {
        self.inventory
            .iter()
            .filter_map(|thing| thing.label().map(str::to_owned))
            .collect()
    }

    fn is_complete(&self) -> bool {
        let held = self.inventory_labels();
        self.completion_criteria
            .inventory
            .iter()
            .all(|label| held.contains(label))
            && self
                .completion_criteria
                .receives
                .iter()
                .all(|label| self.done_receivers.contains(label))
    }

    fn resolve(&self, id: ThingId) -> Option<Thing> {
        self.map
            .thing(id)
            .or_else(|| self.inventory.iter().find(|thing| thing.id() == id))
            .cloned()
    }
}

fn heading_error(error: HeadingError) -> LevelError {
    match error {
        HeadingError::Malformed { label } => LevelError::MalformedMonsterHeading { label },
    }
}

/// Applies the provided command to the level, reporting outcomes as events.
///
/// The completed inventory forwarded on qualifying moves is reported as
/// [`Event::InventoryForwarded`] following the [`Event::Moved`] it belongs to.
pub fn apply(
    level: &mut Level,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), LevelError> {
    match command {
        Command::Move { direction } => {
            let mut forwarded: Vec<Vec<String>> = Vec::new();
            let result = level.try_to_move(direction, &mut forwarded);
            out_events.push(Event::Moved(result));
            out_events.extend(
                forwarded
                    .into_iter()
                    .map(|labels| Event::InventoryForwarded { labels }),
            );
        }
        Command::Tick => {
            let outcome = level.tick()?;
            out_events.push(Event::Ticked(outcome));
        }
        Command::Remember => {
            if level.remember() {
                out_events.push(Event::Remembered);
            }
        }
        Command::ChangeSelectedSpell => {
            if level.spells.is_some() {
                let spell = level.change_selected_spell();
                out_events.push(Event::SpellSelected { spell });
            }
        }
        Command::SetCollision { enabled } => {
            level.set_collision_enabled(enabled);
            out_events.push(Event::CollisionChanged { enabled });
        }
        Command::SetTicking { enabled } => {
            level.set_ticking_enabled(enabled);
            out_events.push(Event::TickingChanged { enabled });
        }
        Command::AddThing {
            coords,
            description,
        } => {
            if let Some(thing) = level.add_thing(coords, description) {
                out_events.push(Event::ThingAdded { thing, at: coords });
            }
        }
        Command::RemoveThing { coords, thing } => {
            let thing = level.remove_thing(coords, thing)?;
            out_events.push(Event::ThingRemoved { thing, at: coords });
        }
    }
    Ok(())
}

/// Forwarding sink that ignores the completed inventory.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardInventory;

impl InventorySink for DiscardInventory {
    fn add_to_game_inventory(&mut self, _labels: &[String]) {}
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use errand_core::{CompletionCriteria, Coords, LevelMap, LevelMetadata, LevelText, Thing};
    use errand_system_spells::SpellSnapshot;

    use super::Level;

    /// Catalog metadata of the level.
    #[must_use]
    pub fn metadata(level: &Level) -> &LevelMetadata {
        &level.metadata
    }

    /// Location the player starts at and respawns at after dying.
    #[must_use]
    pub fn start_coords(level: &Level) -> Coords {
        level.start_coords
    }

    /// Location the player currently occupies.
    #[must_use]
    pub fn player_coords(level: &Level) -> Coords {
        level.player
    }

    /// Read-only view of the grid.
    #[must_use]
    pub fn map(level: &Level) -> &LevelMap {
        &level.map
    }

    /// Things held by the player in acquisition order.
    #[must_use]
    pub fn inventory(level: &Level) -> &[Thing] {
        &level.inventory
    }

    /// Labels of the Things held by the player in acquisition order.
    #[must_use]
    pub fn inventory_labels(level: &Level) -> Vec<String> {
        level.inventory_labels()
    }

    /// Labels of receivers that have received so far.
    #[must_use]
    pub fn done_receivers(level: &Level) -> &[String] {
        &level.done_receivers
    }

    /// Ambient sound currently playing, if any.
    #[must_use]
    pub fn ambient_sound(level: &Level) -> Option<&str> {
        level.ambient_sound.as_deref()
    }

    /// Conditions under which the level completes.
    #[must_use]
    pub fn completion_criteria(level: &Level) -> &CompletionCriteria {
        &level.completion_criteria
    }

    /// Reports whether every completion criterion currently holds.
    #[must_use]
    pub fn is_complete(level: &Level) -> bool {
        level.is_complete()
    }

    /// Dialog text registered under the label.
    #[must_use]
    pub fn text<'a>(level: &'a Level, label: &str) -> Option<&'a LevelText> {
        level.texts.get(label)
    }

    /// Things whose state changed since the session started or was last restored.
    #[must_use]
    pub fn things_that_changed_state(level: &Level) -> Vec<Thing> {
        level
            .changed_state
            .iter()
            .filter_map(|id| level.resolve(*id))
            .collect()
    }

    /// Reports whether a checkpoint can be restored.
    #[must_use]
    pub fn has_checkpoint(level: &Level) -> bool {
        level.checkpoint.is_some()
    }

    /// Snapshot of the prepared spells, empty when the level defines none.
    #[must_use]
    pub fn spells(level: &Level) -> Vec<SpellSnapshot> {
        level
            .spells
            .as_ref()
            .map(|spells| spells.snapshot())
            .unwrap_or_default()
    }

    /// Reports whether movement rules apply.
    #[must_use]
    pub fn collision_enabled(level: &Level) -> bool {
        level.collision_enabled
    }

    /// Reports whether ticks advance monsters.
    #[must_use]
    pub fn ticking_enabled(level: &Level) -> bool {
        level.ticking_enabled
    }

    /// Thing drawn on top of the location, if any.
    #[must_use]
    pub fn top_thing_at(level: &Level, coords: Coords) -> Option<&Thing> {
        level
            .map
            .location_at(coords)
            .and_then(|location| location.things().last())
    }
}
