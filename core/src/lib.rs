#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Errand puzzle engine.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative level, and pure systems. Adapters submit
//! [`Command`] values describing player intent, the level executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Systems consume read-only [`LevelMap`] views and
//! answer with plain values (plans, exchanges, headings) that the level
//! applies.

mod description;
mod map;
mod thing;

pub use description::{
    CompletionCriteria, Dimensions, LevelDescription, LevelMetadata, LevelText, LevelType,
    SpellDefinition,
};
pub use map::{LevelMap, Location, SavedLocation, SavedThing};
pub use thing::{Thing, ThingDescription, ThingId, ThingIdAllocator};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Property tags recognised by the movement rules.
///
/// Tags form an open set: a Thing may carry any string, and these constants
/// only name the ones the rules dispatch on.
pub mod tags {
    /// Blocks movement onto the location.
    pub const WALL: &str = "wall";
    /// Kills the player on entry.
    pub const DEATH: &str = "death";
    /// Moves into the inventory on entry.
    pub const PICKUP: &str = "pickup";
    /// Consumes one matching inventory item on contact.
    pub const RECEIVER: &str = "receiver";
    /// One-shot trigger whose text is shown by proximity or entry.
    pub const AUTOMATIC: &str = "automatic";
    /// A receiver that loses its wall once it has received.
    pub const OPEN: &str = "open";
    /// A receiver that releases the pickups at its location once it has received.
    pub const GIVE: &str = "give";
    /// Moves one step further when walked into.
    pub const PUSHABLE: &str = "pushable";
    /// Sets the level's ambient sound to its label on entry.
    pub const AMBIENT_SOUND: &str = "ambientSound";
    /// A pushable that neutralises a bridgeable hazard.
    pub const BRIDGE: &str = "bridge";
    /// A hazard that a bridge can neutralise.
    pub const BRIDGEABLE: &str = "bridgeable";
    /// Sends the player to the other Thing sharing its label.
    pub const TELEPORT: &str = "teleport";
    /// Captures a checkpoint when bumped.
    pub const REMEMBER: &str = "remember";
    /// Exchanges one item with the inventory when bumped.
    pub const SLOT: &str = "slot";
    /// Patrols the grid on every tick.
    pub const MONSTER: &str = "monster";
    /// Destroys and relocates Things according to its label when bumped.
    pub const TRANSMUTE: &str = "transmute";
    /// Announces a casting opportunity to the presentation layer.
    pub const CASTING: &str = "casting";
}

/// Label of the Thing whose text is shown after a successful delivery.
pub const ON_INTERACTION_LABEL: &str = "onInteraction";
/// Label of the Thing whose text is shown while a receiver is present but not satisfied.
pub const PRE_INTERACTION_LABEL: &str = "preInteraction";
/// Label of the Thing whose text is shown at locations without receivers.
pub const POST_INTERACTION_LABEL: &str = "postInteraction";
/// Text reported when a remembering stone captures a checkpoint.
pub const REMEMBERING_TEXT: &str = "remembering";
/// Identifier of the prepared spell that lets the player push walls.
pub const STRENGTH_SPELL_ID: &str = "strength";

/// Commands that express all permissible level mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Attempts to move the player one step.
    Move {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Advances every monster by one step.
    Tick,
    /// Restores the last captured checkpoint.
    Remember,
    /// Advances the prepared spell selection cursor.
    ChangeSelectedSpell,
    /// Enables or disables every movement rule.
    SetCollision {
        /// Whether movement rules apply.
        enabled: bool,
    },
    /// Enables or disables monster ticks.
    SetTicking {
        /// Whether ticks advance monsters.
        enabled: bool,
    },
    /// Adds a Thing built from the description at the provided location.
    AddThing {
        /// Location receiving the new Thing.
        coords: Coords,
        /// Authoring description of the new Thing.
        description: ThingDescription,
    },
    /// Removes a Thing from the provided location.
    RemoveThing {
        /// Location currently holding the Thing.
        coords: Coords,
        /// Identifier of the Thing to remove.
        thing: ThingId,
    },
}

/// Events broadcast by the level after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports the outcome of a movement attempt.
    Moved(MoveResult),
    /// Reports the outcome of a monster tick.
    Ticked(TickOutcome),
    /// Confirms that a checkpoint was restored.
    Remembered,
    /// Carries the completed inventory forwarded to the umbrella game.
    InventoryForwarded {
        /// Labels of every Thing held in the inventory.
        labels: Vec<String>,
    },
    /// Announces the newly selected prepared spell.
    SpellSelected {
        /// Identifier of the selected spell, if any.
        spell: Option<String>,
    },
    /// Announces that movement rules were toggled.
    CollisionChanged {
        /// Whether movement rules apply.
        enabled: bool,
    },
    /// Announces that monster ticks were toggled.
    TickingChanged {
        /// Whether ticks advance monsters.
        enabled: bool,
    },
    /// Confirms that the editor added a Thing.
    ThingAdded {
        /// The Thing that was added.
        thing: Thing,
        /// Location now holding the Thing.
        at: Coords,
    },
    /// Confirms that the editor removed a Thing.
    ThingRemoved {
        /// The Thing that was removed.
        thing: Thing,
        /// Location that held the Thing.
        at: Coords,
    },
}

/// Address of a single grid location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coords {
    x: i32,
    y: i32,
}

impl Coords {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Cardinal directions available to the player and monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row offsets of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Returns the coordinates one step away in this direction.
    #[must_use]
    pub const fn advance(self, coords: Coords) -> Coords {
        let (dx, dy) = self.delta();
        Coords::new(coords.x() + dx, coords.y() + dy)
    }

    /// Direction after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Direction after a quarter turn clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Canonical upper-case name used in monster labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }

    /// Parses a direction name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// A Thing paired with the location it now occupies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedThing {
    /// The Thing that arrived.
    pub thing: Thing,
    /// Location the Thing arrived at.
    pub at: Coords,
}

/// Outcome of a single movement attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether the player left their previous location.
    pub moved: bool,
    /// Whether the step killed the player.
    pub died: bool,
    /// Whether every completion criterion holds after the step.
    pub level_complete: bool,
    /// Text to present, if any.
    pub text: Option<String>,
    /// Things removed from the grid or the inventory during the step.
    pub removed_things: Vec<Thing>,
    /// Things pushed one step further.
    pub pushed: Vec<Thing>,
    /// Things whose visible state changed during the step.
    pub changed_state: Vec<Thing>,
    /// Things placed onto the grid during the step.
    pub added_things: Vec<PlacedThing>,
    /// Whether the target location offers a casting opportunity.
    pub casting: bool,
}

/// Outcome of a single monster tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether a monster landed on the player.
    pub died: bool,
    /// Monsters together with the location they moved to.
    pub moved_things: Vec<PlacedThing>,
}

/// Receives the completed inventory whenever a step satisfies the completion criteria.
pub trait InventorySink {
    /// Forwards the labels of the full current inventory.
    fn add_to_game_inventory(&mut self, labels: &[String]);
}

impl InventorySink for Vec<Vec<String>> {
    fn add_to_game_inventory(&mut self, labels: &[String]) {
        self.push(labels.to_vec());
    }
}

/// Errors surfaced by the level for content or caller bugs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// A monster label does not end in `|<direction>`.
    #[error("monster label '{label}' does not encode a heading")]
    MalformedMonsterHeading {
        /// Offending label.
        label: String,
    },
    /// A Thing expected at a location was not found there.
    #[error("thing {thing} is not present at ({}, {})", .coords.x(), .coords.y())]
    ThingNotAtLocation {
        /// Identifier of the missing Thing.
        thing: ThingId,
        /// Location that was searched.
        coords: Coords,
    },
    /// Coordinates fall outside the grid.
    #[error("location ({}, {}) is outside the grid", .coords.x(), .coords.y())]
    LocationOutOfBounds {
        /// Offending coordinates.
        coords: Coords,
    },
}
