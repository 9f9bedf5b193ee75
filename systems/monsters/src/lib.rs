#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure monster system implementing a turn-left wall follower.
//!
//! A monster's label carries its heading as `<anything>|<direction>`. Each
//! tick the monster prefers turning left, then going straight, then staying
//! put; only walls and the grid edge block it.

use errand_core::{tags, Coords, Direction, LevelMap, Thing, ThingId};
use thiserror::Error;

const HEADING_DELIMITER: char = '|';

/// Heading decoded from a monster label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    prefix: String,
    direction: Direction,
}

impl Heading {
    /// Direction the monster currently faces.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the same heading facing a new direction.
    #[must_use]
    pub fn facing(&self, direction: Direction) -> Self {
        Self {
            prefix: self.prefix.clone(),
            direction,
        }
    }

    /// Encodes the heading back into label form.
    #[must_use]
    pub fn to_label(&self) -> String {
        format!(
            "{}{HEADING_DELIMITER}{}",
            self.prefix,
            self.direction.name()
        )
    }
}

/// Errors raised while decoding a monster label.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HeadingError {
    /// The label lacks a `|<direction>` suffix naming a known direction.
    #[error("monster label '{label}' does not end in |<direction>")]
    Malformed {
        /// Offending label.
        label: String,
    },
}

/// Decodes the heading stored in a monster label.
pub fn parse_heading(label: &str) -> Result<Heading, HeadingError> {
    let malformed = || HeadingError::Malformed {
        label: label.to_owned(),
    };
    let (prefix, name) = label.rsplit_once(HEADING_DELIMITER).ok_or_else(malformed)?;
    let direction = Direction::from_name(name).ok_or_else(malformed)?;
    Ok(Heading {
        prefix: prefix.to_owned(),
        direction,
    })
}

/// Chooses the next direction of travel, or `None` when boxed in.
pub fn turn_left<F>(heading: Direction, is_blocked: F) -> Option<Direction>
where
    F: Fn(Direction) -> bool,
{
    [heading.left(), heading]
        .into_iter()
        .find(|direction| !is_blocked(*direction))
}

/// Movement decided for one monster on one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterStep {
    /// Monster that moves.
    pub monster: ThingId,
    /// Location the monster leaves.
    pub from: Coords,
    /// Location the monster enters.
    pub to: Coords,
    /// Label encoding the heading the monster now faces.
    pub label: String,
}

/// Decides the step of a monster standing at `at`.
///
/// Returns `Ok(None)` when neither the left nor the straight neighbour is
/// open.
pub fn step(
    monster: &Thing,
    map: &LevelMap,
    at: Coords,
) -> Result<Option<MonsterStep>, HeadingError> {
    let heading = parse_heading(monster.label().unwrap_or_default())?;
    let is_blocked = |direction: Direction| {
        map.neighbor(at, direction)
            .map_or(true, |location| location.contains(tags::WALL))
    };

    Ok(turn_left(heading.direction(), is_blocked).map(|direction| MonsterStep {
        monster: monster.id(),
        from: at,
        to: direction.advance(at),
        label: heading.facing(direction).to_label(),
    }))
}
