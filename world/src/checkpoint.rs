//! Full session snapshots captured by remembering stones.

use std::collections::BTreeSet;

use errand_core::{Coords, LevelMap, SavedLocation, SavedThing, Thing, ThingId};

/// Immutable snapshot of the restorable session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub(crate) player: Coords,
    pub(crate) inventory: Vec<SavedThing>,
    pub(crate) map: Vec<Vec<SavedLocation>>,
    pub(crate) ambient_sound: Option<String>,
    pub(crate) changed_state: BTreeSet<ThingId>,
}

impl Checkpoint {
    pub(crate) fn capture(
        player: Coords,
        inventory: &[Thing],
        map: &LevelMap,
        ambient_sound: Option<&str>,
        changed_state: BTreeSet<ThingId>,
    ) -> Self {
        Self {
            player,
            inventory: inventory
                .iter()
                .map(|thing| SavedThing {
                    id: thing.id(),
                    description: thing.description().clone(),
                })
                .collect(),
            map: map.serialize(),
            ambient_sound: ambient_sound.map(str::to_owned),
            changed_state,
        }
    }
}

/// Session state rebuilt from a checkpoint, Things carrying their saved identifiers.
#[derive(Debug)]
pub(crate) struct Restored {
    pub(crate) player: Coords,
    pub(crate) inventory: Vec<Thing>,
    pub(crate) map: LevelMap,
    pub(crate) ambient_sound: Option<String>,
    pub(crate) changed_state: Vec<ThingId>,
}

impl Checkpoint {
    pub(crate) fn restore(&self) -> Restored {
        let (map, index) = LevelMap::deserialize(&self.map);
        let inventory: Vec<Thing> = self
            .inventory
            .iter()
            .map(|saved| Thing::new(saved.id, saved.description.clone()))
            .collect();
        let changed_state = self
            .changed_state
            .iter()
            .copied()
            .filter(|id| {
                index.contains_key(id) || inventory.iter().any(|thing| thing.id() == *id)
            })
            .collect();

        Restored {
            player: self.player,
            inventory,
            map,
            ambient_sound: self.ambient_sound.clone(),
            changed_state,
        }
    }
}
