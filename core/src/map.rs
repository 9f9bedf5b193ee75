//! Rectangular grid of locations, each holding an ordered stack of Things.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Coords, Direction, Thing, ThingDescription, ThingId, ThingIdAllocator};

/// One grid cell plus its ordered stack of Things.
///
/// Order is meaningful: it is the rendering depth and every "first match"
/// rule resolves against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    coords: Coords,
    things: Vec<Thing>,
}

impl Location {
    /// Creates an empty location.
    #[must_use]
    pub const fn new(coords: Coords) -> Self {
        Self {
            coords,
            things: Vec::new(),
        }
    }

    /// Address of the location.
    #[must_use]
    pub const fn coords(&self) -> Coords {
        self.coords
    }

    /// Things held by the location in stack order.
    #[must_use]
    pub fn things(&self) -> &[Thing] {
        &self.things
    }

    /// Reports whether any Thing carries the tag.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.things.iter().any(|thing| thing.is(tag))
    }

    /// First Thing carrying the tag.
    #[must_use]
    pub fn first_with(&self, tag: &str) -> Option<&Thing> {
        self.things.iter().find(|thing| thing.is(tag))
    }

    /// First Thing whose label equals the provided value.
    #[must_use]
    pub fn first_labelled(&self, label: &str) -> Option<&Thing> {
        self.things.iter().find(|thing| thing.has_label(label))
    }

    /// Every Thing carrying the tag, in stack order.
    pub fn all_with<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Thing> + 'a {
        self.things.iter().filter(move |thing| thing.is(tag))
    }

    /// Reports whether the Thing is held here.
    #[must_use]
    pub fn holds(&self, id: ThingId) -> bool {
        self.things.iter().any(|thing| thing.id() == id)
    }

    /// Looks up a held Thing by identifier.
    #[must_use]
    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.things.iter().find(|thing| thing.id() == id)
    }

    /// Looks up a held Thing by identifier for mutation.
    pub fn thing_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.iter_mut().find(|thing| thing.id() == id)
    }

    /// Places a Thing on top of the stack.
    pub fn push(&mut self, thing: Thing) {
        self.things.push(thing);
    }

    /// Removes a Thing by identifier.
    pub fn remove(&mut self, id: ThingId) -> Option<Thing> {
        let index = self.things.iter().position(|thing| thing.id() == id)?;
        Some(self.things.remove(index))
    }

    fn save(&self) -> SavedLocation {
        SavedLocation {
            coords: self.coords,
            things: self
                .things
                .iter()
                .map(|thing| SavedThing {
                    id: thing.id(),
                    description: thing.description().clone(),
                })
                .collect(),
        }
    }
}

/// Persisted form of a Thing: its identifier and description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedThing {
    /// Identifier carried across save and restore.
    #[serde(default)]
    pub id: ThingId,
    /// Description at save time.
    pub description: ThingDescription,
}

/// Persisted form of a location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLocation {
    /// Address of the location.
    pub coords: Coords,
    /// Things in stack order.
    #[serde(default)]
    pub things: Vec<SavedThing>,
}

/// Rectangular array of locations addressed by [`Coords`].
///
/// Width comes from the first row and height from the row count. Lookups
/// outside the grid yield `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelMap {
    rows: Vec<Vec<Location>>,
}

impl LevelMap {
    /// Builds a map from authored data, giving every Thing a fresh identifier.
    pub fn instantiate(saved: &[Vec<SavedLocation>], allocator: &mut ThingIdAllocator) -> Self {
        let rows = saved
            .iter()
            .map(|row| {
                row.iter()
                    .map(|location| Location {
                        coords: location.coords,
                        things: location
                            .things
                            .iter()
                            .map(|thing| allocator.instantiate(thing.description.clone()))
                            .collect(),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Rebuilds a map keeping the persisted identifiers.
    ///
    /// The returned index maps every reconstructed Thing to the location it
    /// was placed at, so callers can re-resolve references held by id.
    #[must_use]
    pub fn deserialize(saved: &[Vec<SavedLocation>]) -> (Self, BTreeMap<ThingId, Coords>) {
        let mut index = BTreeMap::new();
        let rows = saved
            .iter()
            .map(|row| {
                row.iter()
                    .map(|location| Location {
                        coords: location.coords,
                        things: location
                            .things
                            .iter()
                            .map(|thing| {
                                let _ = index.insert(thing.id, location.coords);
                                Thing::new(thing.id, thing.description.clone())
                            })
                            .collect(),
                    })
                    .collect()
            })
            .collect();
        (Self { rows }, index)
    }

    /// Captures every location and Thing, identifiers included.
    #[must_use]
    pub fn serialize(&self) -> Vec<Vec<SavedLocation>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Location::save).collect())
            .collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Location at the coordinates, if inside the grid.
    #[must_use]
    pub fn location_at(&self, coords: Coords) -> Option<&Location> {
        let (column, row) = Self::index(coords)?;
        self.rows.get(row)?.get(column)
    }

    /// Location at the coordinates for mutation, if inside the grid.
    pub fn location_at_mut(&mut self, coords: Coords) -> Option<&mut Location> {
        let (column, row) = Self::index(coords)?;
        self.rows.get_mut(row)?.get_mut(column)
    }

    /// Location one step away from the coordinates.
    #[must_use]
    pub fn neighbor(&self, coords: Coords, direction: Direction) -> Option<&Location> {
        self.location_at(direction.advance(coords))
    }

    /// Orthogonal in-bounds neighbours.
    #[must_use]
    pub fn neighbors(&self, coords: Coords) -> Vec<&Location> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbor(coords, direction))
            .collect()
    }

    /// Every location in row-major scan order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.rows.iter().flatten()
    }

    /// Locations matching the predicate, in scan order.
    pub fn find_locations<P>(&self, predicate: P) -> Vec<&Location>
    where
        P: Fn(&Location) -> bool,
    {
        self.locations()
            .filter(|location| predicate(*location))
            .collect()
    }

    /// Locations holding at least one Thing matching the predicate.
    pub fn find_locations_containing<P>(&self, predicate: P) -> Vec<&Location>
    where
        P: Fn(&Thing) -> bool,
    {
        self.find_locations(|location| location.things().iter().any(&predicate))
    }

    /// The single location holding the Thing.
    ///
    /// Returns `None` when the Thing is absent or held by several locations.
    #[must_use]
    pub fn location_of_thing(&self, id: ThingId) -> Option<&Location> {
        let mut matches = self.locations().filter(|location| location.holds(id));
        let found = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(found),
        }
    }

    /// Looks up a Thing anywhere on the grid.
    #[must_use]
    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.locations().find_map(|location| location.thing(id))
    }

    /// Looks up a Thing anywhere on the grid for mutation.
    pub fn thing_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.rows
            .iter_mut()
            .flatten()
            .find_map(|location| location.thing_mut(id))
    }

    /// Moves a Thing from one location to the top of another.
    ///
    /// Returns `false` without effect when either location is outside the
    /// grid or `from` does not hold the Thing.
    pub fn relocate(&mut self, id: ThingId, from: Coords, to: Coords) -> bool {
        if self.location_at(to).is_none() {
            return false;
        }
        let Some(thing) = self
            .location_at_mut(from)
            .and_then(|location| location.remove(id))
        else {
            return false;
        };
        match self.location_at_mut(to) {
            Some(destination) => {
                destination.push(thing);
                true
            }
            None => false,
        }
    }

    fn index(coords: Coords) -> Option<(usize, usize)> {
        let column = usize::try_from(coords.x()).ok()?;
        let row = usize::try_from(coords.y()).ok()?;
        Some((column, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_grid(width: i32, height: i32) -> Vec<Vec<SavedLocation>> {
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| SavedLocation {
                        coords: Coords::new(x, y),
                        things: vec![SavedThing {
                            id: ThingId::default(),
                            description: ThingDescription::new("floor"),
                        }],
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn dimensions_follow_first_row_and_row_count() {
        let mut allocator = ThingIdAllocator::new();
        let map = LevelMap::instantiate(&saved_grid(4, 3), &mut allocator);
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
    }

    #[test]
    fn out_of_bounds_lookups_are_absent() {
        let mut allocator = ThingIdAllocator::new();
        let map = LevelMap::instantiate(&saved_grid(2, 2), &mut allocator);
        assert!(map.location_at(Coords::new(-1, 0)).is_none());
        assert!(map.location_at(Coords::new(0, 2)).is_none());
        assert!(map.location_at(Coords::new(1, 1)).is_some());
    }

    #[test]
    fn corner_has_two_neighbors() {
        let mut allocator = ThingIdAllocator::new();
        let map = LevelMap::instantiate(&saved_grid(3, 3), &mut allocator);
        assert_eq!(map.neighbors(Coords::new(0, 0)).len(), 2);
        assert_eq!(map.neighbors(Coords::new(1, 1)).len(), 4);
    }

    #[test]
    fn instantiate_assigns_distinct_identifiers() {
        let mut allocator = ThingIdAllocator::new();
        let map = LevelMap::instantiate(&saved_grid(2, 2), &mut allocator);
        let mut ids: Vec<ThingId> = map
            .locations()
            .flat_map(|location| location.things().iter().map(Thing::id))
            .collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn relocate_appends_to_destination() {
        let mut allocator = ThingIdAllocator::new();
        let mut map = LevelMap::instantiate(&saved_grid(2, 1), &mut allocator);
        let rock = allocator.instantiate(ThingDescription::new("rock"));
        let rock_id = rock.id();
        map.location_at_mut(Coords::new(0, 0))
            .expect("origin")
            .push(rock);

        assert!(map.relocate(rock_id, Coords::new(0, 0), Coords::new(1, 0)));
        let destination = map.location_at(Coords::new(1, 0)).expect("destination");
        assert_eq!(destination.things().last().map(Thing::id), Some(rock_id));
        assert_eq!(
            map.location_of_thing(rock_id).map(Location::coords),
            Some(Coords::new(1, 0))
        );
        assert!(!map.relocate(rock_id, Coords::new(0, 0), Coords::new(1, 0)));
    }

    #[test]
    fn ambiguous_thing_location_is_absent() {
        let mut allocator = ThingIdAllocator::new();
        let mut map = LevelMap::instantiate(&saved_grid(2, 1), &mut allocator);
        let ghost = allocator.instantiate(ThingDescription::new("ghost"));
        for x in 0..2 {
            map.location_at_mut(Coords::new(x, 0))
                .expect("location")
                .push(ghost.clone());
        }
        assert!(map.location_of_thing(ghost.id()).is_none());
    }

    #[test]
    fn locations_containing_follow_grid_order() {
        let mut allocator = ThingIdAllocator::new();
        let mut map = LevelMap::instantiate(&saved_grid(3, 2), &mut allocator);
        for (x, y) in [(2, 1), (1, 0)] {
            let rock =
                allocator.instantiate(ThingDescription::new("rock").with_properties(["wall"]));
            map.location_at_mut(Coords::new(x, y))
                .expect("location")
                .push(rock);
        }

        let walled: Vec<Coords> = map
            .find_locations_containing(|thing| thing.is("wall"))
            .into_iter()
            .map(Location::coords)
            .collect();
        assert_eq!(walled, vec![Coords::new(1, 0), Coords::new(2, 1)]);
        assert!(map
            .find_locations_containing(|thing| thing.is("slot"))
            .is_empty());
    }

    #[test]
    fn deserialize_preserves_identifiers_and_indexes_them() {
        let mut allocator = ThingIdAllocator::new();
        let map = LevelMap::instantiate(&saved_grid(2, 2), &mut allocator);
        let saved = map.serialize();
        let (restored, index) = LevelMap::deserialize(&saved);
        assert_eq!(restored.serialize(), saved);
        assert_eq!(index.len(), 4);
        for location in map.locations() {
            for thing in location.things() {
                assert_eq!(index.get(&thing.id()), Some(&location.coords()));
            }
        }
    }

    #[test]
    fn saved_location_round_trips_through_json() {
        let saved = saved_grid(1, 1);
        let json = serde_json::to_string(&saved).expect("serialize");
        let restored: Vec<Vec<SavedLocation>> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, saved);
    }
}
