#![allow(dead_code)]

use errand_core::{
    CompletionCriteria, Coords, Dimensions, Direction, LevelDescription, LevelMetadata,
    LevelType, MoveResult, SavedLocation, SavedThing, SpellDefinition, Thing, ThingDescription,
    ThingId,
};
use errand_world::{query, DiscardInventory, Level};

pub fn thing(label: &str, tags: &[&str]) -> ThingDescription {
    ThingDescription::new(label)
        .with_label(label)
        .with_properties(tags.iter().copied())
}

pub struct LevelBuilder {
    width: i32,
    height: i32,
    start: Coords,
    things: Vec<(Coords, ThingDescription)>,
    criteria: CompletionCriteria,
    inventory: Vec<ThingDescription>,
    spells: Vec<SpellDefinition>,
}

impl LevelBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            start: Coords::new(0, 0),
            things: Vec::new(),
            criteria: CompletionCriteria::default(),
            inventory: Vec::new(),
            spells: Vec::new(),
        }
    }

    pub fn start(mut self, x: i32, y: i32) -> Self {
        self.start = Coords::new(x, y);
        self
    }

    pub fn with(mut self, x: i32, y: i32, description: ThingDescription) -> Self {
        self.things.push((Coords::new(x, y), description));
        self
    }

    pub fn holding(mut self, description: ThingDescription) -> Self {
        self.inventory.push(description);
        self
    }

    pub fn requiring_inventory(mut self, label: &str) -> Self {
        self.criteria.inventory.push(label.to_owned());
        self
    }

    pub fn requiring_receive(mut self, label: &str) -> Self {
        self.criteria.receives.push(label.to_owned());
        self
    }

    pub fn spell(mut self, id: &str, charges: u32) -> Self {
        self.spells.push(SpellDefinition {
            id: id.to_owned(),
            name: id.to_owned(),
            charges,
        });
        self
    }

    pub fn description(&self) -> LevelDescription {
        let map = (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let coords = Coords::new(x, y);
                        let mut things = vec![SavedThing {
                            id: ThingId::default(),
                            description: ThingDescription::new("floor"),
                        }];
                        things.extend(
                            self.things
                                .iter()
                                .filter(|(at, _)| *at == coords)
                                .map(|(_, description)| SavedThing {
                                    id: ThingId::default(),
                                    description: description.clone(),
                                }),
                        );
                        SavedLocation { coords, things }
                    })
                    .collect()
            })
            .collect();

        LevelDescription {
            metadata: LevelMetadata {
                id: "test".to_owned(),
                title: "Test".to_owned(),
                description: String::new(),
                kind: LevelType::Errand,
            },
            dimensions: Dimensions {
                width: u32::try_from(self.width).unwrap_or(0),
                height: u32::try_from(self.height).unwrap_or(0),
            },
            start_coords: self.start,
            completion_criteria: self.criteria.clone(),
            texts: Default::default(),
            initial_ambient_sound: None,
            initial_inventory: self.inventory.clone(),
            spells: self.spells.clone(),
            map,
        }
    }

    pub fn build(self) -> Level {
        Level::new(self.description())
    }
}

pub fn step(level: &mut Level, direction: Direction) -> MoveResult {
    level.try_to_move(direction, &mut DiscardInventory)
}

pub fn things_at(level: &Level, x: i32, y: i32) -> Vec<Thing> {
    query::map(level)
        .location_at(Coords::new(x, y))
        .map(|location| location.things().to_vec())
        .unwrap_or_default()
}

pub fn labelled(level: &Level, x: i32, y: i32, label: &str) -> Option<Thing> {
    things_at(level, x, y)
        .into_iter()
        .find(|thing| thing.has_label(label))
}

pub fn labels(things: &[Thing]) -> Vec<String> {
    things
        .iter()
        .filter_map(|thing| thing.label().map(str::to_owned))
        .collect()
}
