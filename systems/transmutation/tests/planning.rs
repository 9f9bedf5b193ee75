use errand_core::{
    Coords, LevelMap, SavedLocation, SavedThing, Thing, ThingDescription, ThingId,
};
use errand_system_transmutation::{
    plan, plan_for, Consumption, Recipe, RecipeError, Relocation, TransmutationPlan,
};

/// Builds a grid where every authored Thing is `(id, label, x, y)`.
fn grid(width: i32, height: i32, things: &[(u64, &str, i32, i32)]) -> LevelMap {
    let saved: Vec<Vec<SavedLocation>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| SavedLocation {
                    coords: Coords::new(x, y),
                    things: things
                        .iter()
                        .filter(|(_, _, tx, ty)| *tx == x && *ty == y)
                        .map(|(id, label, _, _)| SavedThing {
                            id: ThingId::new(*id),
                            description: ThingDescription::new(*label).with_label(*label),
                        })
                        .collect(),
                })
                .collect()
        })
        .collect();
    LevelMap::deserialize(&saved).0
}

fn recipe(label: &str) -> Recipe {
    label.parse().expect("recipe parses")
}

#[test]
fn complete_recipe_consumes_and_relocates() {
    let map = grid(
        4,
        2,
        &[(1, "potion", 1, 0), (2, "herb", 3, 0), (3, "water", 3, 1)],
    );

    let planned = plan(
        &recipe("herb-3-0,water-3-1:potion-0-1"),
        &map,
        Coords::new(1, 0),
    );

    assert_eq!(
        planned,
        Some(TransmutationPlan {
            consume: vec![
                Consumption {
                    thing: ThingId::new(2),
                    at: Coords::new(3, 0),
                },
                Consumption {
                    thing: ThingId::new(3),
                    at: Coords::new(3, 1),
                },
            ],
            relocate: vec![Relocation {
                thing: ThingId::new(1),
                from: Coords::new(1, 0),
                to: Coords::new(0, 1),
            }],
        })
    );
}

#[test]
fn one_missing_ingredient_spoils_the_recipe() {
    let map = grid(4, 2, &[(1, "potion", 1, 0), (2, "herb", 3, 0)]);

    let planned = plan(
        &recipe("herb-3-0,water-3-1:potion-0-1"),
        &map,
        Coords::new(1, 0),
    );

    assert_eq!(planned, None);
}

#[test]
fn ingredient_outside_the_grid_is_missing() {
    let map = grid(2, 2, &[]);

    assert_eq!(plan(&recipe("herb-9-9"), &map, Coords::new(0, 0)), None);
}

#[test]
fn missing_products_are_skipped() {
    let map = grid(3, 1, &[(1, "herb", 2, 0)]);

    let planned = plan(&recipe("herb-2-0:potion-0-0"), &map, Coords::new(1, 0))
        .expect("ingredients present");

    assert_eq!(planned.consume.len(), 1);
    assert!(planned.relocate.is_empty());
}

#[test]
fn repeated_ingredient_is_consumed_once() {
    let map = grid(2, 1, &[(1, "herb", 1, 0)]);

    let planned =
        plan(&recipe("herb-1-0,herb-1-0"), &map, Coords::new(0, 0)).expect("ingredients present");

    assert_eq!(
        planned.consume,
        vec![Consumption {
            thing: ThingId::new(1),
            at: Coords::new(1, 0),
        }]
    );
}

#[test]
fn each_product_is_relocated_at_most_once() {
    let map = grid(3, 1, &[(1, "coin", 0, 0), (2, "coin", 0, 0)]);

    let planned = plan(
        &recipe(":coin-1-0,coin-2-0,coin-2-0"),
        &map,
        Coords::new(0, 0),
    )
    .expect("nothing to consume");

    let moved: Vec<(ThingId, Coords)> = planned
        .relocate
        .iter()
        .map(|relocation| (relocation.thing, relocation.to))
        .collect();
    assert_eq!(
        moved,
        vec![
            (ThingId::new(1), Coords::new(1, 0)),
            (ThingId::new(2), Coords::new(2, 0)),
        ]
    );
}

#[test]
fn only_transmuters_are_planned() {
    let map = grid(2, 1, &[(1, "herb", 1, 0)]);
    let plain = Thing::new(ThingId::new(9), ThingDescription::new("table").with_label("herb-1-0"));

    assert_eq!(plan_for(&plain, &map, Coords::new(0, 0)), Ok(None));
}

#[test]
fn transmuter_label_is_parsed_before_planning() {
    let map = grid(2, 1, &[(1, "herb", 1, 0)]);
    let cauldron = Thing::new(
        ThingId::new(9),
        ThingDescription::new("cauldron")
            .with_label("herb-one-0")
            .with_properties(["transmute"]),
    );

    assert_eq!(
        plan_for(&cauldron, &map, Coords::new(0, 0)),
        Err(RecipeError::MalformedSpec {
            spec: "herb-one-0".to_owned()
        })
    );
}
