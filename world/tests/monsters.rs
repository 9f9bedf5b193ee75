mod support;

use errand_core::{Coords, Direction, LevelError, TickOutcome};
use errand_world::query;
use support::{labelled, step, thing, LevelBuilder};

fn monster_at(level: &errand_world::Level, prefix: &str) -> Option<(Coords, String)> {
    query::map(level).locations().find_map(|location| {
        location
            .all_with("monster")
            .find(|thing| {
                thing
                    .label()
                    .is_some_and(|label| label.starts_with(prefix))
            })
            .and_then(|thing| thing.label())
            .map(|label| (location.coords(), label.to_owned()))
    })
}

#[test]
fn open_field_monster_circles_left() {
    let mut level = LevelBuilder::new(5, 5)
        .with(2, 2, thing("bat|UP", &["monster"]))
        .build();

    let expected = [
        (Coords::new(1, 2), "bat|LEFT"),
        (Coords::new(1, 3), "bat|DOWN"),
        (Coords::new(2, 3), "bat|RIGHT"),
        (Coords::new(2, 2), "bat|UP"),
    ];
    for (at, label) in expected {
        let outcome = level.tick().expect("tick succeeds");
        assert!(!outcome.died);
        assert_eq!(outcome.moved_things.len(), 1);
        assert_eq!(outcome.moved_things[0].at, at);
        assert_eq!(monster_at(&level, "bat"), Some((at, label.to_owned())));
    }
}

#[test]
fn headings_are_read_case_insensitively() {
    let mut level = LevelBuilder::new(3, 3)
        .with(1, 1, thing("bat|up", &["monster"]))
        .build();

    let _ = level.tick().expect("tick succeeds");

    assert_eq!(
        monster_at(&level, "bat"),
        Some((Coords::new(0, 1), "bat|LEFT".to_owned()))
    );
}

#[test]
fn walls_and_edges_keep_monsters_straight() {
    let mut level = LevelBuilder::new(3, 2)
        .with(0, 0, thing("rat|RIGHT", &["monster"]))
        .with(0, 1, thing("rock", &["wall"]))
        .with(1, 1, thing("rock", &["wall"]))
        .with(2, 1, thing("rock", &["wall"]))
        .start(2, 0)
        .build();

    let first = level.tick().expect("tick succeeds");
    assert_eq!(first.moved_things[0].at, Coords::new(1, 0));
    assert_eq!(
        monster_at(&level, "rat"),
        Some((Coords::new(1, 0), "rat|RIGHT".to_owned()))
    );
}

#[test]
fn boxed_in_monster_stays_put() {
    let mut level = LevelBuilder::new(2, 2)
        .with(1, 0, thing("rat|RIGHT", &["monster"]))
        .start(0, 1)
        .build();

    let outcome = level.tick().expect("tick succeeds");

    assert_eq!(outcome, TickOutcome::default());
    assert!(labelled(&level, 1, 0, "rat|RIGHT").is_some());
}

#[test]
fn monster_reaching_the_player_kills() {
    let mut level = LevelBuilder::new(5, 1)
        .with(0, 0, thing("bat|RIGHT", &["monster"]))
        .start(4, 0)
        .build();
    assert!(step(&mut level, Direction::Left).moved);

    assert!(!level.tick().expect("tick succeeds").died);
    assert!(!level.tick().expect("tick succeeds").died);
    let outcome = level.tick().expect("tick succeeds");

    assert!(outcome.died);
    assert_eq!(query::player_coords(&level), Coords::new(4, 0));
}

#[test]
fn stationary_monster_on_the_player_kills() {
    let mut level = LevelBuilder::new(1, 1)
        .with(0, 0, thing("bat|UP", &["monster"]))
        .build();

    let outcome = level.tick().expect("tick succeeds");

    assert!(outcome.died);
    assert!(outcome.moved_things.is_empty());
}

#[test]
fn malformed_heading_aborts_the_whole_tick() {
    let mut level = LevelBuilder::new(3, 3)
        .with(1, 1, thing("bat|UP", &["monster"]))
        .with(2, 2, thing("ghost", &["monster"]))
        .build();
    let before = query::map(&level).serialize();

    let error = level.tick().expect_err("malformed label");

    assert_eq!(
        error,
        LevelError::MalformedMonsterHeading {
            label: "ghost".to_owned()
        }
    );
    assert_eq!(query::map(&level).serialize(), before);
}

#[test]
fn disabled_ticking_freezes_monsters() {
    let mut level = LevelBuilder::new(3, 3)
        .with(1, 1, thing("bat|UP", &["monster"]))
        .build();
    level.set_ticking_enabled(false);

    let outcome = level.tick().expect("tick succeeds");

    assert_eq!(outcome, TickOutcome::default());
    assert!(labelled(&level, 1, 1, "bat|UP").is_some());
}
