//! Single-step movement resolution.
//!
//! Rules run in a fixed order and each one sees the effects of the previous
//! ones: receiver delivery, movement legality, sign reading, entry effects or
//! bump effects (remembering, slots, transmutation), teleport, push,
//! bridging, death and completion.

use errand_core::{
    tags, Coords, Direction, InventorySink, MoveResult, PlacedThing, Thing, ThingId,
    ON_INTERACTION_LABEL, POST_INTERACTION_LABEL, PRE_INTERACTION_LABEL, REMEMBERING_TEXT,
    STRENGTH_SPELL_ID,
};
use errand_system_slot as slot;
use errand_system_transmutation as transmutation;
use tracing::{debug, warn};

use crate::Level;

const TEXT_SEPARATOR: &str = ",";

/// Receiver that accepted an inventory item on this step.
#[derive(Clone, Copy, Debug)]
struct Delivery {
    open: bool,
}

/// Effects accumulated while resolving one step.
#[derive(Debug, Default)]
struct StepLedger {
    removed: Vec<Thing>,
    added: Vec<PlacedThing>,
    pushed: Vec<ThingId>,
    changed: Vec<ThingId>,
}

impl StepLedger {
    fn mark_changed(&mut self, id: ThingId) {
        if !self.changed.contains(&id) {
            self.changed.push(id);
        }
    }
}

impl Level {
    /// Attempts to move the player one step and resolves every rule it triggers.
    ///
    /// Whenever the step leaves every completion criterion satisfied, the
    /// labels of the full inventory are forwarded to `sink`.
    pub fn try_to_move(
        &mut self,
        direction: Direction,
        sink: &mut dyn InventorySink,
    ) -> MoveResult {
        let origin = self.player;
        let target = direction.advance(origin);
        if self.map.location_at(target).is_none() {
            return MoveResult::default();
        }

        if !self.collision_enabled {
            self.player = target;
            return MoveResult {
                moved: true,
                ..MoveResult::default()
            };
        }

        let mut ledger = StepLedger::default();

        let delivery = self.deliver(target, &mut ledger);
        let mut interaction_text = match delivery {
            Some(_) => self.text_labelled(target, ON_INTERACTION_LABEL),
            None if self.location_has(target, tags::RECEIVER) => {
                self.text_labelled(target, PRE_INTERACTION_LABEL)
            }
            None => self.text_labelled(target, POST_INTERACTION_LABEL),
        };

        let just_received = delivery.is_some();
        let blocked_by_closed_receiver = delivery.is_some_and(|delivery| !delivery.open);

        let beyond = direction.advance(target);
        let strength_push = self.strength_push_available(target);
        let wall_blocks = self.location_has(target, tags::WALL) && !strength_push;
        let can_move =
            !wall_blocks && self.push_is_legal(target, beyond) && !blocked_by_closed_receiver;

        let reading_text = self.reading_text(target);

        if can_move {
            self.player = self.teleport_destination(target);
            self.enter(target, &mut ledger);
        } else {
            if let Some(stone) = self.first_id_with(target, tags::REMEMBER) {
                interaction_text = Some(REMEMBERING_TEXT.to_owned());
                ledger.mark_changed(stone);
                self.capture_checkpoint(stone);
            }
            self.exchange_with_slot(target, &mut ledger);
            self.transmute(target, &mut ledger);
        }

        if can_move {
            self.push(target, beyond, &mut ledger);
            self.bridge(beyond, &mut ledger);
            if strength_push && !ledger.pushed.is_empty() {
                if let Some(spells) = self.spells.as_mut() {
                    let _ = spells.cast_spell(STRENGTH_SPELL_ID);
                    debug!(at = ?target, "strength spent on a wall push");
                }
            }
        }

        let casting = self.location_has(target, tags::CASTING);

        for id in &ledger.changed {
            if !self.changed_state.contains(id) {
                self.changed_state.push(*id);
            }
        }

        let died = can_move && self.location_has(target, tags::DEATH) && !just_received;

        let level_complete = self.is_complete();
        if level_complete {
            sink.add_to_game_inventory(&self.inventory_labels());
        }

        let text = interaction_text
            .or_else(|| (!reading_text.is_empty()).then_some(reading_text))
            .or_else(|| self.proximity_text(origin));

        let result = MoveResult {
            moved: can_move,
            died,
            level_complete,
            text,
            removed_things: ledger.removed,
            pushed: ledger
                .pushed
                .iter()
                .filter_map(|id| self.resolve(*id))
                .collect(),
            changed_state: ledger
                .changed
                .iter()
                .filter_map(|id| self.resolve(*id))
                .collect(),
            added_things: ledger.added,
            casting,
        };

        if died {
            debug!(at = ?target, "player died");
            self.player = self.start_coords;
        }

        result
    }

    fn deliver(&mut self, target: Coords, ledger: &mut StepLedger) -> Option<Delivery> {
        let (receiver, label) = {
            let location = self.map.location_at(target)?;
            location.all_with(tags::RECEIVER).find_map(|thing| {
                let label = thing.label()?;
                self.inventory
                    .iter()
                    .any(|item| item.has_label(label))
                    .then(|| (thing.id(), label.to_owned()))
            })?
        };

        if let Some(index) = self.inventory.iter().position(|item| item.has_label(&label)) {
            let _ = self.inventory.remove(index);
        }
        self.done_receivers.push(label.clone());

        let thing = self
            .map
            .location_at_mut(target)
            .and_then(|location| location.thing_mut(receiver))?;
        thing.remove_property(tags::RECEIVER);
        let open = thing.is(tags::OPEN);
        if open {
            thing.remove_property(tags::WALL);
        }
        let give = thing.is(tags::GIVE);
        thing.remove_property(tags::DEATH);
        ledger.mark_changed(receiver);

        if give {
            self.collect_pickups(target, ledger);
        }

        debug!(receiver = %receiver, %label, open, give, "receiver satisfied");
        Some(Delivery { open })
    }

    fn enter(&mut self, target: Coords, ledger: &mut StepLedger) {
        self.collect_pickups(target, ledger);

        let Some(location) = self.map.location_at_mut(target) else {
            return;
        };

        if let Some(sound) = location.first_with(tags::AMBIENT_SOUND) {
            self.ambient_sound = sound.label().map(str::to_owned);
        }

        let triggers: Vec<ThingId> = location
            .all_with(tags::AUTOMATIC)
            .map(Thing::id)
            .collect();
        for id in triggers {
            if let Some(trigger) = location.thing_mut(id) {
                trigger.remove_property(tags::AUTOMATIC);
            }
            ledger.mark_changed(id);
        }
    }

    fn collect_pickups(&mut self, target: Coords, ledger: &mut StepLedger) {
        let Some(location) = self.map.location_at_mut(target) else {
            return;
        };
        let pickups: Vec<ThingId> = location.all_with(tags::PICKUP).map(Thing::id).collect();
        for id in pickups {
            if let Some(thing) = location.remove(id) {
                ledger.removed.push(thing.clone());
                self.inventory.push(thing);
            }
        }
    }

    fn exchange_with_slot(&mut self, target: Coords, ledger: &mut StepLedger) {
        let exchange = match self.map.location_at(target) {
            Some(location) => slot::resolve(&self.inventory, location.things()),
            None => return,
        };
        if exchange.is_empty() {
            return;
        }
        let Some(location) = self.map.location_at_mut(target) else {
            return;
        };

        for id in exchange.move_to_inventory {
            if let Some(thing) = location.remove(id) {
                ledger.removed.push(thing.clone());
                self.inventory.push(thing);
            }
        }
        for id in exchange.move_to_slot {
            if let Some(index) = self.inventory.iter().position(|item| item.id() == id) {
                let thing = self.inventory.remove(index);
                ledger.added.push(PlacedThing {
                    thing: thing.clone(),
                    at: target,
                });
                location.push(thing);
            }
        }
    }

    fn transmute(&mut self, target: Coords, ledger: &mut StepLedger) {
        let Some(transmuter) = self
            .map
            .location_at(target)
            .and_then(|location| location.first_with(tags::TRANSMUTE))
        else {
            return;
        };

        let plan = match transmutation::plan_for(transmuter, &self.map, target) {
            Ok(Some(plan)) => plan,
            Ok(None) => return,
            Err(error) => {
                warn!(at = ?target, %error, "ignoring malformed transmutation recipe");
                return;
            }
        };

        for consumption in &plan.consume {
            if let Some(thing) = self
                .map
                .location_at_mut(consumption.at)
                .and_then(|location| location.remove(consumption.thing))
            {
                ledger.removed.push(thing);
            }
        }
        for relocation in &plan.relocate {
            if self
                .map
                .relocate(relocation.thing, relocation.from, relocation.to)
            {
                if let Some(thing) = self
                    .map
                    .location_at(relocation.to)
                    .and_then(|location| location.thing(relocation.thing))
                {
                    ledger.added.push(PlacedThing {
                        thing: thing.clone(),
                        at: relocation.to,
                    });
                }
            }
        }
        debug!(
            at = ?target,
            consumed = plan.consume.len(),
            relocated = plan.relocate.len(),
            "transmutation resolved"
        );
    }

    fn push(&mut self, target: Coords, beyond: Coords, ledger: &mut StepLedger) {
        let pushables: Vec<ThingId> = match self.map.location_at(target) {
            Some(location) => location.all_with(tags::PUSHABLE).map(Thing::id).collect(),
            None => return,
        };
        for id in pushables {
            if self.map.relocate(id, target, beyond) {
                ledger.pushed.push(id);
            }
        }
    }

    fn bridge(&mut self, beyond: Coords, ledger: &mut StepLedger) {
        let Some(location) = self.map.location_at_mut(beyond) else {
            return;
        };
        for id in ledger.pushed.clone() {
            let is_bridge = location.thing(id).is_some_and(|thing| thing.is(tags::BRIDGE));
            if !is_bridge {
                continue;
            }
            let Some(hazard) = location.first_with(tags::BRIDGEABLE).map(Thing::id) else {
                continue;
            };
            if let Some(bridge) = location.thing_mut(id) {
                bridge.remove_property(tags::PUSHABLE);
                bridge.remove_property(tags::BRIDGE);
            }
            if let Some(hazard) = location.thing_mut(hazard) {
                hazard.remove_property(tags::DEATH);
                hazard.remove_property(tags::BRIDGEABLE);
            }
            ledger.mark_changed(id);
            debug!(bridge = %id, at = ?beyond, "hazard bridged");
        }
    }

    fn push_is_legal(&self, target: Coords, beyond: Coords) -> bool {
        if !self.location_has(target, tags::PUSHABLE) {
            return true;
        }
        self.map.location_at(beyond).is_some_and(|location| {
            !location.contains(tags::WALL) && !location.contains(tags::PUSHABLE)
        })
    }

    /// Reports whether a charged, selected strength spell lets the player
    /// shove every wall at the target.
    fn strength_push_available(&self, target: Coords) -> bool {
        let Some(location) = self.map.location_at(target) else {
            return false;
        };
        let mut walls = location.all_with(tags::WALL).peekable();
        if walls.peek().is_none() || !walls.all(|wall| wall.is(tags::PUSHABLE)) {
            return false;
        }
        self.spells
            .as_ref()
            .is_some_and(|spells| spells.can_cast(STRENGTH_SPELL_ID))
    }

    fn teleport_destination(&self, target: Coords) -> Coords {
        let Some(teleporter) = self
            .map
            .location_at(target)
            .and_then(|location| location.first_with(tags::TELEPORT))
        else {
            return target;
        };
        let Some(label) = teleporter.label() else {
            return target;
        };
        self.map
            .locations()
            .find(|location| {
                location
                    .things()
                    .iter()
                    .any(|thing| thing.id() != teleporter.id() && thing.has_label(label))
            })
            .map_or(target, |location| location.coords())
    }

    fn reading_text(&self, target: Coords) -> String {
        self.map
            .location_at(target)
            .map(|location| {
                location
                    .things()
                    .iter()
                    .filter(|thing| !thing.is(tags::AUTOMATIC))
                    .filter_map(Thing::text)
                    .collect::<Vec<_>>()
                    .join(TEXT_SEPARATOR)
            })
            .unwrap_or_default()
    }

    fn proximity_text(&self, origin: Coords) -> Option<String> {
        let hints: Vec<&str> = self
            .map
            .neighbors(origin)
            .into_iter()
            .flat_map(|location| location.all_with(tags::AUTOMATIC))
            .filter_map(Thing::text)
            .collect();
        (!hints.is_empty()).then(|| hints.join(TEXT_SEPARATOR))
    }

    fn text_labelled(&self, target: Coords, label: &str) -> Option<String> {
        self.map
            .location_at(target)
            .and_then(|location| location.first_labelled(label))
            .and_then(Thing::text)
            .map(str::to_owned)
    }

    fn location_has(&self, coords: Coords, tag: &str) -> bool {
        self.map
            .location_at(coords)
            .is_some_and(|location| location.contains(tag))
    }

    fn first_id_with(&self, coords: Coords, tag: &str) -> Option<ThingId> {
        self.map
            .location_at(coords)
            .and_then(|location| location.first_with(tag))
            .map(Thing::id)
    }
}
