#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure slot system that decides which single Thing a slot exchanges with the inventory.

use errand_core::{tags, Thing, ThingId};

/// Things the level should move between the inventory and a slot location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotExchange {
    /// Things leaving the slot location for the inventory.
    pub move_to_inventory: Vec<ThingId>,
    /// Things leaving the inventory for the slot location.
    pub move_to_slot: Vec<ThingId>,
}

impl SlotExchange {
    /// Reports whether the exchange moves nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.move_to_inventory.is_empty() && self.move_to_slot.is_empty()
    }
}

/// Resolves the exchange between the inventory and the Things at one location.
///
/// Locations without a slot exchange nothing. A pickup held by the slot goes
/// to the inventory first; otherwise the oldest inventory item goes into the
/// slot. At most one Thing moves.
#[must_use]
pub fn resolve(inventory: &[Thing], things: &[Thing]) -> SlotExchange {
    let mut exchange = SlotExchange::default();

    if !things.iter().any(|thing| thing.is(tags::SLOT)) {
        return exchange;
    }

    if let Some(pickup) = things.iter().find(|thing| thing.is(tags::PICKUP)) {
        exchange.move_to_inventory.push(pickup.id());
    } else if let Some(first) = inventory.first() {
        exchange.move_to_slot.push(first.id());
    }

    exchange
}

#[cfg(test)]
mod tests {
    use super::*;
    use errand_core::{ThingDescription, ThingIdAllocator};

    fn thing(allocator: &mut ThingIdAllocator, tags: &[&str]) -> Thing {
        allocator.instantiate(ThingDescription::new("thing").with_properties(tags.iter().copied()))
    }

    #[test]
    fn location_without_slot_exchanges_nothing() {
        let mut allocator = ThingIdAllocator::new();
        let inventory = vec![thing(&mut allocator, &["pickup"])];
        let things = vec![thing(&mut allocator, &["pickup"])];

        assert!(resolve(&inventory, &things).is_empty());
    }

    #[test]
    fn slot_pickup_moves_to_inventory_first() {
        let mut allocator = ThingIdAllocator::new();
        let inventory = vec![thing(&mut allocator, &["pickup"])];
        let slot = thing(&mut allocator, &["slot"]);
        let first = thing(&mut allocator, &["pickup"]);
        let second = thing(&mut allocator, &["pickup"]);
        let things = vec![slot, first.clone(), second];

        let exchange = resolve(&inventory, &things);

        assert_eq!(exchange.move_to_inventory, vec![first.id()]);
        assert!(exchange.move_to_slot.is_empty());
    }

    #[test]
    fn empty_slot_takes_oldest_inventory_item() {
        let mut allocator = ThingIdAllocator::new();
        let oldest = thing(&mut allocator, &["pickup"]);
        let newest = thing(&mut allocator, &["pickup"]);
        let inventory = vec![oldest.clone(), newest];
        let things = vec![thing(&mut allocator, &["slot"])];

        let exchange = resolve(&inventory, &things);

        assert!(exchange.move_to_inventory.is_empty());
        assert_eq!(exchange.move_to_slot, vec![oldest.id()]);
    }

    #[test]
    fn empty_slot_and_empty_inventory_exchange_nothing() {
        let mut allocator = ThingIdAllocator::new();
        let things = vec![thing(&mut allocator, &["slot"])];

        assert!(resolve(&[], &things).is_empty());
    }
}
