#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Prepared spell ledger: a selection cursor plus per-spell remaining charges.

use errand_core::SpellDefinition;

/// Read-only view of one prepared spell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellSnapshot {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the cursor currently points at this spell.
    pub is_selected: bool,
    /// Casts left.
    pub charges: u32,
}

#[derive(Clone, Debug)]
struct PreparedSpell {
    definition: SpellDefinition,
    remaining: u32,
}

/// Spells prepared for a level.
#[derive(Clone, Debug, Default)]
pub struct PreparedSpells {
    spells: Vec<PreparedSpell>,
    selected: Option<usize>,
}

impl PreparedSpells {
    /// Prepares the spells in the provided order with nothing selected.
    #[must_use]
    pub fn new(definitions: Vec<SpellDefinition>) -> Self {
        Self {
            spells: definitions
                .into_iter()
                .map(|definition| PreparedSpell {
                    remaining: definition.charges,
                    definition,
                })
                .collect(),
            selected: None,
        }
    }

    /// Reports whether no spells were prepared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Advances the cursor: none, first, second, ..., last, none.
    pub fn change_selected_spell(&mut self) {
        if self.spells.is_empty() {
            return;
        }
        self.selected = match self.selected {
            None => Some(0),
            Some(index) if index + 1 < self.spells.len() => Some(index + 1),
            Some(_) => None,
        };
    }

    fn selected_spell(&self) -> Option<&PreparedSpell> {
        self.selected.and_then(|index| self.spells.get(index))
    }

    /// Identifier of the selected spell.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_spell().map(|spell| spell.definition.id.as_str())
    }

    /// Charges left on the first spell prepared under the identifier.
    #[must_use]
    pub fn remaining(&self, id: &str) -> Option<u32> {
        self.spells
            .iter()
            .find(|spell| spell.definition.id == id)
            .map(|spell| spell.remaining)
    }

    /// Reports whether the spell is selected and still charged.
    #[must_use]
    pub fn can_cast(&self, id: &str) -> bool {
        self.selected_spell()
            .is_some_and(|spell| spell.definition.id == id && spell.remaining > 0)
    }

    /// Spends one charge of the spell if it is selected and charged.
    ///
    /// Only the selected entry is charged, even when several prepared spells
    /// share the identifier.
    pub fn cast_spell(&mut self, id: &str) -> bool {
        let Some(spell) = self.selected.and_then(|index| self.spells.get_mut(index)) else {
            return false;
        };
        if spell.definition.id != id {
            return false;
        }
        match spell.remaining.checked_sub(1) {
            Some(remaining) => {
                spell.remaining = remaining;
                true
            }
            None => false,
        }
    }

    /// Snapshot of every spell in preparation order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SpellSnapshot> {
        self.spells
            .iter()
            .enumerate()
            .map(|(index, spell)| SpellSnapshot {
                id: spell.definition.id.clone(),
                name: spell.definition.name.clone(),
                is_selected: self.selected == Some(index),
                charges: spell.remaining,
            })
            .collect()
    }
}
