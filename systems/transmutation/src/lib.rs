#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure transmutation system that parses recipes and plans their grid mutations.
//!
//! A transmuter's label encodes `destroy[:create]`, where each half is a
//! comma-separated list of `label-x-y` triples in absolute grid coordinates.
//! Planning is all-or-nothing on the destroy half: a single missing
//! ingredient yields no plan. Products are Things already waiting at the
//! transmuter's own location; each create triple relocates one of them.

use std::str::FromStr;

use errand_core::{tags, Coords, LevelMap, Thing, ThingId};
use thiserror::Error;

const HALF_DELIMITER: char = ':';
const SPEC_DELIMITER: char = ',';
const FIELD_DELIMITER: char = '-';

/// One `label-x-y` triple of a recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeSpec {
    /// Label of the Thing to destroy or relocate.
    pub label: String,
    /// Grid location the triple refers to.
    pub at: Coords,
}

/// Parsed transmutation recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipe {
    /// Ingredients consumed by the transmutation.
    pub destroy: Vec<RecipeSpec>,
    /// Products relocated from the transmuter to their destinations.
    pub create: Vec<RecipeSpec>,
}

impl FromStr for Recipe {
    type Err = RecipeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (destroy, create) = value
            .split_once(HALF_DELIMITER)
            .unwrap_or((value, ""));
        Ok(Self {
            destroy: parse_specs(destroy)?,
            create: parse_specs(create)?,
        })
    }
}

/// Errors raised while parsing a recipe label.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// A triple is not of the form `label-x-y`.
    #[error("recipe entry '{spec}' is not of the form label-x-y")]
    MalformedSpec {
        /// Offending triple.
        spec: String,
    },
}

/// Removal of one ingredient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Consumption {
    /// Ingredient to remove.
    pub thing: ThingId,
    /// Location holding the ingredient.
    pub at: Coords,
}

/// Relocation of one product away from the transmuter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relocation {
    /// Product to move.
    pub thing: ThingId,
    /// Location the product currently occupies.
    pub from: Coords,
    /// Location the product moves to.
    pub to: Coords,
}

/// Mutations the level applies, in order, to carry out a transmutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransmutationPlan {
    /// Ingredients to remove.
    pub consume: Vec<Consumption>,
    /// Products to relocate.
    pub relocate: Vec<Relocation>,
}

/// Plans the transmutation encoded by a transmuter standing at `origin`.
///
/// Returns `Ok(None)` when the Thing is not a transmuter or any ingredient is
/// missing.
pub fn plan_for(
    transmuter: &Thing,
    map: &LevelMap,
    origin: Coords,
) -> Result<Option<TransmutationPlan>, RecipeError> {
    if !transmuter.is(tags::TRANSMUTE) {
        return Ok(None);
    }
    let recipe: Recipe = transmuter.label().unwrap_or_default().parse()?;
    Ok(plan(&recipe, map, origin))
}

/// Resolves a recipe against the grid without mutating it.
#[must_use]
pub fn plan(recipe: &Recipe, map: &LevelMap, origin: Coords) -> Option<TransmutationPlan> {
    let mut consume: Vec<Consumption> = Vec::with_capacity(recipe.destroy.len());
    for spec in &recipe.destroy {
        let ingredient = map
            .location_at(spec.at)
            .and_then(|location| location.first_labelled(&spec.label))?;
        if consume.iter().all(|entry| entry.thing != ingredient.id()) {
            consume.push(Consumption {
                thing: ingredient.id(),
                at: spec.at,
            });
        }
    }

    let mut relocate: Vec<Relocation> = Vec::with_capacity(recipe.create.len());
    if let Some(workbench) = map.location_at(origin) {
        for spec in &recipe.create {
            let product = workbench.things().iter().find(|thing| {
                thing.has_label(&spec.label)
                    && consume.iter().all(|entry| entry.thing != thing.id())
                    && relocate.iter().all(|entry| entry.thing != thing.id())
            });
            if let Some(product) = product {
                relocate.push(Relocation {
                    thing: product.id(),
                    from: origin,
                    to: spec.at,
                });
            }
        }
    }

    Some(TransmutationPlan { consume, relocate })
}

fn parse_specs(list: &str) -> Result<Vec<RecipeSpec>, RecipeError> {
    list.split(SPEC_DELIMITER)
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(parse_spec)
        .collect()
}

fn parse_spec(spec: &str) -> Result<RecipeSpec, RecipeError> {
    let malformed = || RecipeError::MalformedSpec {
        spec: spec.to_owned(),
    };
    let mut fields = spec.rsplitn(3, FIELD_DELIMITER);
    let y = fields.next().ok_or_else(malformed)?;
    let x = fields.next().ok_or_else(malformed)?;
    let label = fields.next().ok_or_else(malformed)?;
    if label.is_empty() {
        return Err(malformed());
    }
    let x = x.trim().parse::<i32>().map_err(|_| malformed())?;
    let y = y.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok(RecipeSpec {
        label: label.to_owned(),
        at: Coords::new(x, y),
    })
}
