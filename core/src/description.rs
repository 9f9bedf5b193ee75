//! Authored level descriptions supplied by the level catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Coords, SavedLocation, ThingDescription};

/// Flavour of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelType {
    /// Fetch-and-deliver level.
    Errand,
    /// Spell-casting level.
    Ritual,
}

/// Catalog metadata for a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMetadata {
    /// Catalog identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display blurb.
    #[serde(default)]
    pub description: String,
    /// Flavour of the level.
    #[serde(rename = "type")]
    pub kind: LevelType,
}

/// Grid dimensions measured in locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

/// Labels that must be held or delivered for the level to complete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCriteria {
    /// Labels that must be present in the inventory.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Labels of receivers that must have received.
    #[serde(default)]
    pub receives: Vec<String>,
}

/// Dialog text keyed by label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelText {
    /// Body of the dialog.
    pub text: String,
    /// Optional portrait or speaker heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

/// A spell prepared for a level together with its starting charges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDefinition {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of casts available.
    pub charges: u32,
}

/// Complete authored description of a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescription {
    /// Catalog metadata.
    pub metadata: LevelMetadata,
    /// Grid dimensions.
    pub dimensions: Dimensions,
    /// Player start location.
    pub start_coords: Coords,
    /// Conditions under which the level completes.
    #[serde(default)]
    pub completion_criteria: CompletionCriteria,
    /// Dialog texts keyed by label.
    #[serde(default)]
    pub texts: BTreeMap<String, LevelText>,
    /// Ambient sound playing when the level starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_ambient_sound: Option<String>,
    /// Things held in the inventory when the level starts.
    #[serde(default)]
    pub initial_inventory: Vec<ThingDescription>,
    /// Spells prepared for the level.
    #[serde(default)]
    pub spells: Vec<SpellDefinition>,
    /// Authored grid, row by row.
    #[serde(default)]
    pub map: Vec<Vec<SavedLocation>>,
}
