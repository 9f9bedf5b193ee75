use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use errand_core::{Coords, LevelDescription, SavedLocation, SavedThing, ThingDescription, ThingId};
use tracing::debug;

const FLOOR_SPRITE: &str = "floor";

/// Serialization format of a level file, chosen by its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LevelFormat {
    Json,
    Toml,
}

impl LevelFormat {
    const ALL: [(Self, &'static str); 2] = [(Self::Json, "json"), (Self::Toml, "toml")];

    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|(_, known)| extension.eq_ignore_ascii_case(known))
            .map(|(format, _)| format)
    }
}

/// Loads the level stored as `<id>.json` or `<id>.toml` under the catalog directory.
pub(crate) fn load_level(directory: &Path, id: &str) -> Result<LevelDescription> {
    let candidates: Vec<PathBuf> = LevelFormat::ALL
        .iter()
        .map(|(_, extension)| directory.join(format!("{id}.{extension}")))
        .collect();
    let Some(path) = candidates.iter().find(|path| path.is_file()) else {
        bail!(
            "no level named `{id}` in {}; looked for {}",
            directory.display(),
            candidates
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    };
    load_file(path)
}

/// Loads a single level file, inferring the format from its extension.
pub(crate) fn load_file(path: &Path) -> Result<LevelDescription> {
    let Some(format) = LevelFormat::from_path(path) else {
        bail!("unsupported level file extension for {}", path.display());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file at {}", path.display()))?;
    let description = parse_level(&contents, format)
        .with_context(|| format!("failed to parse level file at {}", path.display()))?;
    debug!(path = %path.display(), level = %description.metadata.id, "level loaded");
    Ok(description)
}

pub(crate) fn parse_level(contents: &str, format: LevelFormat) -> Result<LevelDescription> {
    let description: LevelDescription = match format {
        LevelFormat::Json => {
            serde_json::from_str(contents).context("failed to parse level json contents")?
        }
        LevelFormat::Toml => {
            toml::from_str(contents).context("failed to parse level toml contents")?
        }
    };
    fill_bare_floor(description)
}

/// Gives a level without an authored grid one floor Thing per cell.
fn fill_bare_floor(mut description: LevelDescription) -> Result<LevelDescription> {
    if !description.map.is_empty() {
        return Ok(description);
    }
    let width = i32::try_from(description.dimensions.width)
        .context("level width does not fit the grid")?;
    let height = i32::try_from(description.dimensions.height)
        .context("level height does not fit the grid")?;

    description.map = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| SavedLocation {
                    coords: Coords::new(x, y),
                    things: vec![SavedThing {
                        id: ThingId::default(),
                        description: ThingDescription::new(FLOOR_SPRITE),
                    }],
                })
                .collect()
        })
        .collect();
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEADOW: &str = r#"
        startCoords = { x = 0, y = 0 }
        initialInventory = [{ sprite = "apple", label = "apple", properties = ["pickup"] }]

        [metadata]
        id = "meadow"
        title = "Meadow"
        type = "errand"

        [dimensions]
        width = 3
        height = 2

        [completionCriteria]
        inventory = ["apple"]
    "#;

    #[test]
    fn toml_level_without_map_gets_bare_floor() {
        let description = parse_level(MEADOW, LevelFormat::Toml).expect("level parses");

        assert_eq!(description.map.len(), 2);
        assert!(description.map.iter().all(|row| row.len() == 3));
        assert_eq!(description.map[1][2].coords, Coords::new(2, 1));
        let floor = &description.map[0][0].things;
        assert_eq!(floor.len(), 1);
        assert_eq!(floor[0].description, ThingDescription::new("floor"));
        assert_eq!(description.initial_inventory[0].label.as_deref(), Some("apple"));
    }

    #[test]
    fn authored_maps_are_kept() {
        let json = r#"{
            "metadata": { "id": "hall", "title": "Hall", "type": "ritual" },
            "dimensions": { "width": 1, "height": 1 },
            "startCoords": { "x": 0, "y": 0 },
            "map": [[{ "coords": { "x": 0, "y": 0 },
                       "things": [{ "description": { "sprite": "marble" } }] }]]
        }"#;

        let description = parse_level(json, LevelFormat::Json).expect("level parses");

        assert_eq!(
            description.map[0][0].things[0].description,
            ThingDescription::new("marble")
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            LevelFormat::from_path(Path::new("levels/a.JSON")),
            Some(LevelFormat::Json)
        );
        assert_eq!(
            LevelFormat::from_path(Path::new("levels/a.toml")),
            Some(LevelFormat::Toml)
        );
        assert_eq!(LevelFormat::from_path(Path::new("levels/a.yaml")), None);
    }

    #[test]
    fn malformed_documents_are_reported() {
        let error = parse_level("{ not json", LevelFormat::Json).expect_err("parse fails");
        assert!(error.to_string().contains("json"));
    }
}
