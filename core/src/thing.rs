//! Identity-bearing occupants of grid locations.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// Unique identifier assigned to a Thing for the lifetime of a session.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ThingId(u64);

impl ThingId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out monotonically increasing Thing identifiers.
///
/// The counter never rewinds, so identifiers restored from a checkpoint can
/// never collide with ones allocated later in the same session.
#[derive(Clone, Debug, Default)]
pub struct ThingIdAllocator {
    next: u64,
}

impl ThingIdAllocator {
    /// Creates an allocator whose first identifier is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh identifier.
    pub fn allocate(&mut self) -> ThingId {
        let id = ThingId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Wraps a description into a Thing carrying a fresh identifier.
    pub fn instantiate(&mut self, description: ThingDescription) -> Thing {
        Thing::new(self.allocate(), description)
    }
}

/// Plain authoring form of a Thing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThingDescription {
    /// Optional label used for matching receivers, recipes and teleports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional text read by the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Sprite name consumed by the rendering layer.
    pub sprite: String,
    /// Property tags in insertion order.
    #[serde(default)]
    pub properties: Vec<String>,
}

impl ThingDescription {
    /// Creates a description with the provided sprite and no label, text or tags.
    #[must_use]
    pub fn new(sprite: impl Into<String>) -> Self {
        Self {
            label: None,
            text: None,
            sprite: sprite.into(),
            properties: Vec::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends the provided tags.
    #[must_use]
    pub fn with_properties<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Reports whether the description carries the tag.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.properties.iter().any(|property| property == tag)
    }

    /// Removes the first occurrence of the tag, returning whether one was present.
    pub fn remove_property(&mut self, tag: &str) -> bool {
        match self.properties.iter().position(|property| property == tag) {
            Some(index) => {
                let _ = self.properties.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Runtime Thing: an identifier plus its mutable description.
///
/// Equality and hashing consider the identifier only.
#[derive(Clone, Debug)]
pub struct Thing {
    id: ThingId,
    description: ThingDescription,
}

impl Thing {
    /// Creates a Thing with an explicit identifier.
    #[must_use]
    pub const fn new(id: ThingId, description: ThingDescription) -> Self {
        Self { id, description }
    }

    /// Identifier of the Thing.
    #[must_use]
    pub const fn id(&self) -> ThingId {
        self.id
    }

    /// Current description.
    #[must_use]
    pub const fn description(&self) -> &ThingDescription {
        &self.description
    }

    /// Label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.description.label.as_deref()
    }

    /// Text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.description.text.as_deref()
    }

    /// Reports whether the label equals the provided value.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label() == Some(label)
    }

    /// Reports whether the Thing carries the tag.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.description.is(tag)
    }

    /// Removes the first occurrence of the tag; absent tags are ignored.
    pub fn remove_property(&mut self, tag: &str) {
        let _ = self.description.remove_property(tag);
    }

    /// Replaces the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.description.label = Some(label.into());
    }
}

impl PartialEq for Thing {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Thing {}

impl Hash for Thing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
