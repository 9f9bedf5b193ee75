#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editor system that turns paint and erase input into grid edit commands.

use errand_core::{Command, Coords, Event, ThingDescription, ThingId};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorInput {
    /// Indicates whether the player painted the brush on this frame.
    pub paint_action: bool,
    /// Indicates whether the player erased on this frame.
    pub erase_action: bool,
    /// Location currently hovered by the cursor.
    pub cursor: Option<Coords>,
}

impl EditorInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(paint_action: bool, erase_action: bool, cursor: Option<Coords>) -> Self {
        Self {
            paint_action,
            erase_action,
            cursor,
        }
    }
}

/// Editor system that paints the selected brush and erases the top-most Thing.
///
/// The editor is only active while movement rules are disabled, which it
/// learns from [`Event::CollisionChanged`].
#[derive(Clone, Debug, Default)]
pub struct Editor {
    editing: bool,
    brush: Option<ThingDescription>,
}

impl Editor {
    /// Creates an inactive editor without a brush.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            editing: false,
            brush: None,
        }
    }

    /// Selects the description painted by subsequent paint actions.
    pub fn select_brush(&mut self, brush: Option<ThingDescription>) {
        self.brush = brush;
    }

    /// Reports whether the editor currently accepts input.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Consumes level events and adapter-derived input to emit edit commands.
    ///
    /// The `top_thing_at` closure should return the Thing drawn on top of the
    /// provided location.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: EditorInput,
        mut top_thing_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Coords) -> Option<ThingId>,
    {
        for event in events {
            if let Event::CollisionChanged { enabled } = event {
                self.editing = !*enabled;
            }
        }

        if !self.editing {
            return;
        }

        let Some(cursor) = input.cursor else {
            return;
        };

        if input.paint_action {
            if let Some(brush) = &self.brush {
                out.push(Command::AddThing {
                    coords: cursor,
                    description: brush.clone(),
                });
            }
        }

        if input.erase_action {
            if let Some(thing) = top_thing_at(cursor) {
                out.push(Command::RemoveThing {
                    coords: cursor,
                    thing,
                });
            }
        }
    }
}
