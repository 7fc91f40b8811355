//! Drag and drop interpretation.
//!
//! A drop either places a new element or moves the selected one, decided by
//! a single `awaiting_second_drop` flag:
//!
//! ```text
//!            drop: create + select + open modal
//!   false ──────────────────────────────────────▶ true
//!     ▲                                            │
//!     └────────────────────────────────────────────┘
//!            drop: move selected element
//! ```
//!
//! The flag is shared by every element on the canvas, so a palette drop
//! while it is `true` moves the selected element instead of creating one.

use serde::{Deserialize, Serialize};

use crate::element::{ElementHandle, ElementId, Position};
use crate::error::BuilderResult;
use crate::session::EditSession;
use crate::storage::KeyValueStore;
use crate::store::ElementStore;

/// Data attached to an in-flight drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPayload {
    /// Dragged from the palette, tagged with the element type.
    ElementType(String),
    /// Dragged from the canvas, tagged with the element's id.
    ElementId(ElementId),
}

/// What a drop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// A new element was placed and the edit modal opened.
    Created(ElementHandle),
    /// The selected element was moved.
    Moved(ElementHandle),
    /// A move was due but nothing was selected.
    NothingToMove,
}

/// Turns drag gestures into store mutations.
#[derive(Debug, Clone, Default)]
pub struct DragDropController {
    transfer: Option<DragPayload>,
    awaiting_second_drop: bool,
}

impl DragDropController {
    /// Create a controller expecting a first placement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next drop repositions instead of creating.
    #[must_use]
    pub const fn awaiting_second_drop(&self) -> bool {
        self.awaiting_second_drop
    }

    /// Payload of the drag in flight, if any.
    #[must_use]
    pub const fn transfer(&self) -> Option<&DragPayload> {
        self.transfer.as_ref()
    }

    /// Drag started on a palette entry.
    pub fn start_palette_drag(&mut self, element_type: impl Into<String>) {
        self.transfer = Some(DragPayload::ElementType(element_type.into()));
    }

    /// Drag started on a placed element.
    pub fn start_element_drag(&mut self, id: ElementId) {
        self.transfer = Some(DragPayload::ElementId(id));
    }

    /// Drag of a placed element ended, whether or not it was dropped.
    pub fn end_drag<S>(&mut self, store: &mut ElementStore<S>)
    where
        S: KeyValueStore,
    {
        self.transfer = None;
        store.select(None);
    }

    /// Resolve a drop at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting mutation cannot be persisted. The
    /// state machine still advances and the in-memory change stands.
    pub fn drop_at<S: KeyValueStore>(
        &mut self,
        position: Position,
        store: &mut ElementStore<S>,
        session: &mut EditSession,
    ) -> BuilderResult<DropOutcome> {
        let payload = self.transfer.take();

        if self.awaiting_second_drop {
            self.awaiting_second_drop = false;
            let Some(handle) = store.selected_handle() else {
                tracing::debug!("Second drop with no selection, nothing moved");
                return Ok(DropOutcome::NothingToMove);
            };
            session.follow_position(position);
            store.move_element(handle, position)?;
            return Ok(DropOutcome::Moved(handle));
        }

        self.awaiting_second_drop = true;
        let element_type = match payload {
            Some(DragPayload::ElementType(element_type)) => element_type,
            Some(DragPayload::ElementId(_)) | None => {
                tracing::debug!("Drop without an element type, using an empty type");
                String::new()
            }
        };
        let text = session.pending().text.clone();
        let style = session.pending().creation_style();
        session.open_at(position);

        let handle = store.create_element(element_type, text, position, style)?;
        Ok(DropOutcome::Created(handle))
    }
}
