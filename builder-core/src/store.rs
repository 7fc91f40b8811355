//! Canonical element list plus selection, persisted after every mutation.
//!
//! Elements live in an arena addressed by [`ElementHandle`]. Slots are kept
//! in creation order and deleted slots become tombstones, so handles never
//! move and an update writes back into the same slot. Tombstones are kept
//! for the life of the store; iteration and persistence skip them, and the
//! live count is tracked separately.

use crate::element::{Element, ElementHandle, ElementId, ElementPatch, ElementStyle, Position};
use crate::error::{BuilderError, BuilderResult};
use crate::storage::{KeyValueStore, ELEMENTS_KEY};

/// Ordered element arena with at-most-one selection.
///
/// # Example
///
/// ```
/// use builder_core::{ElementStore, ElementStyle, MemoryStore, Position};
///
/// let mut store = ElementStore::new(MemoryStore::new());
/// let handle = store
///     .create_element("button", "Click me", Position::new(10.0, 20.0), ElementStyle::default())
///     .unwrap();
///
/// assert_eq!(store.selected_handle(), Some(handle));
/// ```
#[derive(Debug)]
pub struct ElementStore<S> {
    slots: Vec<Option<Element>>,
    selected: Option<ElementHandle>,
    highest_id: u64,
    live: usize,
    sink: S,
}

impl<S: KeyValueStore> ElementStore<S> {
    /// Create an empty store that persists into `sink`.
    ///
    /// Nothing is read from the sink; use [`ElementStore::load`] to restore a
    /// previous session.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            slots: Vec::new(),
            selected: None,
            highest_id: 0,
            live: 0,
            sink,
        }
    }

    /// Restore the element list persisted under [`ELEMENTS_KEY`].
    ///
    /// An absent blob yields an empty store. Selection always starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PersistenceFailed`] if the sink cannot be read
    /// and [`BuilderError::Serialization`] if the blob is not a valid element
    /// list.
    pub fn load(sink: S) -> BuilderResult<Self> {
        let Some(blob) = sink.get(ELEMENTS_KEY)? else {
            tracing::info!("No persisted layout found, starting empty");
            return Ok(Self::new(sink));
        };
        let elements: Vec<Element> = serde_json::from_str(&blob)?;
        tracing::info!("Loaded {} persisted elements", elements.len());

        let highest_id = elements.iter().map(|e| e.id.get()).max().unwrap_or(0);
        Ok(Self {
            live: elements.len(),
            slots: elements.into_iter().map(Some).collect(),
            selected: None,
            highest_id,
            sink,
        })
    }

    /// Append a new element and select it.
    ///
    /// The id is `count + 1` while nothing has been deleted; after deletes it
    /// is bumped past the highest id ever issued so ids stay unique and
    /// strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted. The element
    /// is still appended and selected in memory.
    pub fn create_element(
        &mut self,
        element_type: impl Into<String>,
        text: impl Into<String>,
        position: Position,
        style: ElementStyle,
    ) -> BuilderResult<ElementHandle> {
        let next = (self.len() as u64).max(self.highest_id) + 1;
        self.highest_id = next;

        let element = Element {
            id: ElementId::new(next),
            element_type: element_type.into(),
            text: text.into(),
            position,
            style,
        };
        tracing::debug!(
            "Creating element {} of type {:?} at ({}, {})",
            element.id,
            element.element_type,
            position.x,
            position.y
        );

        let handle = ElementHandle(self.slots.len());
        self.slots.push(Some(element));
        self.live += 1;
        self.selected = Some(handle);
        self.persist()?;
        Ok(handle)
    }

    /// Replace the element at `handle` with `patch` merged over it.
    ///
    /// Returns the new element value, or `None` (without persisting) if the
    /// handle no longer refers to a live element.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn update_element(
        &mut self,
        handle: ElementHandle,
        patch: ElementPatch,
    ) -> BuilderResult<Option<Element>> {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            return Ok(None);
        };
        let Some(current) = slot.as_ref() else {
            return Ok(None);
        };

        let updated = current.merged(patch);
        tracing::debug!("Updating element {}", updated.id);
        *slot = Some(updated.clone());
        self.persist()?;
        Ok(Some(updated))
    }

    /// Move the element at `handle` to `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn move_element(
        &mut self,
        handle: ElementHandle,
        position: Position,
    ) -> BuilderResult<Option<Element>> {
        self.update_element(handle, ElementPatch::new().with_position(position))
    }

    /// Remove the element at `handle`, clearing the selection if it pointed
    /// there.
    ///
    /// Returns the removed element, or `None` (without persisting) if the
    /// handle is stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn delete_element(&mut self, handle: ElementHandle) -> BuilderResult<Option<Element>> {
        let Some(removed) = self.slots.get_mut(handle.0).and_then(Option::take) else {
            return Ok(None);
        };
        self.live -= 1;
        tracing::debug!("Deleted element {}", removed.id);

        if self.selected == Some(handle) {
            self.selected = None;
        }
        self.persist()?;
        Ok(Some(removed))
    }

    /// Set or clear the selection. Selection is not persisted.
    ///
    /// Selecting a stale handle leaves the current selection unchanged.
    pub fn select(&mut self, handle: Option<ElementHandle>) {
        match handle {
            Some(h) if self.get(h).is_none() => {
                tracing::debug!("Ignoring selection of stale handle {}", h.0);
            }
            other => self.selected = other,
        }
    }

    /// Re-persist the current list, e.g. on exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub fn flush(&self) -> BuilderResult<()> {
        self.persist()
    }

    fn persist(&self) -> BuilderResult<()> {
        let blob = self.to_json()?;
        if let Err(e) = self.sink.set(ELEMENTS_KEY, &blob) {
            tracing::warn!("Failed to persist {} elements: {e}", self.len());
            return Err(BuilderError::PersistenceFailed(e));
        }
        Ok(())
    }
}

impl<S> ElementStore<S> {
    /// Get the element at `handle` if it is still live.
    #[must_use]
    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    /// Live elements with their handles, in creation order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (ElementHandle(i), e)))
    }

    /// Find the handle of the element with the given persisted id.
    #[must_use]
    pub fn find_by_id(&self, id: ElementId) -> Option<ElementHandle> {
        self.elements()
            .find(|(_, e)| e.id == id)
            .map(|(handle, _)| handle)
    }

    /// Handle of the selected element.
    #[must_use]
    pub fn selected_handle(&self) -> Option<ElementHandle> {
        self.selected
    }

    /// The selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selected.and_then(|h| self.get(h))
    }

    /// Whether `handle` is the selected element.
    #[must_use]
    pub fn is_selected(&self, handle: ElementHandle) -> bool {
        self.selected == Some(handle)
    }

    /// Number of live elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Check if the store holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Owned copy of the live elements, in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements().map(|(_, e)| e.clone()).collect()
    }

    /// Serialize the live elements to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BuilderResult<String> {
        let elements: Vec<&Element> = self.elements().map(|(_, e)| e).collect();
        serde_json::to_string(&elements).map_err(BuilderError::Serialization)
    }

    /// The persistence sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
