//! Editor state: one store, one drag controller, one edit session.

use crate::drag::{DragDropController, DropOutcome};
use crate::element::{Element, ElementHandle, Position};
use crate::error::BuilderResult;
use crate::event::{Command, Key};
use crate::session::{EditSession, ModalView};
use crate::storage::KeyValueStore;
use crate::store::ElementStore;

/// The complete editor state for one application session.
///
/// Every command is resolved, including persistence, before `dispatch`
/// returns; `&mut self` keeps commands strictly ordered.
///
/// # Example
///
/// ```
/// use builder_core::{Command, Editor, MemoryStore};
///
/// let mut editor = Editor::load(MemoryStore::new()).unwrap();
/// editor
///     .dispatch(Command::PaletteDragStart { element_type: "button".into() })
///     .unwrap();
/// editor.dispatch(Command::Drop { x: 10.0, y: 20.0 }).unwrap();
///
/// assert_eq!(editor.store().len(), 1);
/// assert!(editor.session().is_open());
/// ```
#[derive(Debug)]
pub struct Editor<S> {
    store: ElementStore<S>,
    drag: DragDropController,
    session: EditSession,
}

impl<S: KeyValueStore> Editor<S> {
    /// Start an editor from whatever layout `sink` holds (empty if none).
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted layout cannot be read or parsed.
    pub fn load(sink: S) -> BuilderResult<Self> {
        Ok(Self::with_store(ElementStore::load(sink)?))
    }

    /// Start an editor around an existing store.
    #[must_use]
    pub fn with_store(store: ElementStore<S>) -> Self {
        Self {
            store,
            drag: DragDropController::new(),
            session: EditSession::new(),
        }
    }

    /// Apply one command.
    ///
    /// Unknown element ids, keys without a selection and edits while the
    /// modal is closed are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a resulting mutation cannot be persisted.
    pub fn dispatch(&mut self, command: Command) -> BuilderResult<()> {
        tracing::debug!("Dispatching {}", command.name());

        match command {
            Command::PaletteDragStart { element_type } => {
                self.drag.start_palette_drag(element_type);
            }
            Command::ElementDragStart { id } => self.drag.start_element_drag(id),
            // The canvas accepts every drag; nothing to record.
            Command::DragOver => {}
            Command::Drop { x, y } => {
                let outcome =
                    self.drag
                        .drop_at(Position::new(x, y), &mut self.store, &mut self.session)?;
                if outcome != DropOutcome::NothingToMove {
                    tracing::debug!("Drop at ({x}, {y}): {outcome:?}");
                }
            }
            Command::DragEnd => self.drag.end_drag(&mut self.store),
            Command::Click { id } => {
                if let Some(handle) = self.store.find_by_id(id) {
                    self.store.select(Some(handle));
                } else {
                    tracing::debug!("Click on unknown element {id}");
                }
            }
            Command::Key { key } => self.press_key(&key)?,
            Command::EditText { value } => self.session.set_text(value),
            Command::EditCoordinate { axis, value } => self.session.set_coordinate(axis, &value),
            Command::EditFontSize { value } => self.session.set_font_size(&value),
            Command::EditFontWeight { value } => self.session.set_font_weight(value),
            Command::SaveEdit => {
                self.session.save(&mut self.store)?;
            }
            Command::CancelEdit => self.session.cancel(),
        }
        Ok(())
    }

    fn press_key(&mut self, key: &Key) -> BuilderResult<()> {
        match key {
            Key::Confirm => {
                if self.session.is_open() {
                    return Ok(());
                }
                if let Some(element) = self.store.selected() {
                    self.session.open_for(element);
                }
            }
            Key::Delete => {
                if let Some(handle) = self.store.selected_handle() {
                    self.store.delete_element(handle)?;
                }
            }
            Key::Other(_) => {}
        }
        Ok(())
    }

    /// Re-persist the layout, e.g. before exiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be persisted.
    pub fn flush(&self) -> BuilderResult<()> {
        self.store.flush()
    }
}

impl<S> Editor<S> {
    /// The element store.
    #[must_use]
    pub const fn store(&self) -> &ElementStore<S> {
        &self.store
    }

    /// The drag/drop controller.
    #[must_use]
    pub const fn drag(&self) -> &DragDropController {
        &self.drag
    }

    /// The edit session.
    #[must_use]
    pub const fn session(&self) -> &EditSession {
        &self.session
    }

    /// Live elements with their handles, in creation order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.store.elements()
    }

    /// The selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.store.selected()
    }

    /// Display strings for the edit modal while it is open.
    #[must_use]
    pub fn modal_view(&self) -> Option<ModalView> {
        self.session.view(&self.store)
    }

    /// Consume the editor, returning its store.
    #[must_use]
    pub fn into_store(self) -> ElementStore<S> {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;
    use crate::storage::MemoryStore;

    fn editor_with_element() -> Editor<MemoryStore> {
        let mut editor = Editor::load(MemoryStore::new()).expect("load");
        editor
            .dispatch(Command::PaletteDragStart {
                element_type: "button".to_string(),
            })
            .expect("drag start");
        editor.dispatch(Command::Drop { x: 100.0, y: 100.0 }).expect("drop");
        editor.dispatch(Command::CancelEdit).expect("cancel");
        editor
    }

    #[test]
    fn test_confirm_key_opens_modal_with_coordinates() {
        let mut editor = editor_with_element();
        editor
            .dispatch(Command::Key { key: Key::Confirm })
            .expect("confirm");

        let view = editor.modal_view().expect("modal open");
        assert_eq!(view.title, "Edit button");
        assert_eq!(view.x, "100");
        assert_eq!(view.y, "100");
    }

    #[test]
    fn test_confirm_key_without_selection_does_nothing() {
        let mut editor = editor_with_element();
        editor.dispatch(Command::DragEnd).expect("drag end");
        editor
            .dispatch(Command::Key { key: Key::Confirm })
            .expect("confirm");
        assert!(!editor.session().is_open());
    }

    #[test]
    fn test_confirm_key_while_open_keeps_buffer() {
        let mut editor = editor_with_element();
        editor.dispatch(Command::Key { key: Key::Confirm }).expect("confirm");
        editor
            .dispatch(Command::EditText {
                value: "typed".to_string(),
            })
            .expect("text");
        editor.dispatch(Command::Key { key: Key::Confirm }).expect("confirm");
        assert_eq!(editor.session().pending().text, "typed");
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let mut editor = editor_with_element();
        editor
            .dispatch(Command::Key { key: Key::Delete })
            .expect("delete");
        assert!(editor.store().is_empty());
        assert!(editor.selected().is_none());
    }

    #[test]
    fn test_delete_key_ignores_modal_state() {
        let mut editor = editor_with_element();
        editor.dispatch(Command::Key { key: Key::Confirm }).expect("confirm");
        editor.dispatch(Command::Key { key: Key::Delete }).expect("delete");

        assert!(editor.store().is_empty());
        assert!(editor.session().is_open());
        editor.dispatch(Command::SaveEdit).expect("save");
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_click_selects_by_id() {
        let mut editor = editor_with_element();
        editor.dispatch(Command::DragEnd).expect("drag end");
        assert!(editor.selected().is_none());

        editor
            .dispatch(Command::Click { id: ElementId::new(1) })
            .expect("click");
        assert_eq!(editor.selected().expect("selected").id, ElementId::new(1));

        editor
            .dispatch(Command::Click { id: ElementId::new(99) })
            .expect("click");
        assert_eq!(editor.selected().expect("selected").id, ElementId::new(1));
    }

    #[test]
    fn test_edits_while_closed_do_not_reach_next_drop() {
        let mut editor = Editor::load(MemoryStore::new()).expect("load");
        editor
            .dispatch(Command::EditText {
                value: "stray".to_string(),
            })
            .expect("text");
        editor
            .dispatch(Command::EditFontSize {
                value: "40".to_string(),
            })
            .expect("size");
        assert!(editor.modal_view().is_none());

        editor.dispatch(Command::Drop { x: 5.0, y: 5.0 }).expect("drop");
        let element = editor.selected().expect("created");
        assert_eq!(element.text, "");
        assert_eq!(element.style.font_size, "");
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut editor = editor_with_element();
        editor
            .dispatch(Command::Key {
                key: Key::Other("a".to_string()),
            })
            .expect("key");
        assert_eq!(editor.store().len(), 1);
        assert!(!editor.session().is_open());
    }
}
