//! Modal edit session: buffers field values and commits them on save.
//!
//! Field edits land in a [`PendingEdit`] on every keystroke and are only
//! written to the [`ElementStore`] when the modal is saved. Cancelling resets
//! the buffer to its defaults; saving keeps text and typography buffered so
//! the next placed element starts from them.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementPatch, ElementStyle, Position};
use crate::error::BuilderResult;
use crate::storage::KeyValueStore;
use crate::store::ElementStore;

/// Default font weight for new edits.
pub const DEFAULT_FONT_WEIGHT: &str = "normal";

/// Parse the leading integer of `input`.
///
/// Leading whitespace and an optional sign are accepted; parsing stops at the
/// first non-digit, so `"12px"` is 12 and `"3.7"` is 3. Input without leading
/// digits yields `None`, the "unset" value.
#[must_use]
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Coordinate axis of a modal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// Per-axis coordinates in the modal. `None` is an empty field.
///
/// Pre-filled axes hold the element's exact position; typed axes hold the
/// parsed integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalCoordinates {
    /// Buffered x value.
    pub x: Option<f64>,
    /// Buffered y value.
    pub y: Option<f64>,
}

impl ModalCoordinates {
    /// Pre-fill both axes from a canvas position.
    #[must_use]
    pub const fn from_position(position: Position) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
        }
    }

    /// Buffered value for `axis`.
    #[must_use]
    pub const fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Replace the buffered value for `axis`.
    pub fn set(&mut self, axis: Axis, value: Option<f64>) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Resolve into a position, keeping `fallback` for unset axes.
    #[must_use]
    pub fn resolve(&self, fallback: Position) -> Position {
        Position {
            x: self.x.unwrap_or(fallback.x),
            y: self.y.unwrap_or(fallback.y),
        }
    }
}

/// Field values buffered while the modal is open.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    /// Text content.
    pub text: String,
    /// Modal x/y fields.
    pub coordinates: ModalCoordinates,
    /// Font size in pixels, without unit.
    pub font_size: Option<i64>,
    /// Font weight.
    pub font_weight: String,
}

impl Default for PendingEdit {
    fn default() -> Self {
        Self {
            text: String::new(),
            coordinates: ModalCoordinates::default(),
            font_size: None,
            font_weight: DEFAULT_FONT_WEIGHT.to_string(),
        }
    }
}

impl PendingEdit {
    /// Buffer pre-filled from an existing element.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        Self {
            text: element.text.clone(),
            coordinates: ModalCoordinates::from_position(element.position),
            font_size: element.style.font_size_px(),
            font_weight: element.style.font_weight.clone(),
        }
    }

    /// Style for a freshly created element; an unset size is stored empty.
    #[must_use]
    pub fn creation_style(&self) -> ElementStyle {
        ElementStyle::new(
            self.font_size.map(format_px).unwrap_or_default(),
            self.font_weight.clone(),
        )
    }

    /// Patch committed on save. Unset fields keep the element's values.
    #[must_use]
    pub fn to_patch(&self, current: &Element) -> ElementPatch {
        let font_size = self
            .font_size
            .map_or_else(|| current.style.font_size.clone(), format_px);
        ElementPatch::new()
            .with_position(self.coordinates.resolve(current.position))
            .with_text(self.text.clone())
            .with_style(ElementStyle::new(font_size, self.font_weight.clone()))
    }
}

fn format_px(size: i64) -> String {
    format!("{size}px")
}

/// Display strings for the open modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    /// Heading, e.g. `"Edit button"`.
    pub title: String,
    /// Text field.
    pub text: String,
    /// X field; empty when unset.
    pub x: String,
    /// Y field; empty when unset.
    pub y: String,
    /// Font size field; empty when unset.
    pub font_size: String,
    /// Font weight field.
    pub font_weight: String,
}

/// Modal lifecycle and field buffering.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pending: PendingEdit,
    open: bool,
}

impl EditSession {
    /// Create a closed session with default buffered values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the modal is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The buffered values.
    #[must_use]
    pub const fn pending(&self) -> &PendingEdit {
        &self.pending
    }

    /// Open for a just-dropped element; only the coordinates are re-filled.
    pub fn open_at(&mut self, position: Position) {
        self.pending.coordinates = ModalCoordinates::from_position(position);
        self.open = true;
    }

    /// Open for an existing element (confirm-key), pre-filling every field.
    pub fn open_for(&mut self, element: &Element) {
        tracing::debug!("Opening edit modal for element {}", element.id);
        self.pending = PendingEdit::from_element(element);
        self.open = true;
    }

    /// Track a reposition while the modal is showing.
    pub fn follow_position(&mut self, position: Position) {
        if self.open {
            self.pending.coordinates = ModalCoordinates::from_position(position);
        }
    }

    /// Buffer the text field. Ignored while the modal is closed.
    pub fn set_text(&mut self, value: impl Into<String>) {
        if self.open {
            self.pending.text = value.into();
        }
    }

    /// Buffer one coordinate field. Non-numeric input clears the field.
    /// Ignored while the modal is closed.
    #[allow(clippy::cast_precision_loss)] // typed pixel values are small
    pub fn set_coordinate(&mut self, axis: Axis, value: &str) {
        if self.open {
            let parsed = parse_leading_int(value).map(|v| v as f64);
            self.pending.coordinates.set(axis, parsed);
        }
    }

    /// Buffer the font size field. Non-numeric input clears the field.
    /// Ignored while the modal is closed.
    pub fn set_font_size(&mut self, value: &str) {
        if self.open {
            self.pending.font_size = parse_leading_int(value);
        }
    }

    /// Buffer the font weight field. Ignored while the modal is closed.
    pub fn set_font_weight(&mut self, value: impl Into<String>) {
        if self.open {
            self.pending.font_weight = value.into();
        }
    }

    /// What a coordinate field shows: the number, or nothing.
    #[must_use]
    pub fn coordinate_display(&self, axis: Axis) -> String {
        self.pending
            .coordinates
            .get(axis)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Close without committing, discarding the buffer.
    pub fn cancel(&mut self) {
        if self.open {
            tracing::debug!("Edit modal cancelled");
        }
        self.open = false;
        self.pending = PendingEdit::default();
    }

    /// Commit the buffer to the selected element as one update, then close.
    ///
    /// The buffer is kept, so the next first placement inherits the saved
    /// text and typography. Returns the updated element, or `None` if the
    /// modal was not open or nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be persisted; the modal is
    /// closed regardless.
    pub fn save<S: KeyValueStore>(
        &mut self,
        store: &mut ElementStore<S>,
    ) -> BuilderResult<Option<Element>> {
        if !self.open {
            return Ok(None);
        }
        self.open = false;

        let Some(handle) = store.selected_handle() else {
            tracing::debug!("Edit saved with no selection, nothing to commit");
            return Ok(None);
        };
        let Some(patch) = store.get(handle).map(|current| self.pending.to_patch(current)) else {
            return Ok(None);
        };
        store.update_element(handle, patch)
    }

    /// Display strings for the modal, or `None` while it is closed.
    #[must_use]
    pub fn view<S>(&self, store: &ElementStore<S>) -> Option<ModalView> {
        if !self.open {
            return None;
        }
        let element_type = store
            .selected()
            .map(|e| e.element_type.as_str())
            .unwrap_or_default();
        Some(ModalView {
            title: format!("Edit {element_type}"),
            text: self.pending.text.clone(),
            x: self.coordinate_display(Axis::X),
            y: self.coordinate_display(Axis::Y),
            font_size: display_optional(self.pending.font_size),
            font_weight: self.pending.font_weight.clone(),
        })
    }
}

fn display_optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
