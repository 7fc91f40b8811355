//! Placed elements - the records the page is built from.

use serde::{Deserialize, Serialize};

use crate::session::parse_leading_int;

/// Persisted identifier for an element.
///
/// Ids are allocated by the [`ElementStore`](crate::ElementStore) and never
/// reassigned, so they may become non-contiguous after deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable slot in the element arena.
///
/// Handles stay valid across updates; they go stale once the element is
/// deleted, after which every operation given the handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub(crate) usize);

impl ElementHandle {
    /// Arena slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Canvas coordinates in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge of the canvas.
    pub x: f64,
    /// Pixels from the top edge of the canvas.
    pub y: f64,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Typography stored with an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    /// Font size with unit suffix, e.g. `"16px"`. Empty means unset.
    #[serde(default)]
    pub font_size: String,
    /// CSS font weight, e.g. `"bold"`.
    #[serde(default)]
    pub font_weight: String,
}

impl ElementStyle {
    /// Create a style from already formatted values.
    #[must_use]
    pub fn new(font_size: impl Into<String>, font_weight: impl Into<String>) -> Self {
        Self {
            font_size: font_size.into(),
            font_weight: font_weight.into(),
        }
    }

    /// Numeric font size with the unit suffix stripped.
    #[must_use]
    pub fn font_size_px(&self) -> Option<i64> {
        parse_leading_int(&self.font_size)
    }
}

/// A placed item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Palette category the element was created from. Immutable.
    #[serde(rename = "type")]
    pub element_type: String,
    /// Text content.
    #[serde(default)]
    pub text: String,
    /// Canvas coordinates.
    pub position: Position,
    /// Typography.
    #[serde(default)]
    pub style: ElementStyle,
}

impl Element {
    /// Shallow-merge `patch` over this element.
    ///
    /// The result keeps this element's `id` and `element_type`; each field set
    /// in the patch replaces the whole field (styles are not merged key by key).
    #[must_use]
    pub fn merged(&self, patch: ElementPatch) -> Self {
        Self {
            id: self.id,
            element_type: self.element_type.clone(),
            text: patch.text.unwrap_or_else(|| self.text.clone()),
            position: patch.position.unwrap_or(self.position),
            style: patch.style.unwrap_or_else(|| self.style.clone()),
        }
    }
}

/// Partial update for [`Element`]; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    /// Replacement text.
    pub text: Option<String>,
    /// Replacement position.
    pub position: Option<Position>,
    /// Replacement style.
    pub style: Option<ElementStyle>,
}

impl ElementPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = Some(style);
        self
    }
}
