//! User gestures as explicit commands.
//!
//! Each gesture the rendering layer observes maps to one [`Command`], which
//! is dispatched synchronously to the [`Editor`](crate::Editor).

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::session::Axis;

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Opens the edit modal for the selection (Enter).
    Confirm,
    /// Deletes the selection (Delete).
    Delete,
    /// Any other key; ignored.
    Other(String),
}

impl Key {
    /// Map a DOM-style key name (`"Enter"`, `"Delete"`, ...) to a key.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Confirm,
            "Delete" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }
}

/// All commands the editor accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Command {
    /// Drag started on a palette entry.
    PaletteDragStart {
        /// Palette category being dragged.
        element_type: String,
    },

    /// Drag started on a placed element.
    ElementDragStart {
        /// Id of the dragged element.
        id: ElementId,
    },

    /// Drag passing over the canvas.
    DragOver,

    /// Drag released over the canvas.
    Drop {
        /// Pointer X in canvas pixels.
        x: f64,
        /// Pointer Y in canvas pixels.
        y: f64,
    },

    /// Drag of a placed element ended, dropped or not.
    DragEnd,

    /// Click on a placed element.
    Click {
        /// Id of the clicked element.
        id: ElementId,
    },

    /// Key pressed.
    Key {
        /// The key.
        key: Key,
    },

    /// Modal text field changed.
    EditText {
        /// New field content.
        value: String,
    },

    /// Modal coordinate field changed.
    EditCoordinate {
        /// Which field.
        axis: Axis,
        /// New raw field content.
        value: String,
    },

    /// Modal font size field changed.
    EditFontSize {
        /// New raw field content.
        value: String,
    },

    /// Modal font weight field changed.
    EditFontWeight {
        /// New field content.
        value: String,
    },

    /// Modal "Save Changes".
    SaveEdit,

    /// Modal close button.
    CancelEdit,
}

impl Command {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PaletteDragStart { .. } => "palette_drag_start",
            Self::ElementDragStart { .. } => "element_drag_start",
            Self::DragOver => "drag_over",
            Self::Drop { .. } => "drop",
            Self::DragEnd => "drag_end",
            Self::Click { .. } => "click",
            Self::Key { .. } => "key",
            Self::EditText { .. } => "edit_text",
            Self::EditCoordinate { .. } => "edit_coordinate",
            Self::EditFontSize { .. } => "edit_font_size",
            Self::EditFontWeight { .. } => "edit_font_weight",
            Self::SaveEdit => "save_edit",
            Self::CancelEdit => "cancel_edit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Enter"), Key::Confirm);
        assert_eq!(Key::from_name("Delete"), Key::Delete);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_command_json_shape() {
        let drop: Command =
            serde_json::from_str(r#"{"type":"drop","data":{"x":10,"y":20}}"#).expect("drop");
        assert_eq!(drop, Command::Drop { x: 10.0, y: 20.0 });

        let unit: Command = serde_json::from_str(r#"{"type":"save_edit"}"#).expect("unit");
        assert_eq!(unit, Command::SaveEdit);

        let key: Command =
            serde_json::from_str(r#"{"type":"key","data":{"key":"confirm"}}"#).expect("key");
        assert_eq!(key, Command::Key { key: Key::Confirm });

        let coordinate: Command = serde_json::from_str(
            r#"{"type":"edit_coordinate","data":{"axis":"x","value":"12"}}"#,
        )
        .expect("coordinate");
        assert_eq!(
            coordinate,
            Command::EditCoordinate {
                axis: Axis::X,
                value: "12".to_string()
            }
        );
    }

    #[test]
    fn test_command_name() {
        assert_eq!(Command::DragOver.name(), "drag_over");
        assert_eq!(Command::Click { id: ElementId::new(1) }.name(), "click");
    }
}
