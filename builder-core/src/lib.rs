//! # Page Builder Core
//!
//! Element placement and mutation state machine for a drag-and-drop page
//! layout editor. Rendering, the palette catalog and the storage medium are
//! external collaborators; this crate only keeps the model consistent.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! │            (Command dispatch)               │
//! ├──────────────────────┬──────────────────────┤
//! │  DragDropController  │  EditSession         │
//! │  - transfer payload  │  - modal open/close  │
//! │  - second-drop flag  │  - pending edit      │
//! ├──────────────────────┴──────────────────────┤
//! │  ElementStore                               │
//! │  - element arena     - selection            │
//! ├─────────────────────────────────────────────┤
//! │  KeyValueStore (memory / file)              │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod drag;
pub mod element;
pub mod error;
pub mod event;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;

pub use drag::{DragDropController, DragPayload, DropOutcome};
pub use element::{Element, ElementHandle, ElementId, ElementPatch, ElementStyle, Position};
pub use error::{BuilderError, BuilderResult};
pub use event::{Command, Key};
pub use session::{parse_leading_int, Axis, EditSession, ModalCoordinates, ModalView, PendingEdit};
pub use state::Editor;
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult, ELEMENTS_KEY,
};
pub use store::ElementStore;

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
