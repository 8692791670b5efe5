//! # SiteCanvas Core
//!
//! Editor logic for the SiteCanvas visual website builder. Nothing here does
//! I/O except the optional file persistence in [`store`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               sitecanvas-core               │
//! ├─────────────────────────────────────────────┤
//! │  Element Model   │  Interaction Engine      │
//! │  - Elements      │  - Pointer/key events    │
//! │  - Canvas order  │  - Drag/resize FSM       │
//! │  - Defaults      │  - Editor session        │
//! ├─────────────────────────────────────────────┤
//! │  Property Fields │  Project Store           │
//! │  - Per-type list │  - Versioned saves       │
//! │  - Patches       │  - JSON file mirror      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod defaults;
pub mod element;
pub mod error;
pub mod event;
pub mod gesture;
pub mod properties;
pub mod schema;
pub mod session;
pub mod store;

pub use canvas::Canvas;
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, Position, Props, Size, StyleValue, Styles,
    DROP_OFFSET, MAX_COORDINATE, MIN_HEIGHT, MIN_WIDTH,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{
    InputEvent, KeyEvent, KeyModifiers, PointerEvent, PointerPhase, PointerTarget, ResizeHandle,
};
pub use gesture::Gesture;
pub use properties::{apply_field, fields_for, read_field, FieldControl, FieldSpec, FieldTarget};
pub use schema::{NewProject, ProjectChanges, ProjectDocument, ProjectStatus};
pub use session::{EditorSession, InteractionMode};
pub use store::{ProjectStore, StoreError};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
