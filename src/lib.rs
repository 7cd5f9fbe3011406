//! Synchronization core for a vector-shape image annotator.
//!
//! Users draw, edit, and annotate shapes (polygons, rectangles, duplicated
//! or transformed regions) over a large zoomable image. The drawing itself
//! belongs to an external canvas/map engine and persistence to an external
//! annotation store; this crate owns everything between the two: which
//! shapes are persisted and which are dirty, how shape identity maps to
//! record identity, the exclusive-activation tool state, single-slot
//! selection, and the save/delete protocol with optimistic state and
//! rollback.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`sync`] | The [`sync::Annotator`] orchestrator and save/delete protocol |
//! | [`geometry`] | Shape geometry model and transport codec |
//! | [`save_state`] | Per-shape {Saved, Unsaved} flag and redraw requests |
//! | [`ident`] | Shape-id ↔ record-id identity map |
//! | [`tools`] | Exclusive editing-tool state machine |
//! | [`keys`] | Keyboard chord → tool/save command mapping |
//! | [`selection`] | Single-slot selection with ordered change events |
//! | [`engine`] | Canvas/map engine capability trait and event contract |
//! | [`store`] | Annotation store capability trait and HTTP client |
//! | [`ui`] | Detail form / overview / status collaborator trait |
//! | [`error`] | Protocol error taxonomy |
//! | [`consts`] | Style names and the default tool |

pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ident;
pub mod keys;
pub mod save_state;
pub mod selection;
pub mod store;
pub mod sync;
pub mod tools;
pub mod ui;
