//! Scene object storage and struct inspection for a small renderer test harness.
//!
//! [`SceneObjectTable`] keeps every light, material and geometry object in a
//! dense per category array behind stable handles, and flushes the changed
//! byte ranges to a [`SceneBackend`]. [`Gui`] owns a set of windows, renders
//! [`Inspect`] values into them through a [`Widgets`] implementation and only
//! reports a redraw when the draw commands change.
//!
//! [`SceneObjectTable`]: scene::SceneObjectTable
//! [`SceneBackend`]: scene::SceneBackend
//! [`Gui`]: ui::Gui
//! [`Inspect`]: ui::Inspect
//! [`Widgets`]: ui::Widgets

mod error;
mod options;
pub mod scene;
pub mod ui;
pub mod util;

pub use error::*;
pub use options::*;
pub use vellum_types as types;
