//! Compacting table of the objects the renderer draws.

mod handle_alloc;
mod storage;
mod table;

pub use table::{SceneBackend, SceneObjectEntry, SceneObjectTable};
