//! Utilities shared between the scene table and the inspector.

pub mod names;
pub mod typedefs;
