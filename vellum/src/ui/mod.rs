//! Retained windows over an immediate mode GUI, and the inspector that fills them.

mod gate;
mod inflect;
pub mod number;
mod recorder;
mod registry;
mod scratch;
mod widgets;
mod window;

pub use gate::{Gui, GuiBackend, Monitor};
pub use inflect::*;
pub use number::Radix;
pub use recorder::{Input, RecordingBackend};
pub use registry::WindowRegistry;
pub use scratch::{FieldKey, ScratchRecord, ScratchStore};
pub use widgets::{ListHandle, Numeric, SliderDesc, TextFilter, Widgets, WindowDesc, WindowState};
pub use window::{Inspector, Panel, Window, WindowFlags};
