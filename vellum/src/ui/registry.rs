use bumpalo::Bump;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::{
    options::GuiOptions,
    ui::{
        widgets::{WindowDesc, Widgets},
        window::Window,
    },
    util::typedefs::FastBuildHasher,
};

/// Owns every window, keyed by id, in insertion order.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: IndexMap<u32, Window, FastBuildHasher>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false and drops `window` if its id is taken.
    pub fn add(&mut self, window: Window) -> bool {
        if self.windows.contains_key(&window.id()) {
            log::warn!("Window id {} is already registered", window.id());
            return false;
        }
        self.windows.insert(window.id(), window);
        true
    }

    /// Returns false if no window has this id.
    pub fn remove(&mut self, id: u32) -> bool {
        self.take(id).is_some()
    }

    /// Removes a window and hands it back.
    pub fn take(&mut self, id: u32) -> Option<Window> {
        self.windows.shift_remove(&id)
    }

    pub fn get(&self, id: u32) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Whether any window holds input focus. Global input handling should
    /// stay out of the way while this is true.
    pub fn any_focused(&self) -> bool {
        self.windows.values().any(Window::has_focus)
    }

    /// Opens every window, renders the open ones and drops the ones the user closed.
    pub fn render(&mut self, widgets: &mut dyn Widgets, arena: &Bump, options: &GuiOptions) {
        profiling::scope!("WindowRegistry::render");

        let mut closed = SmallVec::<[usize; 4]>::new();

        for (idx, window) in self.windows.values_mut().enumerate() {
            let state = widgets.begin_window(&WindowDesc {
                id: window.id(),
                title: window.title(),
                pos: window.pos(),
                size: window.size(),
                flags: window.flags(),
            });

            if !state.content_visible {
                if state.closed {
                    closed.push(idx);
                } else {
                    window.set_visible(false);
                }
            } else {
                window.set_visible(true);
                window.update_location(state.pos, state.size);
                window.render_content(widgets, arena, options);
            }

            window.set_focus(state.focused);
            widgets.end_window();
        }

        for idx in closed.into_iter().rev() {
            if let Some((id, _)) = self.windows.shift_remove_index(idx) {
                log::debug!("Window {id} was closed");
            }
        }
    }
}
