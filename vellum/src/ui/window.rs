use std::any::Any;

use bitflags::bitflags;
use bumpalo::Bump;
use glam::Vec2;

use crate::{
    options::GuiOptions,
    ui::{
        inflect::{Inflector, Inspect},
        scratch::ScratchStore,
        widgets::Widgets,
    },
    util::typedefs::SsoString,
};

bitflags! {
    /// Capabilities and runtime state of a [`Window`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const HAS_TITLE = 1 << 0;
        const BORDER = 1 << 1;
        const VISIBLE = 1 << 2;
        const SCROLL_AUTO_HIDE = 1 << 3;

        const INPUT = 1 << 4;
        const SCROLL = 1 << 5;
        const MOVE = 1 << 6;
        const SCALE = 1 << 7;
        const CLOSE = 1 << 8;
        const MINIMIZE = 1 << 9;

        /// Set by the registry while the window holds input focus.
        const HAS_FOCUS = 1 << 10;

        const STATIC = Self::INPUT.bits() | Self::HAS_TITLE.bits() | Self::BORDER.bits() | Self::VISIBLE.bits();
        const STATIONARY = Self::STATIC.bits() | Self::MINIMIZE.bits() | Self::CLOSE.bits();
        const DEFAULT = Self::MOVE.bits() | Self::SCALE.bits() | Self::STATIONARY.bits();
        const DEFAULT_SCROLL = Self::DEFAULT.bits() | Self::SCROLL.bits();
        const DEFAULT_SCROLL_NO_CLOSE = Self::DEFAULT_SCROLL.bits() & !Self::CLOSE.bits();
        const NO_MENU = Self::INPUT.bits() | Self::VISIBLE.bits() | Self::MOVE.bits() | Self::SCALE.bits();
        const STATIC_NO_MENU = Self::INPUT.bits() | Self::VISIBLE.bits();
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Body of a window, rendered every frame the window is open.
pub trait Panel: Any {
    fn render(&mut self, widgets: &mut dyn Widgets, arena: &Bump, options: &GuiOptions);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A panel inspecting a single value.
///
/// Owns the scratch records of the value's fields, so partial edits survive
/// between frames for as long as the window exists.
pub struct Inspector<T> {
    pub value: T,
    scratch: ScratchStore,
    read_only: bool,
}

impl<T: Inspect + 'static> Inspector<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            scratch: ScratchStore::new(),
            read_only: false,
        }
    }

    pub fn read_only(value: T) -> Self {
        Self {
            read_only: true,
            ..Self::new(value)
        }
    }

    pub fn scratch(&self) -> &ScratchStore {
        &self.scratch
    }
}

impl<T: Inspect + 'static> Panel for Inspector<T> {
    fn render(&mut self, widgets: &mut dyn Widgets, arena: &Bump, options: &GuiOptions) {
        profiling::scope!("Inspector::render");

        self.scratch.begin_frame();
        let mut inflector = Inflector::new(widgets, &mut self.scratch, arena, options);
        if self.read_only {
            self.value.inflect("", &mut inflector);
        } else {
            self.value.inflect_mut("", &mut inflector);
        }
        inflector.finish();
        self.scratch.end_frame();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A window record owned by the [`WindowRegistry`](crate::ui::WindowRegistry).
pub struct Window {
    id: u32,
    title: SsoString,
    pos: Vec2,
    size: Vec2,
    min_size: Option<Vec2>,
    max_size: Option<Vec2>,
    flags: WindowFlags,
    content: Box<dyn Panel>,
}

impl Window {
    pub fn new(title: &str, id: u32, pos: Vec2, size: Vec2, content: impl Panel) -> Self {
        Self {
            id,
            title: SsoString::from(title),
            pos,
            size,
            min_size: None,
            max_size: None,
            flags: WindowFlags::DEFAULT,
            content: Box::new(content),
        }
    }

    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_min_size(mut self, min_size: Vec2) -> Self {
        self.min_size = Some(min_size);
        self.size = self.clamp_size(self.size);
        self
    }

    pub fn with_max_size(mut self, max_size: Vec2) -> Self {
        self.max_size = Some(max_size);
        self.size = self.clamp_size(self.size);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(WindowFlags::VISIBLE, visible);
    }

    pub fn has_focus(&self) -> bool {
        self.flags.contains(WindowFlags::HAS_FOCUS)
    }

    pub fn set_focus(&mut self, focus: bool) {
        self.flags.set(WindowFlags::HAS_FOCUS, focus);
    }

    /// Limits `size` to the window's minimum and maximum size.
    pub fn clamp_size(&self, size: Vec2) -> Vec2 {
        let size = self.min_size.map_or(size, |min| size.max(min));
        self.max_size.map_or(size, |max| size.min(max))
    }

    /// Takes over the bounds the GUI library reports.
    pub fn update_location(&mut self, pos: Vec2, size: Vec2) {
        self.pos = pos;
        self.size = self.clamp_size(size);
    }

    pub fn content<T: Panel>(&self) -> Option<&T> {
        self.content.as_any().downcast_ref()
    }

    pub fn content_mut<T: Panel>(&mut self) -> Option<&mut T> {
        self.content.as_any_mut().downcast_mut()
    }

    pub(crate) fn render_content(&mut self, widgets: &mut dyn Widgets, arena: &Bump, options: &GuiOptions) {
        self.content.render(widgets, arena, options);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
