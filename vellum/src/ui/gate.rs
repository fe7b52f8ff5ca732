use std::time::{Duration, Instant};

use bumpalo::Bump;
use glam::{IVec2, UVec2};

use crate::{
    options::GuiOptions,
    ui::{
        registry::WindowRegistry,
        widgets::Widgets,
        window::Window,
    },
};

/// A GUI library able to produce a frame of draw commands.
pub trait GuiBackend: Widgets {
    /// Clears last frame's draw commands and makes the pending input the current batch.
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
    /// Draw commands of the last frame. Equal memory means an identical picture.
    fn command_memory(&self) -> &[u8];
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Monitor {
    pub offset: IVec2,
    pub size: UVec2,
    pub scale: f32,
}

/// The retained GUI: owns the windows and decides each frame whether the
/// picture needs to be redrawn.
pub struct Gui<B> {
    backend: B,
    windows: WindowRegistry,
    arena: Bump,
    options: GuiOptions,

    snapshot: Vec<u8>,
    force_update: bool,

    monitors: Vec<Monitor>,
    size: UVec2,
    last_frame: Option<Instant>,
    delta: Duration,
}

impl<B: GuiBackend> Gui<B> {
    /// `arena` backs the per-frame allocations of the inspector and is reset every tick.
    pub fn new(backend: B, arena: Bump, options: GuiOptions) -> Self {
        Self {
            backend,
            windows: WindowRegistry::new(),
            arena,
            options,
            snapshot: Vec::with_capacity(options.command_memory_hint),
            force_update: true,
            monitors: Vec::new(),
            size: UVec2::ZERO,
            last_frame: None,
            delta: Duration::ZERO,
        }
    }

    /// Returns false if a window with the same id exists.
    pub fn register_window(&mut self, window: Window) -> bool {
        self.windows.add(window)
    }

    pub fn unregister_window(&mut self, id: u32) -> bool {
        self.windows.remove(id)
    }

    /// Makes the next [`Gui::tick`] report a redraw.
    pub fn request_redraw(&mut self) {
        self.force_update = true;
    }

    pub fn resize(&mut self, size: UVec2) {
        if self.size != size {
            log::debug!("GUI resized to {}x{}", size.x, size.y);
            self.size = size;
            self.force_update = true;
        }
    }

    pub fn set_monitors(&mut self, monitors: &[Monitor]) {
        if self.monitors != monitors {
            log::debug!("Monitor configuration changed, {} monitors", monitors.len());
            self.monitors = monitors.to_vec();
            self.force_update = true;
        }
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowRegistry {
        &mut self.windows
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn options(&self) -> &GuiOptions {
        &self.options
    }

    /// Time between the two last ticks.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Renders every window and returns whether the frame differs from the last one.
    pub fn tick(&mut self) -> bool {
        profiling::scope!("Gui::tick");

        self.arena.reset();
        self.backend.begin_frame();

        let now = Instant::now();
        self.delta = self.last_frame.map_or(Duration::ZERO, |last| now - last);
        self.last_frame = Some(now);

        self.windows.render(&mut self.backend, &self.arena, &self.options);
        self.backend.end_frame();

        let memory = self.backend.command_memory();
        let changed = memory != self.snapshot.as_slice();
        if changed {
            self.snapshot.clear();
            self.snapshot.extend_from_slice(memory);
        }

        let forced = std::mem::take(&mut self.force_update);
        log::trace!("Frame changed: {changed}, forced: {forced}");
        changed || forced
    }
}
