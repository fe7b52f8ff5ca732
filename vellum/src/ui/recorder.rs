//! A headless [`GuiBackend`] that records every widget call as draw commands.
//!
//! User interaction is simulated by queueing [`Input`] events. They are picked
//! up by the next frame, and each one is consumed by the first widget it matches.

use glam::Vec2;

use crate::{
    options::GuiOptions,
    ui::{
        gate::GuiBackend,
        widgets::{ListHandle, Numeric, SliderDesc, TextFilter, Widgets, WindowDesc, WindowState},
        window::WindowFlags,
    },
    util::typedefs::{FastHashMap, SsoString},
};

/// A simulated user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Replaces the contents of the edit field with this label.
    SetText { label: SsoString, text: String },
    Toggle { label: SsoString },
    Click { label: SsoString },
    Select { label: SsoString, index: usize },
    Slide { label: SsoString, value: Numeric },
    Progress { label: SsoString, value: u64 },
    ToggleScope { label: SsoString },
    ToggleTreeNode { label: SsoString },
    CloseWindow { id: u32 },
    CollapseWindow { id: u32 },
    ExpandWindow { id: u32 },
    MoveWindow { id: u32, pos: Vec2 },
    ResizeWindow { id: u32, size: Vec2 },
    FocusWindow { id: u32 },
}

impl Input {
    pub fn set_text(label: &str, text: &str) -> Self {
        Self::SetText {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn toggle(label: &str) -> Self {
        Self::Toggle { label: label.into() }
    }

    pub fn click(label: &str) -> Self {
        Self::Click { label: label.into() }
    }

    pub fn select(label: &str, index: usize) -> Self {
        Self::Select {
            label: label.into(),
            index,
        }
    }

    fn label(&self) -> Option<&str> {
        match self {
            Self::SetText { label, .. }
            | Self::Toggle { label }
            | Self::Click { label }
            | Self::Select { label, .. }
            | Self::Slide { label, .. }
            | Self::Progress { label, .. }
            | Self::ToggleScope { label }
            | Self::ToggleTreeNode { label } => Some(label),
            _ => None,
        }
    }

    fn window(&self) -> Option<u32> {
        match *self {
            Self::CloseWindow { id }
            | Self::CollapseWindow { id }
            | Self::ExpandWindow { id }
            | Self::MoveWindow { id, .. }
            | Self::ResizeWindow { id, .. }
            | Self::FocusWindow { id } => Some(id),
            _ => None,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone)]
enum Op {
    Label = 1,
    EditText,
    Checkbox,
    Button,
    Slider,
    Progress,
    Dropdown,
    RadioGroup,
    VectorHeader,
    MatrixHeader,
    BeginScope,
    EndScope,
    BeginList,
    EndList,
    BeginTreeNode,
    EndTreeNode,
    BeginWindow,
    EndWindow,
}

#[derive(Debug, Copy, Clone)]
struct WindowRecord {
    pos: Vec2,
    size: Vec2,
    collapsed: bool,
}

/// Serialises widget calls into command memory, like the vertex and command
/// buffers of a real immediate mode library.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<u8>,
    queued: Vec<Input>,
    batch: Vec<Option<Input>>,
    scopes: FastHashMap<u64, bool>,
    tree_nodes: FastHashMap<(SsoString, u64), bool>,
    windows: FastHashMap<u32, WindowRecord>,
    focused: Option<u32>,
}

impl RecordingBackend {
    pub fn new(options: &GuiOptions) -> Self {
        Self {
            commands: Vec::with_capacity(options.command_memory_hint),
            ..Self::default()
        }
    }

    /// Queues an interaction for the next frame.
    pub fn queue(&mut self, input: Input) {
        self.queued.push(input);
    }

    /// Inputs of the current frame no widget has consumed yet.
    pub fn pending(&self) -> usize {
        self.batch.iter().flatten().count()
    }

    pub fn is_scope_open(&self, hash: u64) -> Option<bool> {
        self.scopes.get(&hash).copied()
    }

    pub fn is_window_collapsed(&self, id: u32) -> Option<bool> {
        self.windows.get(&id).map(|w| w.collapsed)
    }

    /// Position and size the window was last drawn with.
    pub fn window_bounds(&self, id: u32) -> Option<(Vec2, Vec2)> {
        self.windows.get(&id).map(|w| (w.pos, w.size))
    }

    pub fn focused_window(&self) -> Option<u32> {
        self.focused
    }

    fn take_input(&mut self, accept: impl Fn(&Input) -> bool) -> Option<Input> {
        self.batch
            .iter_mut()
            .find(|slot| matches!(slot, Some(input) if accept(input)))?
            .take()
    }

    fn take_labelled(&mut self, label: &str) -> Option<Input> {
        self.take_input(|input| input.label() == Some(label))
    }

    fn op(&mut self, op: Op) {
        self.commands.push(op as u8);
    }

    fn put_u64(&mut self, value: u64) {
        self.commands.extend_from_slice(&value.to_le_bytes());
    }

    fn put_f32(&mut self, value: f32) {
        self.commands.extend_from_slice(&value.to_le_bytes());
    }

    fn put_bool(&mut self, value: bool) {
        self.commands.push(value as u8);
    }

    fn put_str(&mut self, value: &str) {
        self.put_u64(value.len() as u64);
        self.commands.extend_from_slice(value.as_bytes());
    }

    fn put_vec2(&mut self, value: Vec2) {
        self.put_f32(value.x);
        self.put_f32(value.y);
    }

    fn put_numeric(&mut self, value: Numeric) {
        let (tag, bits) = match value {
            Numeric::Float(v) => (0, v.to_bits()),
            Numeric::Signed(v) => (1, v as u64),
            Numeric::Unsigned(v) => (2, v),
        };
        self.commands.push(tag);
        self.put_u64(bits);
    }

    fn put_names(&mut self, names: &[&str]) {
        self.put_u64(names.len() as u64);
        for name in names {
            self.put_str(name);
        }
    }

    fn choose(&mut self, op: Op, label: &str, selected: usize, names: &[&str]) -> usize {
        let selected = match self.take_labelled(label) {
            Some(Input::Select { index, .. }) if index < names.len() => index,
            _ => selected,
        };
        self.op(op);
        self.put_str(label);
        self.put_u64(selected as u64);
        self.put_names(names);
        selected
    }
}

fn clamp_numeric(value: Numeric, min: Numeric, max: Numeric) -> Option<Numeric> {
    match (value, min, max) {
        (Numeric::Float(v), Numeric::Float(lo), Numeric::Float(hi)) => Some(Numeric::Float(v.clamp(lo, hi))),
        (Numeric::Signed(v), Numeric::Signed(lo), Numeric::Signed(hi)) => Some(Numeric::Signed(v.clamp(lo, hi))),
        (Numeric::Unsigned(v), Numeric::Unsigned(lo), Numeric::Unsigned(hi)) => {
            Some(Numeric::Unsigned(v.clamp(lo, hi)))
        }
        _ => None,
    }
}

impl Widgets for RecordingBackend {
    fn label(&mut self, label: &str, text: &str) {
        self.op(Op::Label);
        self.put_str(label);
        self.put_str(text);
    }

    fn edit_text(&mut self, label: &str, text: &mut String, max_len: usize, filter: TextFilter) -> bool {
        let mut changed = false;
        if let Some(Input::SetText { text: typed, .. }) = self.take_labelled(label) {
            let typed = filter.apply(&typed, max_len);
            changed = typed != *text;
            *text = typed;
        }

        self.op(Op::EditText);
        self.put_str(label);
        self.put_str(text);
        self.put_u64(max_len as u64);
        self.commands.push(filter as u8);
        changed
    }

    fn checkbox(&mut self, label: &str, value: bool, read_only: bool) -> bool {
        let mut value = value;
        if !read_only && matches!(self.take_labelled(label), Some(Input::Toggle { .. })) {
            value = !value;
        }

        self.op(Op::Checkbox);
        self.put_str(label);
        self.put_bool(value);
        self.put_bool(read_only);
        value
    }

    fn button(&mut self, label: &str) -> bool {
        let clicked = matches!(self.take_labelled(label), Some(Input::Click { .. }));
        self.op(Op::Button);
        self.put_str(label);
        clicked
    }

    fn slider(&mut self, label: &str, slider: SliderDesc, read_only: bool) -> Numeric {
        let mut value = slider.value;
        if !read_only {
            if let Some(Input::Slide { value: slid, .. }) = self.take_labelled(label) {
                value = clamp_numeric(slid, slider.min, slider.max).unwrap_or(value);
            }
        }

        self.op(Op::Slider);
        self.put_str(label);
        self.put_numeric(value);
        self.put_numeric(slider.min);
        self.put_numeric(slider.max);
        self.put_numeric(slider.step);
        self.put_bool(read_only);
        value
    }

    fn progress(&mut self, label: &str, value: u64, max: u64, modifiable: bool) -> u64 {
        let mut value = value;
        if modifiable {
            if let Some(Input::Progress { value: set, .. }) = self.take_labelled(label) {
                value = set.min(max);
            }
        }

        self.op(Op::Progress);
        self.put_str(label);
        self.put_u64(value);
        self.put_u64(max);
        self.put_bool(modifiable);
        value
    }

    fn dropdown(&mut self, label: &str, selected: usize, names: &[&str]) -> usize {
        self.choose(Op::Dropdown, label, selected, names)
    }

    fn radio_group(&mut self, label: &str, selected: usize, names: &[&str]) -> usize {
        self.choose(Op::RadioGroup, label, selected, names)
    }

    fn vector_header(&mut self, label: &str, count: usize) {
        self.op(Op::VectorHeader);
        self.put_str(label);
        self.put_u64(count as u64);
    }

    fn matrix_header(&mut self, label: &str, columns: usize, rows: usize) {
        self.op(Op::MatrixHeader);
        self.put_str(label);
        self.put_u64(columns as u64);
        self.put_u64(rows as u64);
    }

    fn begin_scope(&mut self, label: &str, hash: u64) -> bool {
        let toggled = matches!(self.take_labelled(label), Some(Input::ToggleScope { .. }));
        let open = self.scopes.entry(hash).or_insert(true);
        *open ^= toggled;
        let open = *open;

        self.op(Op::BeginScope);
        self.put_str(label);
        self.put_u64(hash);
        self.put_bool(open);
        open
    }

    fn end_scope(&mut self) {
        self.op(Op::EndScope);
    }

    fn begin_list(&mut self, label: &str, count: usize, row_height: f32, inline: bool, id: u64) -> Option<ListHandle> {
        self.op(Op::BeginList);
        self.put_str(label);
        self.put_u64(count as u64);
        self.put_f32(row_height);
        self.put_bool(inline);
        self.put_u64(id);
        Some(ListHandle(id))
    }

    fn end_list(&mut self, list: ListHandle) {
        self.op(Op::EndList);
        self.put_u64(list.0);
    }

    fn begin_tree_node(&mut self, label: &str, is_leaf: bool, expanded: bool, id: u64) -> bool {
        let toggled = matches!(self.take_labelled(label), Some(Input::ToggleTreeNode { .. }));
        let open = self.tree_nodes.entry((SsoString::from(label), id)).or_insert(expanded);
        *open ^= toggled;
        let open = *open;

        self.op(Op::BeginTreeNode);
        self.put_str(label);
        self.put_bool(is_leaf);
        self.put_bool(open);
        self.put_u64(id);
        open
    }

    fn end_tree_node(&mut self) {
        self.op(Op::EndTreeNode);
    }

    fn begin_window(&mut self, desc: &WindowDesc<'_>) -> WindowState {
        let mut record = *self.windows.entry(desc.id).or_insert(WindowRecord {
            pos: desc.pos,
            size: desc.size,
            collapsed: false,
        });
        // The registry clamps what the last frame reported.
        record.pos = desc.pos;
        record.size = desc.size;
        let mut closed = false;

        while let Some(input) = self.take_input(|input| input.window() == Some(desc.id)) {
            match input {
                Input::CloseWindow { .. } if desc.flags.contains(WindowFlags::CLOSE) => closed = true,
                Input::CollapseWindow { .. } if desc.flags.contains(WindowFlags::MINIMIZE) => record.collapsed = true,
                Input::ExpandWindow { .. } => record.collapsed = false,
                Input::MoveWindow { pos, .. } if desc.flags.contains(WindowFlags::MOVE) => record.pos = pos,
                Input::ResizeWindow { size, .. } if desc.flags.contains(WindowFlags::SCALE) => record.size = size,
                Input::FocusWindow { id } => self.focused = Some(id),
                ignored => log::trace!("Window {} ignores {:?}", desc.id, ignored),
            }
        }

        if closed {
            self.windows.remove(&desc.id);
            if self.focused == Some(desc.id) {
                self.focused = None;
            }
        } else {
            self.windows.insert(desc.id, record);
        }

        let focused = self.focused == Some(desc.id);
        self.op(Op::BeginWindow);
        self.put_u64(desc.id as u64);
        self.put_str(desc.title);
        self.put_vec2(record.pos);
        self.put_vec2(record.size);
        self.put_u64(desc.flags.bits() as u64);
        self.put_bool(record.collapsed);
        self.put_bool(focused);

        WindowState {
            content_visible: !closed && !record.collapsed,
            closed,
            pos: record.pos,
            size: record.size,
            focused,
        }
    }

    fn end_window(&mut self) {
        self.op(Op::EndWindow);
    }
}

impl GuiBackend for RecordingBackend {
    fn begin_frame(&mut self) {
        self.commands.clear();
        self.batch.clear();
        self.batch.extend(self.queued.drain(..).map(Some));
    }

    fn end_frame(&mut self) {
        for input in self.batch.drain(..).flatten() {
            log::trace!("No widget consumed {:?}", input);
        }
    }

    fn command_memory(&self) -> &[u8] {
        &self.commands
    }
}
