use std::collections::HashMap;

use vellum::ui::{ListHandle, Numeric, SliderDesc, TextFilter, Widgets, WindowDesc, WindowState};

/// One widget call, as seen by [`MockWidgets`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Label { label: String, text: String },
    EditText { label: String, text: String, max_len: usize, filter: TextFilter },
    Checkbox { label: String, value: bool, read_only: bool },
    Button { label: String },
    Slider { label: String, slider: SliderDesc, read_only: bool },
    Progress { label: String, value: u64, max: u64, modifiable: bool },
    Dropdown { label: String, selected: usize, names: Vec<String> },
    RadioGroup { label: String, selected: usize, names: Vec<String> },
    VectorHeader { label: String, count: usize },
    MatrixHeader { label: String, columns: usize, rows: usize },
    BeginScope { label: String, hash: u64 },
    EndScope,
    BeginList { label: String, count: usize, row_height: f32, inline: bool },
    EndList,
    BeginTreeNode { label: String, is_leaf: bool, expanded: bool },
    EndTreeNode,
    BeginWindow { id: u32, title: String },
    EndWindow,
}

/// Widget capability mock: records every call and answers from a script.
///
/// Scripted answers are keyed by label and consumed by the first widget
/// carrying that label.
#[derive(Debug, Default)]
pub struct MockWidgets {
    pub calls: Vec<Call>,
    edits: HashMap<String, String>,
    toggles: HashMap<String, bool>,
    clicks: Vec<String>,
    selections: HashMap<String, usize>,
    slides: HashMap<String, Numeric>,
    bars: HashMap<String, u64>,
    pub closed_scopes: Vec<String>,
}

impl MockWidgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next edit field labelled `label` reports `text` as typed by the user.
    pub fn type_text(&mut self, label: &str, text: &str) -> &mut Self {
        self.edits.insert(label.into(), text.into());
        self
    }

    pub fn set_checkbox(&mut self, label: &str, value: bool) -> &mut Self {
        self.toggles.insert(label.into(), value);
        self
    }

    pub fn click(&mut self, label: &str) -> &mut Self {
        self.clicks.push(label.into());
        self
    }

    pub fn select(&mut self, label: &str, index: usize) -> &mut Self {
        self.selections.insert(label.into(), index);
        self
    }

    pub fn slide(&mut self, label: &str, value: Numeric) -> &mut Self {
        self.slides.insert(label.into(), value);
        self
    }

    /// The next modifiable progress bar labelled `label` is dragged to `value`.
    pub fn drag_progress(&mut self, label: &str, value: u64) -> &mut Self {
        self.bars.insert(label.into(), value);
        self
    }

    pub fn close_scope(&mut self, label: &str) -> &mut Self {
        self.closed_scopes.push(label.into());
        self
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn checkboxes(&self) -> Vec<(&str, bool)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Checkbox { label, value, .. } => Some((label.as_str(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::EditText { label, text, .. } => Some((label.as_str(), text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Label { label, text } => Some((label.as_str(), text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn scopes(&self) -> Vec<(&str, u64)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::BeginScope { label, hash } => Some((label.as_str(), *hash)),
                _ => None,
            })
            .collect()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|&name| name.to_owned()).collect()
}

impl Widgets for MockWidgets {
    fn label(&mut self, label: &str, text: &str) {
        self.calls.push(Call::Label {
            label: label.into(),
            text: text.into(),
        });
    }

    fn edit_text(&mut self, label: &str, text: &mut String, max_len: usize, filter: TextFilter) -> bool {
        let mut changed = false;
        if let Some(typed) = self.edits.remove(label) {
            let typed = filter.apply(&typed, max_len);
            changed = typed != *text;
            *text = typed;
        }
        self.calls.push(Call::EditText {
            label: label.into(),
            text: text.clone(),
            max_len,
            filter,
        });
        changed
    }

    fn checkbox(&mut self, label: &str, value: bool, read_only: bool) -> bool {
        let value = match self.toggles.remove(label) {
            Some(set) if !read_only => set,
            _ => value,
        };
        self.calls.push(Call::Checkbox {
            label: label.into(),
            value,
            read_only,
        });
        value
    }

    fn button(&mut self, label: &str) -> bool {
        let clicked = match self.clicks.iter().position(|l| l == label) {
            Some(idx) => {
                self.clicks.remove(idx);
                true
            }
            None => false,
        };
        self.calls.push(Call::Button { label: label.into() });
        clicked
    }

    fn slider(&mut self, label: &str, slider: SliderDesc, read_only: bool) -> Numeric {
        let value = match self.slides.remove(label) {
            Some(value) if !read_only => value,
            _ => slider.value,
        };
        self.calls.push(Call::Slider {
            label: label.into(),
            slider,
            read_only,
        });
        value
    }

    fn progress(&mut self, label: &str, value: u64, max: u64, modifiable: bool) -> u64 {
        let value = match self.bars.remove(label) {
            Some(dragged) if modifiable => dragged.min(max),
            _ => value,
        };
        self.calls.push(Call::Progress {
            label: label.into(),
            value,
            max,
            modifiable,
        });
        value
    }

    fn dropdown(&mut self, label: &str, selected: usize, names: &[&str]) -> usize {
        let selected = self.selections.remove(label).unwrap_or(selected);
        self.calls.push(Call::Dropdown {
            label: label.into(),
            selected,
            names: owned(names),
        });
        selected
    }

    fn radio_group(&mut self, label: &str, selected: usize, names: &[&str]) -> usize {
        let selected = self.selections.remove(label).unwrap_or(selected);
        self.calls.push(Call::RadioGroup {
            label: label.into(),
            selected,
            names: owned(names),
        });
        selected
    }

    fn vector_header(&mut self, label: &str, count: usize) {
        self.calls.push(Call::VectorHeader {
            label: label.into(),
            count,
        });
    }

    fn matrix_header(&mut self, label: &str, columns: usize, rows: usize) {
        self.calls.push(Call::MatrixHeader {
            label: label.into(),
            columns,
            rows,
        });
    }

    fn begin_scope(&mut self, label: &str, hash: u64) -> bool {
        self.calls.push(Call::BeginScope {
            label: label.into(),
            hash,
        });
        !self.closed_scopes.iter().any(|l| l == label)
    }

    fn end_scope(&mut self) {
        self.calls.push(Call::EndScope);
    }

    fn begin_list(&mut self, label: &str, count: usize, row_height: f32, inline: bool, id: u64) -> Option<ListHandle> {
        self.calls.push(Call::BeginList {
            label: label.into(),
            count,
            row_height,
            inline,
        });
        Some(ListHandle(id))
    }

    fn end_list(&mut self, _list: ListHandle) {
        self.calls.push(Call::EndList);
    }

    fn begin_tree_node(&mut self, label: &str, is_leaf: bool, expanded: bool, _id: u64) -> bool {
        self.calls.push(Call::BeginTreeNode {
            label: label.into(),
            is_leaf,
            expanded,
        });
        expanded && !is_leaf
    }

    fn end_tree_node(&mut self) {
        self.calls.push(Call::EndTreeNode);
    }

    fn begin_window(&mut self, desc: &WindowDesc<'_>) -> WindowState {
        self.calls.push(Call::BeginWindow {
            id: desc.id,
            title: desc.title.into(),
        });
        WindowState {
            content_visible: true,
            closed: false,
            pos: desc.pos,
            size: desc.size,
            focused: false,
        }
    }

    fn end_window(&mut self) {
        self.calls.push(Call::EndWindow);
    }
}
