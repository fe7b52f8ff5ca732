//! The widget capability interface: everything the inspector needs from an
//! immediate mode GUI library.

use glam::Vec2;

use crate::ui::window::WindowFlags;

/// Characters an edit field accepts.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextFilter {
    /// Anything printable.
    #[default]
    Default,
    /// Digits and a leading minus sign.
    Decimal,
    /// Digits, sign, decimal point and exponent.
    Float,
    /// Hex digits and the `#` prefix.
    Hex,
    /// Octal digits.
    Octal,
    /// Binary digits and the `0b` prefix.
    Binary,
}

impl TextFilter {
    pub fn accepts(self, c: char) -> bool {
        match self {
            Self::Default => !c.is_control(),
            Self::Decimal => c.is_ascii_digit() || c == '-',
            Self::Float => c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'),
            Self::Hex => c.is_ascii_hexdigit() || c == '#',
            Self::Octal => c.is_digit(8),
            Self::Binary => matches!(c, '0' | '1' | 'b' | 'B'),
        }
    }

    /// What an edit field holding at most `max_len` bytes keeps of `text`.
    pub fn apply(self, text: &str, max_len: usize) -> String {
        let mut filtered: String = text.chars().filter(|&c| self.accepts(c)).collect();
        filtered.truncate(floor_char_boundary(&filtered, max_len));
        filtered
    }
}

/// Largest index `<= max` that is a char boundary of `text`.
pub(crate) fn floor_char_boundary(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }
    (0..=max).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0)
}

/// A number widened to the representation the GUI library works in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Numeric {
    Float(f64),
    Signed(i64),
    Unsigned(u64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Float(v) => v,
            Self::Signed(v) => v as f64,
            Self::Unsigned(v) => v as f64,
        }
    }
}

/// A drag slider. All four values share one [`Numeric`] kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderDesc {
    pub value: Numeric,
    pub min: Numeric,
    pub max: Numeric,
    pub step: Numeric,
}

/// Opaque token of an open list, handed back to [`Widgets::end_list`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct WindowDesc<'a> {
    pub id: u32,
    pub title: &'a str,
    pub pos: Vec2,
    pub size: Vec2,
    pub flags: WindowFlags,
}

/// What the GUI library reports about a window it just opened.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindowState {
    /// False if the window has no content area, because it is collapsed or closed.
    pub content_visible: bool,
    pub closed: bool,
    pub pos: Vec2,
    pub size: Vec2,
    pub focused: bool,
}

/// Widgets of an immediate mode GUI library.
///
/// Every `begin_*` that reports an open element must be matched by its `end_*`.
/// [`Widgets::begin_window`] is always matched by [`Widgets::end_window`].
pub trait Widgets {
    fn label(&mut self, label: &str, text: &str);
    /// Edit field over `text`, limited to `max_len` bytes. Returns true if the user changed the text.
    fn edit_text(&mut self, label: &str, text: &mut String, max_len: usize, filter: TextFilter) -> bool;
    fn checkbox(&mut self, label: &str, value: bool, read_only: bool) -> bool;
    /// Returns true on the frame the button is clicked.
    fn button(&mut self, label: &str) -> bool;
    fn slider(&mut self, label: &str, slider: SliderDesc, read_only: bool) -> Numeric;
    fn progress(&mut self, label: &str, value: u64, max: u64, modifiable: bool) -> u64;
    fn dropdown(&mut self, label: &str, selected: usize, names: &[&str]) -> usize;
    fn radio_group(&mut self, label: &str, selected: usize, names: &[&str]) -> usize;
    fn vector_header(&mut self, label: &str, count: usize);
    fn matrix_header(&mut self, label: &str, columns: usize, rows: usize);

    /// Collapsible scope. Returns true if it is open.
    fn begin_scope(&mut self, label: &str, hash: u64) -> bool;
    fn end_scope(&mut self);

    fn begin_list(&mut self, label: &str, count: usize, row_height: f32, inline: bool, id: u64) -> Option<ListHandle>;
    fn end_list(&mut self, list: ListHandle);

    fn begin_tree_node(&mut self, label: &str, is_leaf: bool, expanded: bool, id: u64) -> bool;
    fn end_tree_node(&mut self);

    fn begin_window(&mut self, desc: &WindowDesc<'_>) -> WindowState;
    fn end_window(&mut self);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filters() {
        assert!("-12".chars().all(|c| TextFilter::Decimal.accepts(c)));
        assert!(!TextFilter::Decimal.accepts('a'));
        assert!("#FFa0".chars().all(|c| TextFilter::Hex.accepts(c)));
        assert!(!TextFilter::Octal.accepts('8'));
        assert!("0b101".chars().all(|c| TextFilter::Binary.accepts(c)));
        assert!("-1.5e+3".chars().all(|c| TextFilter::Float.accepts(c)));
        assert!(!TextFilter::Default.accepts('\n'));
    }

    #[test]
    fn apply_filters_and_truncates() {
        assert_eq!(TextFilter::Decimal.apply("1a2b3", 8), "123");
        assert_eq!(TextFilter::Default.apply("héllo", 2), "h");
        assert_eq!(TextFilter::Hex.apply("#00FF", 3), "#00");
    }
}
