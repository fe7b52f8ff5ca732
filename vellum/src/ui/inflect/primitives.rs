use std::{fmt, marker::PhantomData};

use half::f16;

use crate::ui::{
    inflect::{Inflector, Inspect},
    number::{Number, Radix},
    widgets::{floor_char_boundary, TextFilter},
};

/// Extra bytes a growable string may grow by in one frame of editing.
const STRING_SLACK: usize = 8;

macro_rules! inspect_number {
    ($($ty:ty),*) => {$(
        impl Inspect for $ty {
            const INLINE_EDITABLE: bool = true;

            fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
                inflector.number(name, *self, Radix::Decimal);
            }

            fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
                inflector.number_mut(name, self, Radix::Decimal);
            }
        }
    )*};
}

inspect_number!(u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);

/// Display base of a [`Formatted`] number.
pub trait Format {
    const RADIX: Radix;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HexFormat {}
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OctFormat {}
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinFormat {}

impl Format for HexFormat {
    const RADIX: Radix = Radix::Hex;
}
impl Format for OctFormat {
    const RADIX: Radix = Radix::Octal;
}
impl Format for BinFormat {
    const RADIX: Radix = Radix::Binary;
}

/// A number shown in a base other than decimal.
#[repr(transparent)]
pub struct Formatted<T, F> {
    pub value: T,
    _format: PhantomData<fn() -> F>,
}

pub type Hex<T> = Formatted<T, HexFormat>;
pub type Oct<T> = Formatted<T, OctFormat>;
pub type Bin<T> = Formatted<T, BinFormat>;

impl<T, F> Formatted<T, F> {
    pub const fn new(value: T) -> Self {
        Self {
            value,
            _format: PhantomData,
        }
    }
}

impl<T: Copy, F> Clone for Formatted<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, F> Copy for Formatted<T, F> {}

impl<T: Default, F> Default for Formatted<T, F> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialEq, F> PartialEq for Formatted<T, F> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Formatted<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T, F> From<T> for Formatted<T, F> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Number, F: Format> Inspect for Formatted<T, F> {
    const INLINE_EDITABLE: bool = true;

    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.number(name, self.value, F::RADIX);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.number_mut(name, &mut self.value, F::RADIX);
    }
}

impl Inspect for bool {
    const INLINE_EDITABLE: bool = true;

    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().checkbox(name, *self, true);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        *self = inflector.widgets().checkbox(name, *self, false);
    }
}

impl Inspect for String {
    const INLINE_EDITABLE: bool = true;

    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().label(name, self);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let max_len = self.capacity().max(self.len()) + STRING_SLACK;
        inflector.widgets().edit_text(name, self, max_len, TextFilter::Default);
    }
}

/// A UTF-8 string in a fixed buffer, padded with zero bytes.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize>(pub [u8; N]);

impl<const N: usize> FixedStr<N> {
    /// Stores as much of `text` as fits, without splitting a character.
    pub fn new(text: &str) -> Self {
        let mut this = Self([0; N]);
        this.set(text);
        this
    }

    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        match std::str::from_utf8(&self.0[..end]) {
            Ok(text) => text,
            Err(e) => std::str::from_utf8(&self.0[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    pub fn set(&mut self, text: &str) {
        let end = floor_char_boundary(text, N);
        self.0 = [0; N];
        self.0[..end].copy_from_slice(&text.as_bytes()[..end]);
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl<const N: usize> Inspect for FixedStr<N> {
    const INLINE_EDITABLE: bool = true;

    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().label(name, self.as_str());
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let mut text = self.as_str().to_owned();
        if inflector.widgets().edit_text(name, &mut text, N, TextFilter::Default) {
            self.set(&text);
        }
    }
}

/// A growable UTF-16 string.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct WideString(pub Vec<u16>);

impl WideString {
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl From<&str> for WideString {
    fn from(text: &str) -> Self {
        Self(text.encode_utf16().collect())
    }
}

impl Inspect for WideString {
    const INLINE_EDITABLE: bool = true;

    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().label(name, &self.to_string_lossy());
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let mut text = self.to_string_lossy();
        let max_len = text.len() + STRING_SLACK;
        if inflector.widgets().edit_text(name, &mut text, max_len, TextFilter::Default) {
            self.0 = text.encode_utf16().collect();
        }
    }
}

/// A UTF-16 string in a fixed buffer, padded with zero units.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FixedWideStr<const N: usize>(pub [u16; N]);

impl<const N: usize> FixedWideStr<N> {
    /// Returns `None` if `text` needs more than `N` units.
    pub fn new(text: &str) -> Option<Self> {
        let mut this = Self([0; N]);
        this.set(text).then_some(this)
    }

    pub fn units(&self) -> &[u16] {
        let end = self.0.iter().position(|&u| u == 0).unwrap_or(N);
        &self.0[..end]
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(self.units())
    }

    /// Replaces the contents. Leaves them untouched and returns false if `text` does not fit.
    pub fn set(&mut self, text: &str) -> bool {
        let units: Vec<u16> = text.encode_utf16().collect();
        if units.len() > N {
            return false;
        }
        self.0 = [0; N];
        self.0[..units.len()].copy_from_slice(&units);
        true
    }
}

impl<const N: usize> Default for FixedWideStr<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> fmt::Debug for FixedWideStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_string_lossy().fmt(f)
    }
}

impl<const N: usize> Inspect for FixedWideStr<N> {
    const INLINE_EDITABLE: bool = true;

    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().label(name, &self.to_string_lossy());
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let mut text = self.to_string_lossy();
        // A UTF-16 unit takes at most three UTF-8 bytes.
        if inflector.widgets().edit_text(name, &mut text, N * 3, TextFilter::Default) && !self.set(&text) {
            log::trace!("Dropping edit of {:?}: {} units do not fit", name, text.encode_utf16().count());
        }
    }
}
