//! Text conversion of primitive numbers in the four display bases.
//!
//! Non-decimal bases always show the raw bit pattern at full width, so a
//! negative `i8` is `#FF` and a float shows its IEEE bits.

use std::{fmt, mem::size_of};

use bytemuck::Pod;
use half::f16;
use num_traits::{Bounded, NumCast, PrimInt, ToPrimitive};

use crate::VellumError;

/// Text budget of a float shown in decimal.
pub const FLOAT_TEXT_WIDTH: usize = 64;

/// Display base of a number.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Radix {
    #[default]
    Decimal,
    /// `#` followed by two upper case digits per byte.
    Hex,
    /// `0` followed by one digit per three bits.
    Octal,
    /// `0b` followed by one digit per bit.
    Binary,
}

impl Radix {
    pub const ALL: [Self; 4] = [Self::Decimal, Self::Hex, Self::Octal, Self::Binary];

    fn base(self) -> u32 {
        match self {
            Self::Decimal => 10,
            Self::Hex => 16,
            Self::Octal => 8,
            Self::Binary => 2,
        }
    }
}

/// A primitive the inspector can edit as text.
pub trait Number: Pod + PartialEq + fmt::Debug {
    const SIGNED: bool;
    const FLOAT: bool;
    const BYTES: usize = size_of::<Self>();

    /// Raw bit pattern, zero extended.
    fn to_bits(self) -> u64;
    /// Inverse of [`Number::to_bits`]. Bits above the type's width are ignored.
    fn from_bits(bits: u64) -> Self;

    fn format_decimal(self) -> String;
    fn parse_decimal(text: &str) -> Option<Self>;
}

/// Parses a decimal integer, saturating at the bounds of `T`.
///
/// Negative text is rejected for unsigned types.
fn parse_saturating<T: PrimInt + Bounded + NumCast>(text: &str) -> Option<T> {
    let wide: i128 = text.parse().ok()?;
    let min = T::min_value().to_i128()?;
    let max = T::max_value().to_i128()?;
    if wide < 0 && min == 0 {
        return None;
    }
    NumCast::from(wide.clamp(min, max))
}

macro_rules! integer_number {
    ($($ty:ty => $unsigned:ty),* $(,)?) => {$(
        impl Number for $ty {
            const SIGNED: bool = <$ty>::MIN != 0;
            const FLOAT: bool = false;

            fn to_bits(self) -> u64 {
                self as $unsigned as u64
            }

            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $ty
            }

            fn format_decimal(self) -> String {
                self.to_string()
            }

            fn parse_decimal(text: &str) -> Option<Self> {
                parse_saturating::<$ty>(text)
            }
        }
    )*};
}

integer_number!(
    u8 => u8, u16 => u16, u32 => u32, u64 => u64,
    i8 => u8, i16 => u16, i32 => u32, i64 => u64,
);

/// Plain notation in the readable range, scientific outside of it.
fn format_float<T: fmt::Display + fmt::LowerExp>(value: T, magnitude: f64) -> String {
    if magnitude != 0.0 && (magnitude >= 1e16 || magnitude < 1e-5) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

impl Number for f32 {
    const SIGNED: bool = true;
    const FLOAT: bool = true;

    fn to_bits(self) -> u64 {
        f32::to_bits(self) as u64
    }

    fn from_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    fn format_decimal(self) -> String {
        format_float(self, self.abs() as f64)
    }

    fn parse_decimal(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl Number for f64 {
    const SIGNED: bool = true;
    const FLOAT: bool = true;

    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn format_decimal(self) -> String {
        format_float(self, self.abs())
    }

    fn parse_decimal(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl Number for f16 {
    const SIGNED: bool = true;
    const FLOAT: bool = true;

    fn to_bits(self) -> u64 {
        f16::to_bits(self) as u64
    }

    fn from_bits(bits: u64) -> Self {
        f16::from_bits(bits as u16)
    }

    fn format_decimal(self) -> String {
        format_float(self, self.to_f64().abs())
    }

    fn parse_decimal(text: &str) -> Option<Self> {
        text.parse::<f32>().ok().map(f16::from_f32)
    }
}

/// Exact worst case text width of an integer of `bytes` bytes.
pub fn integer_width(bytes: usize, signed: bool, radix: Radix) -> usize {
    let bits = bytes * 8;
    match radix {
        Radix::Hex => 1 + bytes * 2,
        Radix::Binary => 2 + bits,
        Radix::Octal => 1 + (bits + 2) / 3,
        // 18446744073709551615 or -9223372036854775808
        Radix::Decimal if bytes == 8 => 20,
        Radix::Decimal => {
            let digits = match bytes {
                1 => 3,
                2 => 5,
                _ => 10,
            };
            digits + signed as usize
        }
    }
}

/// Width of the edit field of `N` in `radix`.
pub fn required_width<N: Number>(radix: Radix) -> usize {
    match (N::FLOAT, radix) {
        (true, Radix::Decimal) => FLOAT_TEXT_WIDTH,
        _ => integer_width(N::BYTES, N::SIGNED, radix),
    }
}

/// Formats `value`, checking it fits [`required_width`].
pub fn try_stringify<N: Number>(value: N, radix: Radix) -> Result<String, VellumError> {
    let bits = value.to_bits();
    let text = match radix {
        Radix::Decimal => value.format_decimal(),
        Radix::Hex => format!("#{:0width$X}", bits, width = N::BYTES * 2),
        Radix::Octal => format!("0{:0width$o}", bits, width = (N::BYTES * 8 + 2) / 3),
        Radix::Binary => format!("0b{:0width$b}", bits, width = N::BYTES * 8),
    };

    if text.len() > required_width::<N>(radix) {
        return Err(VellumError::Invariant("number text exceeds its field width"));
    }
    Ok(text)
}

/// Formats `value`. A text wider than its field is a sizing bug and aborts.
pub fn stringify<N: Number>(value: N, radix: Radix) -> String {
    match try_stringify(value, radix) {
        Ok(text) => text,
        Err(e) => panic!("{e}: {value:?} in {radix:?}"),
    }
}

/// Parses text produced by [`stringify`] or typed by a user.
///
/// Prefixes are optional and hex digits may be lower case. Non-decimal text
/// wider than the type is rejected. Decimal integers saturate.
pub fn parse<N: Number>(text: &str, radix: Radix) -> Option<N> {
    if radix == Radix::Decimal {
        return N::parse_decimal(text);
    }

    let digits = match radix {
        Radix::Hex => text.strip_prefix('#').unwrap_or(text),
        Radix::Binary => text
            .strip_prefix("0b")
            .or_else(|| text.strip_prefix("0B"))
            .unwrap_or(text),
        _ => text,
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix.base())) {
        return None;
    }

    let bits = u64::from_str_radix(digits, radix.base()).ok()?;
    if N::BYTES < 8 && bits >> (N::BYTES * 8) != 0 {
        return None;
    }
    Some(N::from_bits(bits))
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip<N: Number>(values: &[N]) {
        for radix in Radix::ALL {
            for &value in values {
                let text = try_stringify(value, radix).unwrap();
                assert_eq!(parse::<N>(&text, radix), Some(value), "{text} in {radix:?}");
            }
        }
    }

    #[test]
    fn integer_round_trip() {
        round_trip(&[u8::MIN, 1, 200, u8::MAX]);
        round_trip(&[i8::MIN, -1, 0, 1, i8::MAX]);
        round_trip(&[u16::MIN, 4660, u16::MAX]);
        round_trip(&[i16::MIN, -300, i16::MAX]);
        round_trip(&[u32::MIN, 123_456_789, u32::MAX]);
        round_trip(&[i32::MIN, -7, i32::MAX]);
        round_trip(&[u64::MIN, 1 << 40, u64::MAX]);
        round_trip(&[i64::MIN, -1, i64::MAX]);
    }

    #[test]
    fn every_8_and_16_bit_value_round_trips() {
        round_trip(&(u8::MIN..=u8::MAX).collect::<Vec<_>>());
        round_trip(&(i8::MIN..=i8::MAX).collect::<Vec<_>>());
        round_trip(&(u16::MIN..=u16::MAX).collect::<Vec<_>>());
        round_trip(&(i16::MIN..=i16::MAX).collect::<Vec<_>>());
    }

    #[test]
    fn width_table() {
        assert_eq!(integer_width(1, false, Radix::Decimal), 3);
        assert_eq!(integer_width(1, true, Radix::Decimal), 4);
        assert_eq!(integer_width(2, true, Radix::Decimal), 6);
        assert_eq!(integer_width(4, false, Radix::Decimal), 10);
        assert_eq!(integer_width(8, true, Radix::Decimal), 20);
        assert_eq!(integer_width(4, false, Radix::Hex), 9);
        assert_eq!(integer_width(8, false, Radix::Binary), 66);
        assert_eq!(integer_width(8, false, Radix::Octal), 23);
        assert_eq!(integer_width(1, false, Radix::Octal), 4);
    }

    #[test]
    fn extremes_fill_their_width() {
        fn exact<N: Number>(value: N, radix: Radix) {
            assert_eq!(stringify(value, radix).len(), required_width::<N>(radix), "{value:?} {radix:?}");
        }
        exact(u8::MAX, Radix::Decimal);
        exact(i8::MIN, Radix::Decimal);
        exact(i32::MIN, Radix::Decimal);
        exact(u64::MAX, Radix::Decimal);
        exact(i64::MIN, Radix::Decimal);
        for radix in [Radix::Hex, Radix::Octal, Radix::Binary] {
            exact(u64::MAX, radix);
            exact(i16::MIN, radix);
            exact(f32::MAX, radix);
        }
    }

    #[test]
    fn formats() {
        assert_eq!(stringify(200u8, Radix::Decimal), "200");
        assert_eq!(stringify(-1i8, Radix::Hex), "#FF");
        assert_eq!(stringify(0x1234u16, Radix::Hex), "#1234");
        assert_eq!(stringify(5u8, Radix::Binary), "0b00000101");
        assert_eq!(stringify(255u8, Radix::Octal), "0377");
        assert_eq!(stringify(1.0f32, Radix::Hex), "#3F800000");
    }

    #[test]
    fn lenient_input() {
        assert_eq!(parse::<u16>("ff", Radix::Hex), Some(255));
        assert_eq!(parse::<u16>("#fF", Radix::Hex), Some(255));
        assert_eq!(parse::<u8>("101", Radix::Binary), Some(5));
        assert_eq!(parse::<u8>("17", Radix::Octal), Some(15));
    }

    #[test]
    fn rejected_input() {
        assert_eq!(parse::<u8>("", Radix::Decimal), None);
        assert_eq!(parse::<i32>("-", Radix::Decimal), None);
        assert_eq!(parse::<u8>("-5", Radix::Decimal), None);
        assert_eq!(parse::<u8>("12a", Radix::Decimal), None);
        assert_eq!(parse::<u8>("#", Radix::Hex), None);
        assert_eq!(parse::<u8>("#100", Radix::Hex), None);
        assert_eq!(parse::<u8>("0b", Radix::Binary), None);
        assert_eq!(parse::<u8>("102", Radix::Binary), None);
        assert_eq!(parse::<u8>("8", Radix::Octal), None);
        assert_eq!(parse::<u16>("+1", Radix::Hex), None);
    }

    #[test]
    fn decimal_saturates() {
        assert_eq!(parse::<u8>("300", Radix::Decimal), Some(u8::MAX));
        assert_eq!(parse::<i8>("-300", Radix::Decimal), Some(i8::MIN));
        assert_eq!(parse::<i16>("40000", Radix::Decimal), Some(i16::MAX));
    }

    #[test]
    fn floats() {
        assert_eq!(stringify(1.5f32, Radix::Decimal), "1.5");
        assert_eq!(stringify(0.0f64, Radix::Decimal), "0");
        assert_eq!(stringify(1e20f64, Radix::Decimal), "1e20");
        assert_eq!(stringify(f16::from_f32(0.5), Radix::Decimal), "0.5");
        assert!(stringify(f64::MAX, Radix::Decimal).len() <= FLOAT_TEXT_WIDTH);
        assert!(stringify(f64::MIN_POSITIVE, Radix::Decimal).len() <= FLOAT_TEXT_WIDTH);

        assert_eq!(parse::<f32>("2.25", Radix::Decimal), Some(2.25));
        assert_eq!(parse::<f32>("1.", Radix::Decimal), Some(1.0));
        assert_eq!(parse::<f32>("abc", Radix::Decimal), None);
        assert_eq!(parse::<f32>("#40000000", Radix::Hex), Some(2.0));
        round_trip(&[f32::MIN, -0.5, 0.0, 3.25, f32::MAX]);
        round_trip(&[f64::MIN, 1e-300, f64::MAX]);
        round_trip(&[f16::MIN, f16::ONE, f16::MAX]);
    }
}
