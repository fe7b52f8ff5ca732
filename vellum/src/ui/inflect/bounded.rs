use std::{fmt, marker::PhantomData};

use crate::ui::{
    inflect::{Inflector, Inspect},
    widgets::{Numeric, SliderDesc},
};

/// A primitive that can sit behind a slider or progress bar.
pub trait SliderScalar: Copy + PartialOrd + fmt::Debug + 'static {
    const LOWEST: Self;
    const HIGHEST: Self;
    const ZERO: Self;
    /// Increment used when the range declares no step.
    const UNIT: Self;

    /// Rounds down to a multiple of `step`. A zero step leaves the value as is.
    fn quantize(self, step: Self) -> Self;
    fn saturating_add(self, rhs: Self) -> Self;
    fn saturating_sub(self, rhs: Self) -> Self;

    fn widen(self) -> Numeric;
    /// Inverse of [`SliderScalar::widen`]. Values of another kind are ignored.
    fn narrow(value: Numeric) -> Option<Self>;
}

macro_rules! slider_int {
    ($variant:ident, $wide:ty: $($ty:ty),*) => {$(
        impl SliderScalar for $ty {
            const LOWEST: Self = <$ty>::MIN;
            const HIGHEST: Self = <$ty>::MAX;
            const ZERO: Self = 0;
            const UNIT: Self = 1;

            fn quantize(self, step: Self) -> Self {
                match step {
                    0 => self,
                    _ => self / step * step,
                }
            }

            fn saturating_add(self, rhs: Self) -> Self {
                <$ty>::saturating_add(self, rhs)
            }

            fn saturating_sub(self, rhs: Self) -> Self {
                <$ty>::saturating_sub(self, rhs)
            }

            fn widen(self) -> Numeric {
                Numeric::$variant(self as $wide)
            }

            fn narrow(value: Numeric) -> Option<Self> {
                match value {
                    Numeric::$variant(v) => Some(v.clamp(<$ty>::MIN as $wide, <$ty>::MAX as $wide) as $ty),
                    _ => None,
                }
            }
        }
    )*};
}

slider_int!(Unsigned, u64: u8, u16, u32, u64);
slider_int!(Signed, i64: i8, i16, i32, i64);

macro_rules! slider_float {
    ($($ty:ty),*) => {$(
        impl SliderScalar for $ty {
            const LOWEST: Self = <$ty>::MIN;
            const HIGHEST: Self = <$ty>::MAX;
            const ZERO: Self = 0.0;
            const UNIT: Self = 1.0;

            fn quantize(self, step: Self) -> Self {
                if step == 0.0 {
                    return self;
                }
                (self / step).floor() * step
            }

            fn saturating_add(self, rhs: Self) -> Self {
                self + rhs
            }

            fn saturating_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            fn widen(self) -> Numeric {
                Numeric::Float(self as f64)
            }

            fn narrow(value: Numeric) -> Option<Self> {
                match value {
                    Numeric::Float(v) => Some(v as $ty),
                    _ => None,
                }
            }
        }
    )*};
}

slider_float!(f32, f64);

/// Bounds and step of a [`Bounded`] value. Defaults to the full range of `T`
/// without a step.
pub trait SliderRange<T: SliderScalar> {
    const MIN: T = T::LOWEST;
    const MAX: T = T::HIGHEST;
    const STEP: T = T::ZERO;
}

/// The whole range of the value type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FullRange {}

impl<T: SliderScalar> SliderRange<T> for FullRange {}

/// Declares a [`SliderRange`].
///
/// ```ignore
/// slider_range!(pub Percent: f32 = 0.0, 100.0, 0.5);
/// slider_range!(Octave: u8 = 1, 8);
/// ```
#[macro_export]
macro_rules! slider_range {
    ($vis:vis $name:ident: $ty:ty = $min:expr, $max:expr $(, $step:expr)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {}

        impl $crate::ui::SliderRange<$ty> for $name {
            const MIN: $ty = $min;
            const MAX: $ty = $max;
            $(const STEP: $ty = $step;)?
        }
    };
}

/// A number kept inside `R`'s bounds and snapped to its step, shown as a
/// slider or, with `PROGRESS`, as a progress bar.
#[repr(transparent)]
pub struct Bounded<T, R = FullRange, const PROGRESS: bool = false> {
    value: T,
    _range: PhantomData<fn() -> R>,
}

pub type Slider<T, R = FullRange> = Bounded<T, R, false>;
pub type Progress<T, R = FullRange> = Bounded<T, R, true>;

impl<T: SliderScalar, R: SliderRange<T>, const PROGRESS: bool> Bounded<T, R, PROGRESS> {
    pub fn new(value: T) -> Self {
        let mut this = Self {
            value: R::MIN,
            _range: PhantomData,
        };
        this.set(value);
        this
    }

    pub fn get(&self) -> T {
        self.value
    }

    pub fn set(&mut self, value: T) {
        let value = clamp::<T, R>(value).quantize(R::STEP);
        self.value = clamp::<T, R>(value);
    }

    /// Moves one step up, or one unit if the range has no step.
    pub fn increment(&mut self) {
        self.value = clamp::<T, R>(self.value.saturating_add(increment::<T, R>()));
    }

    pub fn decrement(&mut self) {
        self.value = clamp::<T, R>(self.value.saturating_sub(increment::<T, R>()));
    }
}

fn increment<T: SliderScalar, R: SliderRange<T>>() -> T {
    if R::STEP == T::ZERO {
        T::UNIT
    } else {
        R::STEP
    }
}

fn clamp<T: SliderScalar, R: SliderRange<T>>(value: T) -> T {
    if value <= R::MIN {
        R::MIN
    } else if value >= R::MAX {
        R::MAX
    } else {
        value
    }
}

/// Starts at the lower bound if the range has one, else at the upper bound if
/// it has one, else at zero.
impl<T: SliderScalar, R: SliderRange<T>, const PROGRESS: bool> Default for Bounded<T, R, PROGRESS> {
    fn default() -> Self {
        let value = if R::MIN != T::LOWEST {
            R::MIN
        } else if R::MAX != T::HIGHEST {
            R::MAX
        } else {
            T::ZERO
        };
        Self {
            value,
            _range: PhantomData,
        }
    }
}

impl<T: Copy, R, const PROGRESS: bool> Clone for Bounded<T, R, PROGRESS> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, R, const PROGRESS: bool> Copy for Bounded<T, R, PROGRESS> {}

impl<T: PartialEq, R, const PROGRESS: bool> PartialEq for Bounded<T, R, PROGRESS> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug, R, const PROGRESS: bool> fmt::Debug for Bounded<T, R, PROGRESS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: SliderScalar, R: SliderRange<T>, const PROGRESS: bool> Inspect for Bounded<T, R, PROGRESS> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        render(inflector, name, self.value, R::MIN, R::MAX, R::STEP, true, PROGRESS);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        if let Some(value) = render(inflector, name, self.value, R::MIN, R::MAX, R::STEP, false, PROGRESS) {
            self.set(value);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render<T: SliderScalar>(
    inflector: &mut Inflector<'_>,
    name: &str,
    value: T,
    min: T,
    max: T,
    step: T,
    read_only: bool,
    progress: bool,
) -> Option<T> {
    if min > max {
        log::error!("{name:?} has an empty range from {min:?} to {max:?}");
        return None;
    }

    let edited = match (value.widen(), min.widen(), max.widen(), step.widen()) {
        (Numeric::Float(value), Numeric::Float(min), Numeric::Float(max), Numeric::Float(step)) => {
            let resolution = inflector.options().default_slider_resolution;
            render_float(inflector, name, [value, min, max, step], resolution, read_only, progress)?
        }
        (Numeric::Unsigned(value), Numeric::Unsigned(min), Numeric::Unsigned(max), Numeric::Unsigned(step)) => {
            render_unsigned(inflector, name, [value, min, max, step], read_only, progress)?
        }
        (Numeric::Signed(value), Numeric::Signed(min), Numeric::Signed(max), Numeric::Signed(step)) => {
            render_signed(inflector, name, [value, min, max, step], read_only, progress)?
        }
        _ => return None,
    };
    T::narrow(edited)
}

fn changed(edited: Numeric, value: Numeric) -> Option<Numeric> {
    (edited != value).then_some(edited)
}

fn render_float(
    inflector: &mut Inflector<'_>,
    name: &str,
    [value, min, max, step]: [f64; 4],
    resolution: f64,
    read_only: bool,
    progress: bool,
) -> Option<Numeric> {
    let step = if step == 0.0 { resolution * (max - min) } else { step };

    if progress {
        let steps = ((max - min) / step).round();
        if steps.is_nan() || steps.is_infinite() || steps >= u64::MAX as f64 {
            log::error!("Progress bar {name:?} has an invalid step of {step}");
            return None;
        }
        let current = ((value - min) / step).round() as u64;
        let edited = inflector.widgets().progress(name, current, steps as u64, !read_only);
        return (edited != current).then(|| Numeric::Float(edited as f64 * step + min));
    }

    if max > f32::MAX as f64 {
        log::error!("Slider {name:?} exceeds the single precision range, use a progress bar instead");
        return None;
    }

    let desc = SliderDesc {
        value: Numeric::Float(value),
        min: Numeric::Float(min),
        max: Numeric::Float(max),
        step: Numeric::Float(step),
    };
    changed(inflector.widgets().slider(name, desc, read_only), desc.value)
}

fn render_unsigned(
    inflector: &mut Inflector<'_>,
    name: &str,
    [value, min, max, step]: [u64; 4],
    read_only: bool,
    progress: bool,
) -> Option<Numeric> {
    let step = step.max(1);

    if progress {
        let current = value.saturating_sub(min);
        let edited = inflector.widgets().progress(name, current, max - min, !read_only);
        return (edited != current).then(|| Numeric::Unsigned(edited.saturating_add(min)));
    }

    if max >= 1 << 31 {
        log::error!("Slider {name:?} does not fit an i32, use a progress bar instead");
        return None;
    }

    let desc = SliderDesc {
        value: Numeric::Unsigned(value),
        min: Numeric::Unsigned(min),
        max: Numeric::Unsigned(max),
        step: Numeric::Unsigned(step),
    };
    changed(inflector.widgets().slider(name, desc, read_only), desc.value)
}

fn render_signed(
    inflector: &mut Inflector<'_>,
    name: &str,
    [value, min, max, step]: [i64; 4],
    read_only: bool,
    progress: bool,
) -> Option<Numeric> {
    let step = if step == 0 { 1 } else { step };

    if progress {
        let offset = value.abs_diff(min);
        let edited = inflector
            .widgets()
            .progress(name, offset, max.abs_diff(min), !read_only);
        return (edited != offset).then(|| Numeric::Signed(min.saturating_add_unsigned(edited)));
    }

    if min < i32::MIN as i64 || max > i32::MAX as i64 {
        log::error!("Slider {name:?} does not fit an i32");
        return None;
    }

    let desc = SliderDesc {
        value: Numeric::Signed(value),
        min: Numeric::Signed(min),
        max: Numeric::Signed(max),
        step: Numeric::Signed(step),
    };
    changed(inflector.widgets().slider(name, desc, read_only), desc.value)
}

#[cfg(test)]
mod test {
    use super::*;

    crate::slider_range!(Percent: f32 = 0.0, 100.0, 0.5);
    crate::slider_range!(Octave: u8 = 1, 8);
    crate::slider_range!(Below: i16 = i16::MIN, -10);
    crate::slider_range!(Tens: i32 = -100, 100, 10);

    #[test]
    fn clamps_and_quantizes() {
        let mut percent = Slider::<f32, Percent>::new(150.0);
        assert_eq!(percent.get(), 100.0);
        percent.set(42.7);
        assert_eq!(percent.get(), 42.5);
        percent.set(-3.0);
        assert_eq!(percent.get(), 0.0);

        assert_eq!(Slider::<i32, Tens>::new(47).get(), 40);
        assert_eq!(Slider::<i32, Tens>::new(-47).get(), -40);
        assert_eq!(Slider::<u8, Octave>::new(0).get(), 1);
    }

    #[test]
    fn defaults() {
        assert_eq!(Slider::<u8, Octave>::default().get(), 1);
        assert_eq!(Slider::<i16, Below>::default().get(), -10);
        assert_eq!(Slider::<f32>::default().get(), 0.0);
        assert_eq!(Progress::<u64>::default().get(), 0);
    }

    #[test]
    fn stepping() {
        let mut octave = Slider::<u8, Octave>::new(7);
        octave.increment();
        octave.increment();
        assert_eq!(octave.get(), 8);

        let mut tens = Slider::<i32, Tens>::new(-90);
        tens.decrement();
        tens.decrement();
        assert_eq!(tens.get(), -100);

        let mut full = Slider::<u8>::new(255);
        full.increment();
        assert_eq!(full.get(), 255);
    }

    #[test]
    fn narrowing_saturates() {
        assert_eq!(u8::narrow(Numeric::Unsigned(300)), Some(255));
        assert_eq!(i8::narrow(Numeric::Signed(-300)), Some(-128));
        assert_eq!(u8::narrow(Numeric::Float(1.0)), None);
    }
}
