use std::fmt;

use vellum_types::LightType;

use crate::ui::inflect::{Inflector, Inspect};

/// A closed set of named options.
pub trait Choice: Copy + 'static {
    /// Display names, indexed by ordinal.
    const NAMES: &'static [&'static str];

    fn index(self) -> usize;
    fn from_index(index: usize) -> Option<Self>;
}

impl Choice for LightType {
    const NAMES: &'static [&'static str] = &["Directional", "Spot", "Point"];

    fn index(self) -> usize {
        LightType::index(self)
    }

    fn from_index(index: usize) -> Option<Self> {
        LightType::ALL.get(index).copied()
    }
}

/// Declares a fieldless enum implementing [`Choice`].
///
/// ```ignore
/// choice_enum! {
///     pub enum Filtering { Nearest => "Nearest", Linear => "Linear" }
/// }
/// ```
#[macro_export]
macro_rules! choice_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::ui::Choice for $name {
            const NAMES: &'static [&'static str] = &[$($label),+];

            fn index(self) -> usize {
                self as usize
            }

            fn from_index(index: usize) -> Option<Self> {
                const ALL: &[$name] = &[$($name::$variant),+];
                ALL.get(index).copied()
            }
        }
    };
}

/// Selected index of `value`, or the first option if it has none.
fn selected<E: Choice>(value: E) -> usize {
    let index = value.index();
    if index < E::NAMES.len() {
        index
    } else {
        0
    }
}

fn resolve<E: Choice>(index: usize, fallback: E) -> E {
    E::from_index(index)
        .or_else(|| E::from_index(0))
        .unwrap_or(fallback)
}

/// A [`Choice`] shown as a combo box.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Dropdown<E>(pub E);

/// A [`Choice`] shown as a row of radio buttons.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RadioButtons<E>(pub E);

impl<E: Choice> Inspect for Dropdown<E> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().label(name, E::NAMES[selected(self.0)]);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let index = inflector.widgets().dropdown(name, selected(self.0), E::NAMES);
        self.0 = resolve(index, self.0);
    }
}

impl<E: Choice> Inspect for RadioButtons<E> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.widgets().label(name, E::NAMES[selected(self.0)]);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let index = inflector.widgets().radio_group(name, selected(self.0), E::NAMES);
        self.0 = resolve(index, self.0);
    }
}

/// A button running a method of the value that holds it.
///
/// The click is offered to every enclosing aggregate, innermost first, until
/// one of type `P` runs it.
pub struct Action<P>(pub fn(&P));

impl<P> Clone for Action<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Action<P> {}

impl<P> fmt::Debug for Action<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

impl<P: 'static> Action<P> {
    fn press(self, name: &str, inflector: &mut Inflector<'_>) {
        if inflector.widgets().button(name) {
            inflector.queue_action(self.0);
        }
    }
}

impl<P: 'static> Inspect for Action<P> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        self.press(name, inflector);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        self.press(name, inflector);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    crate::choice_enum! {
        enum Filtering {
            Nearest => "Nearest",
            Linear => "Linear",
            Cubic => "Cubic",
        }
    }

    #[test]
    fn ordinals() {
        assert_eq!(Filtering::NAMES, ["Nearest", "Linear", "Cubic"]);
        assert_eq!(Filtering::Cubic.index(), 2);
        assert_eq!(Filtering::from_index(1), Some(Filtering::Linear));
        assert_eq!(Filtering::from_index(3), None);
    }

    #[test]
    fn out_of_range_selects_first() {
        assert_eq!(resolve(7, Filtering::Cubic), Filtering::Nearest);
        assert_eq!(resolve(7, LightType::Point), LightType::Directional);
        assert_eq!(LightType::NAMES[LightType::Spot.index()], "Spot");
    }
}
