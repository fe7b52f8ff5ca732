//! Inspection of arbitrary values through [`Widgets`].
//!
//! Every inspectable type implements [`Inspect`], which has a read-only and an
//! editing form. Aggregates get their implementation from [`inflect_fields!`],
//! containers are generic over their elements.
//!
//! [`inflect_fields!`]: crate::inflect_fields

use std::any::Any;

use bumpalo::Bump;

use crate::{
    options::GuiOptions,
    ui::{
        number::{self, Number, Radix},
        scratch::{FieldKey, ScratchStore},
        widgets::{TextFilter, Widgets},
    },
};

mod bounded;
mod choice;
mod containers;
mod files;
mod primitives;

pub use bounded::*;
pub use choice::*;
pub use files::*;
pub use primitives::*;

/// A value the inspector can show and edit.
pub trait Inspect {
    /// Whether a list of this type can be edited in place, one row per element.
    const INLINE_EDITABLE: bool = false;

    /// Shows the value without allowing edits.
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>);
    /// Shows the value and applies the user's edits to it.
    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>);
}

/// State of one inspection pass.
///
/// Tracks the [`FieldKey`] and nesting depth of the field being visited, and
/// holds the frame's widgets, scratch records and arena.
pub struct Inflector<'a> {
    widgets: &'a mut dyn Widgets,
    scratch: &'a mut ScratchStore,
    arena: &'a Bump,
    options: &'a GuiOptions,
    key: FieldKey,
    depth: u32,
    action: Option<Box<dyn Any>>,
}

impl<'a> Inflector<'a> {
    pub fn new(
        widgets: &'a mut dyn Widgets,
        scratch: &'a mut ScratchStore,
        arena: &'a Bump,
        options: &'a GuiOptions,
    ) -> Self {
        Self {
            widgets,
            scratch,
            arena,
            options,
            key: FieldKey::root(),
            depth: 0,
            action: None,
        }
    }

    pub fn widgets(&mut self) -> &mut dyn Widgets {
        &mut *self.widgets
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    pub fn options(&self) -> &'a GuiOptions {
        self.options
    }

    /// Key of the field being visited.
    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn descend(&mut self, ordinal: u32, deeper: bool, visit: impl FnOnce(&mut Self)) {
        let (key, depth) = (self.key, self.depth);
        self.key = key.child(ordinal);
        self.depth = depth + deeper as u32;
        visit(self);
        self.key = key;
        self.depth = depth;
    }

    /// Visits a field of an aggregate, one level deeper.
    pub fn field<T: Inspect + ?Sized>(&mut self, ordinal: u32, name: &str, value: &mut T) {
        self.descend(ordinal, true, |inflector| value.inflect_mut(name, inflector));
    }

    pub fn field_const<T: Inspect + ?Sized>(&mut self, ordinal: u32, name: &str, value: &T) {
        self.descend(ordinal, true, |inflector| value.inflect(name, inflector));
    }

    /// Visits a vector or matrix component: unnamed and at the same depth.
    pub fn component<T: Inspect + ?Sized>(&mut self, ordinal: u32, value: &mut T) {
        self.descend(ordinal, false, |inflector| value.inflect_mut("", inflector));
    }

    pub fn component_const<T: Inspect + ?Sized>(&mut self, ordinal: u32, value: &T) {
        self.descend(ordinal, false, |inflector| value.inflect("", inflector));
    }

    /// Runs `body` inside a collapsible scope named `name`.
    ///
    /// An empty name opens no scope and always runs `body`. Otherwise `body`
    /// only runs while the scope is open.
    pub fn aggregate(&mut self, name: &str, body: impl FnOnce(&mut Self)) {
        if name.is_empty() {
            body(self);
            return;
        }

        let hash = self.key.scope_hash(self.depth);
        if self.widgets.begin_scope(name, hash) {
            body(self);
            self.widgets.end_scope();
        }
    }

    /// Read-only text of a number.
    pub fn number<N: Number>(&mut self, name: &str, value: N, radix: Radix) {
        self.widgets.label(name, &number::stringify(value, radix));
    }

    /// Edit field of a number, keeping partial input across frames.
    ///
    /// Text that does not parse leaves the value untouched.
    pub fn number_mut<N: Number>(&mut self, name: &str, value: &mut N, radix: Radix) {
        let record = self.scratch.get_or_create(self.key);
        let current = *value;
        record.sync(bytemuck::bytes_of(value), || number::stringify(current, radix));

        let width = number::required_width::<N>(radix);
        if !self.widgets.edit_text(name, &mut record.text, width, number_filter::<N>(radix)) {
            return;
        }

        match number::parse::<N>(&record.text, radix) {
            Some(parsed) => {
                *value = parsed;
                record.commit(bytemuck::bytes_of(value));
            }
            None => log::trace!("Ignoring unparseable input {:?} for {:?}", record.text, name),
        }
    }

    /// Remembers `action` until an enclosing aggregate of type `P` claims it.
    pub fn queue_action<P: 'static>(&mut self, action: fn(&P)) {
        self.action = Some(Box::new(action));
    }

    /// Runs the queued action if it was bound to a method of `P`.
    pub fn dispatch_action<P: 'static>(&mut self, parent: &P) {
        let Some(action) = self.action.take() else {
            return;
        };

        match action.downcast::<fn(&P)>() {
            Ok(action) => action(parent),
            Err(action) => self.action = Some(action),
        }
    }

    /// Ends the pass, dropping any action nothing claimed.
    pub fn finish(mut self) {
        if self.action.take().is_some() {
            log::trace!("Dropping an action no enclosing value could run");
        }
    }
}

fn number_filter<N: Number>(radix: Radix) -> TextFilter {
    match radix {
        Radix::Decimal if N::FLOAT => TextFilter::Float,
        Radix::Decimal => TextFilter::Decimal,
        Radix::Hex => TextFilter::Hex,
        Radix::Octal => TextFilter::Octal,
        Radix::Binary => TextFilter::Binary,
    }
}

/// Implements [`Inspect`] for a struct by visiting the listed fields in order.
///
/// Field labels come from the field names with underscores shown as spaces,
/// unless a literal label follows the field. Actions raised by the fields are
/// offered to the struct after each field.
///
/// ```ignore
/// inflect_fields!(Camera { position, field_of_view: "FOV", near_plane });
/// ```
#[macro_export]
macro_rules! inflect_fields {
    (@label $names:ident, $ordinal:expr, $label:literal) => {
        $label
    };
    (@label $names:ident, $ordinal:expr,) => {
        $names.get($ordinal as usize)
    };
    ($ty:ty { $($field:ident $(: $label:literal)?),* $(,)? }) => {
        impl $crate::ui::Inspect for $ty {
            #[allow(unused_assignments, unused_variables, unused_mut)]
            fn inflect(&self, name: &str, inflector: &mut $crate::ui::Inflector<'_>) {
                static NAMES: $crate::util::names::FieldNames =
                    $crate::util::names::FieldNames::new(stringify!($($field),*));

                inflector.aggregate(name, |inflector| {
                    let mut ordinal = 0u32;
                    $(
                        let label = $crate::inflect_fields!(@label NAMES, ordinal, $($label)?);
                        inflector.field_const(ordinal, label, &self.$field);
                        inflector.dispatch_action(self);
                        ordinal += 1;
                    )*
                });
            }

            #[allow(unused_assignments, unused_variables, unused_mut)]
            fn inflect_mut(&mut self, name: &str, inflector: &mut $crate::ui::Inflector<'_>) {
                static NAMES: $crate::util::names::FieldNames =
                    $crate::util::names::FieldNames::new(stringify!($($field),*));

                inflector.aggregate(name, |inflector| {
                    let mut ordinal = 0u32;
                    $(
                        let label = $crate::inflect_fields!(@label NAMES, ordinal, $($label)?);
                        inflector.field(ordinal, label, &mut self.$field);
                        inflector.dispatch_action(&*self);
                        ordinal += 1;
                    )*
                });
            }
        }
    };
}
