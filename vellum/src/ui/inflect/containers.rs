use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use indexmap::IndexMap;

use crate::ui::inflect::{Inflector, Inspect};

impl<'a> Inflector<'a> {
    /// A header naming the vector, followed by its unnamed components.
    fn vector<T: Inspect>(&mut self, name: &str, components: &mut [T]) {
        self.widgets().vector_header(name, components.len());
        for (ordinal, component) in components.iter_mut().enumerate() {
            self.component(ordinal as u32, component);
        }
    }

    fn vector_const<T: Inspect>(&mut self, name: &str, components: &[T]) {
        self.widgets().vector_header(name, components.len());
        for (ordinal, component) in components.iter().enumerate() {
            self.component_const(ordinal as u32, component);
        }
    }

    /// Column major matrix components under a `columns x rows` header.
    fn matrix(&mut self, name: &str, columns: usize, rows: usize, components: &mut [f32]) {
        self.widgets().matrix_header(name, columns, rows);
        for (ordinal, component) in components.iter_mut().enumerate() {
            self.component(ordinal as u32, component);
        }
    }

    fn matrix_const(&mut self, name: &str, columns: usize, rows: usize, components: &[f32]) {
        self.widgets().matrix_header(name, columns, rows);
        for (ordinal, component) in components.iter().enumerate() {
            self.component_const(ordinal as u32, component);
        }
    }

    /// A scrollable list of `count` rows. `row` is called for every row while
    /// the list is open.
    fn list(&mut self, name: &str, count: usize, inline: bool, mut row: impl FnMut(&mut Self, usize)) {
        let options = self.options();
        let row_height = if inline {
            options.editable_row_height
        } else {
            options.row_height
        };

        let id = self.key().get();
        let Some(list) = self.widgets().begin_list(name, count, row_height, inline, id) else {
            return;
        };
        for index in 0..count {
            row(self, index);
        }
        self.widgets().end_list(list);
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.vector_const(name, self);
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.vector(name, self);
    }
}

macro_rules! inspect_glam_vector {
    ($($ty:ty),*) => {$(
        impl Inspect for $ty {
            fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
                inflector.vector_const(name, &self.to_array());
            }

            fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
                let mut components = self.to_array();
                inflector.vector(name, &mut components);
                *self = <$ty>::from_array(components);
            }
        }
    )*};
}

inspect_glam_vector!(Vec2, Vec3, Vec4);

macro_rules! inspect_glam_matrix {
    ($($ty:ty: $size:literal),*) => {$(
        impl Inspect for $ty {
            fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
                inflector.matrix_const(name, $size, $size, &self.to_cols_array());
            }

            fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
                let mut components = self.to_cols_array();
                inflector.matrix(name, $size, $size, &mut components);
                *self = <$ty>::from_cols_array(&components);
            }
        }
    )*};
}

inspect_glam_matrix!(Mat2: 2, Mat3: 3, Mat4: 4);

/// Elements are named by their index. Lists of editable primitives are
/// edited in place, one row per element.
impl<T: Inspect> Inspect for Vec<T> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        let arena = inflector.arena();
        inflector.list(name, self.len(), false, |inflector, index| {
            let label = bumpalo::format!(in arena, "{}", index);
            inflector.field_const(index as u32, &label, &self[index]);
        });
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        let arena = inflector.arena();
        inflector.list(name, self.len(), T::INLINE_EDITABLE, |inflector, index| {
            let label = bumpalo::format!(in arena, "{}", index);
            inflector.field(index as u32, &label, &mut self[index]);
        });
    }
}

/// Each entry is a read-only key and an editable value, both unnamed.
fn entries_const<'k, K: Inspect + 'k, V: Inspect + 'k>(
    inflector: &mut Inflector<'_>,
    name: &str,
    entries: impl ExactSizeIterator<Item = (&'k K, &'k V)>,
) {
    let mut entries = entries;
    inflector.list(name, entries.len(), false, |inflector, index| {
        if let Some((key, value)) = entries.next() {
            inflector.field_const(2 * index as u32, "", key);
            inflector.field_const(2 * index as u32 + 1, "", value);
        }
    });
}

fn entries_mut<'k, K: Inspect + 'k, V: Inspect + 'k>(
    inflector: &mut Inflector<'_>,
    name: &str,
    entries: impl ExactSizeIterator<Item = (&'k K, &'k mut V)>,
) {
    let mut entries = entries;
    let inline = K::INLINE_EDITABLE && V::INLINE_EDITABLE;
    inflector.list(name, entries.len(), inline, |inflector, index| {
        if let Some((key, value)) = entries.next() {
            inflector.field_const(2 * index as u32, "", key);
            inflector.field(2 * index as u32 + 1, "", value);
        }
    });
}

impl<K: Inspect, V: Inspect, S: BuildHasher> Inspect for HashMap<K, V, S> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        entries_const(inflector, name, self.iter());
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        entries_mut(inflector, name, self.iter_mut());
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        entries_const(inflector, name, self.iter());
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        entries_mut(inflector, name, self.iter_mut());
    }
}

impl<K: Inspect, V: Inspect, S: BuildHasher> Inspect for IndexMap<K, V, S> {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        entries_const(inflector, name, self.iter());
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        entries_mut(inflector, name, self.iter_mut());
    }
}
