use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::util::typedefs::{FastBuildHasher, FastHasher};

/// Identity of a field during inspection: the path of field ordinals from the
/// inspected root, folded into a hash.
///
/// Two fields visited in the same pass never share a key, and a field keeps its
/// key across frames as long as its position in the structure does not change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(u64);

impl FieldKey {
    pub const fn root() -> Self {
        Self(0x9E37_79B9_7F4A_7C15)
    }

    pub fn child(self, ordinal: u32) -> Self {
        let mut hasher = FastHasher::default();
        self.0.hash(&mut hasher);
        ordinal.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Identity of a collapsible scope opened at this key and nesting depth.
    pub fn scope_hash(self, depth: u32) -> u64 {
        let mut hasher = FastHasher::default();
        self.0.hash(&mut hasher);
        depth.hash(&mut hasher);
        hasher.finish()
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Edit state of one field, kept alive only while the field keeps being visited.
#[derive(Debug, Default, Clone)]
pub struct ScratchRecord {
    /// In-progress text of the field's edit box. May be unparseable.
    pub text: String,
    /// Raw bytes of the value when `text` was last produced from, or written to, it.
    pub snapshot: SmallVec<[u8; 16]>,
    synced: bool,
    still_present: bool,
}

impl ScratchRecord {
    /// Regenerates `text` if the value changed behind the editor's back.
    pub fn sync(&mut self, current: &[u8], render: impl FnOnce() -> String) {
        if !self.synced || self.snapshot.as_slice() != current {
            self.snapshot = SmallVec::from_slice(current);
            self.text = render();
            self.synced = true;
        }
    }

    /// Records that the value now holds the bytes the editor wrote.
    pub fn commit(&mut self, current: &[u8]) {
        self.snapshot = SmallVec::from_slice(current);
    }
}

/// Per-field scratch records, collected mark-and-sweep every inspection pass.
#[derive(Debug, Default)]
pub struct ScratchStore {
    records: IndexMap<FieldKey, ScratchRecord, FastBuildHasher>,
}

impl ScratchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record of `key`, creating it on first use, and marks it present.
    pub fn get_or_create(&mut self, key: FieldKey) -> &mut ScratchRecord {
        let record = self.records.entry(key).or_default();
        record.still_present = true;
        record
    }

    pub fn get(&self, key: FieldKey) -> Option<&ScratchRecord> {
        self.records.get(&key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.records.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn begin_frame(&mut self) {
        for record in self.records.values_mut() {
            record.still_present = false;
        }
    }

    /// Evicts every record not visited since [`ScratchStore::begin_frame`].
    pub fn end_frame(&mut self) {
        profiling::scope!("ScratchStore::end_frame");
        for idx in (0..self.records.len()).rev() {
            if !self.records[idx].still_present {
                self.records.swap_remove_index(idx);
            }
        }
    }
}
