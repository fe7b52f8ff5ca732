use std::ops::Range;

use vellum_types::{SceneObjectCategory, SceneObjectHandle};

/// Dense byte storage of one scene object category.
///
/// `cpu` is where adds and updates land. `mirror` is the backend-visible copy;
/// it only receives bytes on compaction and flush. Slots `[0, count)` are in use,
/// some of them may be holes (no owner) until the next compaction.
#[derive(Debug)]
pub(crate) struct CategoryStorage {
    category: SceneObjectCategory,
    stride: usize,
    capacity: u32,
    count: u32,

    cpu: Vec<u8>,
    mirror: Vec<u8>,
    dirty: Vec<bool>,
    owners: Vec<Option<SceneObjectHandle>>,
}

impl CategoryStorage {
    pub fn new(category: SceneObjectCategory, capacity: u32) -> Self {
        let stride = category.stride();
        let bytes = stride * capacity as usize;
        Self {
            category,
            stride,
            capacity,
            count: 0,
            cpu: vec![0; bytes],
            mirror: vec![0; bytes],
            dirty: vec![false; capacity as usize],
            owners: vec![None; capacity as usize],
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Slots in use, holes included.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn owner(&self, slot: u32) -> Option<SceneObjectHandle> {
        self.owners[slot as usize]
    }

    pub fn is_dirty(&self, slot: u32) -> bool {
        self.dirty[slot as usize]
    }

    fn byte_range(&self, slots: Range<u32>) -> Range<usize> {
        slots.start as usize * self.stride..slots.end as usize * self.stride
    }

    pub fn bytes(&self, slot: u32) -> &[u8] {
        &self.cpu[self.byte_range(slot..slot + 1)]
    }

    /// The backend-visible bytes of every slot in use.
    pub fn mirror(&self) -> &[u8] {
        &self.mirror[self.byte_range(0..self.count)]
    }

    /// Lowest hole, or the next unused slot if there are none.
    pub fn first_free(&self) -> Option<u32> {
        self.owners[..self.count as usize]
            .iter()
            .position(Option::is_none)
            .map(|slot| slot as u32)
            .or_else(|| (self.count < self.capacity).then_some(self.count))
    }

    pub fn has_holes(&self) -> bool {
        self.owners[..self.count as usize].iter().any(Option::is_none)
    }

    pub fn live_slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.owners[..self.count as usize]
            .iter()
            .enumerate()
            .filter_map(|(slot, owner)| owner.map(|_| slot as u32))
    }

    pub fn insert(&mut self, slot: u32, owner: SceneObjectHandle, data: &[u8]) {
        debug_assert!(self.owners[slot as usize].is_none());
        if slot == self.count {
            self.count += 1;
        }
        let range = self.byte_range(slot..slot + 1);
        self.cpu[range].copy_from_slice(data);
        self.owners[slot as usize] = Some(owner);
        self.dirty[slot as usize] = true;
    }

    /// Overwrites a slot. Returns false and leaves the slot clean if the bytes are unchanged.
    pub fn write(&mut self, slot: u32, data: &[u8]) -> bool {
        let range = self.byte_range(slot..slot + 1);
        if self.cpu[range.clone()] == *data {
            return false;
        }
        self.cpu[range].copy_from_slice(data);
        self.dirty[slot as usize] = true;
        true
    }

    pub fn vacate(&mut self, slot: u32) {
        self.owners[slot as usize] = None;
        self.dirty[slot as usize] = false;
    }

    /// Rearranges the live slots so that `order[i]` ends up in slot `i`.
    ///
    /// Every slot whose position changes is marked dirty. Returns the new owner
    /// of each slot in use.
    pub fn relocate(&mut self, order: &[u32]) -> &[Option<SceneObjectHandle>] {
        profiling::scope!("CategoryStorage::relocate");

        let mut owners = vec![None; self.owners.len()];
        let mut dirty = vec![false; self.dirty.len()];

        for (new, &old) in order.iter().enumerate() {
            let src = self.byte_range(old..old + 1);
            let dst = self.byte_range(new as u32..new as u32 + 1);
            self.mirror[dst].copy_from_slice(&self.cpu[src]);

            owners[new] = self.owners[old as usize];
            dirty[new] = self.dirty[old as usize] || new as u32 != old;
        }

        self.owners = owners;
        self.dirty = dirty;
        self.count = order.len() as u32;

        // Keep both copies in the same layout.
        let live = self.byte_range(0..self.count);
        self.cpu[live.clone()].copy_from_slice(&self.mirror[live]);

        log::trace!("Compacted {} into {} slots", self.category.name(), self.count);

        &self.owners[..self.count as usize]
    }

    /// Copies every maximal run of dirty slots to the mirror and hands each
    /// run to `write` as one byte range. Flushed slots are clean afterwards.
    pub fn flush(&mut self, mut write: impl FnMut(usize, &[u8])) {
        let mut run_start = None;

        for slot in 0..=self.count {
            let dirty = slot < self.count && self.dirty[slot as usize];
            match (run_start, dirty) {
                (None, true) => run_start = Some(slot),
                (Some(start), false) => {
                    let range = self.byte_range(start..slot);
                    self.mirror[range.clone()].copy_from_slice(&self.cpu[range.clone()]);
                    self.dirty[start as usize..slot as usize].fill(false);

                    log::trace!("Flushing {} slots {}..{}", self.category.name(), start, slot);
                    write(range.start, &self.mirror[range]);
                    run_start = None;
                }
                _ => {}
            }
        }
    }
}
