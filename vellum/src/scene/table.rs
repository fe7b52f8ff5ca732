use bytemuck::{bytes_of, pod_read_unaligned};
use vellum_types::{
    Light, LightType, SceneGraphInfo, SceneObject, SceneObjectCategory, SceneObjectHandle,
};

use crate::{
    options::SceneLimits,
    scene::{handle_alloc::HandleAllocator, storage::CategoryStorage},
    util::typedefs::FastHashMap,
    SceneTableError,
};

/// Receives the bytes the scene object table flushes.
///
/// Implemented by the graphics backend; offsets are in bytes from the start of
/// the respective buffer.
pub trait SceneBackend {
    fn write_objects(&mut self, category: SceneObjectCategory, byte_offset: usize, data: &[u8]);
    fn write_material_indices(&mut self, byte_offset: usize, data: &[u8]);
    fn write_info(&mut self, info: &SceneGraphInfo);
}

/// Where a live object currently lives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SceneObjectEntry {
    pub category: SceneObjectCategory,
    pub slot: u32,
    /// Material used by a geometry object.
    pub material: Option<SceneObjectHandle>,
}

/// Fixed set of dense, per-category object arrays addressed through stable handles.
///
/// Adds fill the lowest hole first, removals leave holes behind, and
/// [`SceneObjectTable::compact_and_flush`] closes the holes, keeps lights sorted
/// by [`LightType`] and flushes the minimal set of byte ranges to the backend.
pub struct SceneObjectTable {
    limits: SceneLimits,
    storages: [CategoryStorage; SceneObjectCategory::COUNT],
    entries: FastHashMap<SceneObjectHandle, SceneObjectEntry>,
    handles: HandleAllocator,
    info: SceneGraphInfo,
    /// Material slot of every live geometry object, triangles first, then spheres, cubes and planes.
    material_indices: Vec<u32>,
    geometry_count: usize,
}

impl SceneObjectTable {
    pub fn new(limits: SceneLimits) -> Result<Self, SceneTableError> {
        let requested: u64 = SceneObjectCategory::ALL.iter().map(|&c| limits.get(c) as u64).sum();
        if requested > u32::MAX as u64 {
            return Err(SceneTableError::TooManyObjects { requested });
        }

        let geometry: u64 = SceneObjectCategory::ALL
            .iter()
            .filter(|c| c.is_geometry())
            .map(|&c| limits.get(c) as u64)
            .sum();

        Ok(Self {
            limits,
            storages: SceneObjectCategory::ALL.map(|c| CategoryStorage::new(c, limits.get(c))),
            entries: FastHashMap::default(),
            handles: HandleAllocator::new(),
            info: SceneGraphInfo::default(),
            material_indices: vec![0; geometry as usize],
            geometry_count: 0,
        })
    }

    /// Adds an object. Returns `None` if its category is at capacity.
    pub fn add<T: SceneObject>(&mut self, object: &T) -> Option<SceneObjectHandle> {
        self.add_raw(T::CATEGORY, bytes_of(object))
    }

    /// Adds every object in order, stopping at the first one that does not fit.
    pub fn add_all<T: SceneObject>(&mut self, objects: &[T]) -> Vec<SceneObjectHandle> {
        objects.iter().map_while(|object| self.add(object)).collect()
    }

    /// Untyped [`SceneObjectTable::add`]. `data` must be exactly one object of `category`.
    pub fn add_bytes(
        &mut self,
        category: SceneObjectCategory,
        data: &[u8],
    ) -> Result<Option<SceneObjectHandle>, SceneTableError> {
        check_size(category, data)?;
        Ok(self.add_raw(category, data))
    }

    fn add_raw(&mut self, category: SceneObjectCategory, data: &[u8]) -> Option<SceneObjectHandle> {
        let storage = &mut self.storages[category.index()];

        let Some(slot) = storage.first_free() else {
            log::warn!(
                "Cannot add to {}: all {} slots are in use",
                category.name(),
                storage.capacity()
            );
            return None;
        };

        let entries = &self.entries;
        let handle = self.handles.allocate(|h| entries.contains_key(&h));

        storage.insert(slot, handle, data);
        self.info.object_count[category.index()] = storage.count();
        self.entries.insert(
            handle,
            SceneObjectEntry {
                category,
                slot,
                material: None,
            },
        );

        Some(handle)
    }

    /// Replaces the object behind `handle`.
    ///
    /// Returns false if the handle is unknown or names an object of another
    /// category. Writing identical bytes succeeds without marking anything dirty.
    pub fn update<T: SceneObject>(&mut self, handle: SceneObjectHandle, object: &T) -> bool {
        self.update_raw(handle, T::CATEGORY, bytes_of(object))
    }

    pub fn update_bytes(
        &mut self,
        handle: SceneObjectHandle,
        category: SceneObjectCategory,
        data: &[u8],
    ) -> Result<bool, SceneTableError> {
        check_size(category, data)?;
        Ok(self.update_raw(handle, category, data))
    }

    fn update_raw(&mut self, handle: SceneObjectHandle, category: SceneObjectCategory, data: &[u8]) -> bool {
        let Some(entry) = self.entries.get(&handle) else {
            return false;
        };

        if entry.category != category {
            log::error!(
                "Scene object {} is in {}, cannot update it as one of {}",
                handle.get(),
                entry.category.name(),
                category.name()
            );
            return false;
        }

        self.storages[category.index()].write(entry.slot, data);
        true
    }

    /// Removes every known handle in `handles`. Unknown handles are ignored.
    ///
    /// The freed slots become holes until the next compaction.
    pub fn remove(&mut self, handles: &[SceneObjectHandle]) {
        for handle in handles {
            if let Some(entry) = self.entries.remove(handle) {
                self.storages[entry.category.index()].vacate(entry.slot);
            }
        }
    }

    /// Makes a geometry object use `material`, or slot 0 when `None`.
    ///
    /// Takes effect on the next [`SceneObjectTable::compact_and_flush`].
    pub fn set_material(&mut self, geometry: SceneObjectHandle, material: Option<SceneObjectHandle>) -> bool {
        if let Some(material) = material {
            match self.entries.get(&material) {
                Some(entry) if entry.category == SceneObjectCategory::Material => {}
                Some(entry) => {
                    log::error!(
                        "Scene object {} is in {}, it cannot be used as a material",
                        material.get(),
                        entry.category.name()
                    );
                    return false;
                }
                None => return false,
            }
        }

        match self.entries.get_mut(&geometry) {
            Some(entry) if entry.category.is_geometry() => {
                entry.material = material;
                true
            }
            Some(entry) => {
                log::error!(
                    "Scene object {} is in {}, only geometry has a material",
                    geometry.get(),
                    entry.category.name()
                );
                false
            }
            None => false,
        }
    }

    pub fn get<T: SceneObject>(&self, handle: SceneObjectHandle) -> Option<T> {
        let entry = self.entries.get(&handle)?;
        (entry.category == T::CATEGORY)
            .then(|| pod_read_unaligned(self.storages[entry.category.index()].bytes(entry.slot)))
    }

    pub fn contains(&self, handle: SceneObjectHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn entry(&self, handle: SceneObjectHandle) -> Option<SceneObjectEntry> {
        self.entries.get(&handle).copied()
    }

    /// Number of live objects across all categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limits(&self) -> &SceneLimits {
        &self.limits
    }

    /// Header as of the last mutation. Counts are exact after a compaction.
    pub fn info(&self) -> &SceneGraphInfo {
        &self.info
    }

    /// Slots in use in `category`. Equal to the live count after a compaction.
    pub fn count(&self, category: SceneObjectCategory) -> u32 {
        self.storages[category.index()].count()
    }

    pub fn stride(&self, category: SceneObjectCategory) -> usize {
        self.storages[category.index()].stride()
    }

    /// Backend-visible bytes of `category` as of the last flush.
    pub fn buffer(&self, category: SceneObjectCategory) -> &[u8] {
        self.storages[category.index()].mirror()
    }

    /// Material slot of every geometry object as of the last flush.
    pub fn material_indices(&self) -> &[u32] {
        &self.material_indices[..self.geometry_count]
    }

    /// Closes all holes, sorts lights by type and flushes dirty ranges to `backend`.
    ///
    /// Categories are handled in declaration order. Materials are therefore
    /// settled before the material indices of geometry are derived from them.
    pub fn compact_and_flush(&mut self, backend: &mut dyn SceneBackend) {
        profiling::scope!("SceneObjectTable::compact_and_flush");

        let mut geometry_id = 0;

        for category in SceneObjectCategory::ALL {
            if category == SceneObjectCategory::Light {
                self.compact_lights();
            } else {
                self.compact(category);
            }

            if category.is_geometry() {
                self.update_material_indices(category, &mut geometry_id, backend);
            }

            let storage = &mut self.storages[category.index()];
            storage.flush(|offset, data| backend.write_objects(category, offset, data));
            self.info.object_count[category.index()] = storage.count();
        }

        self.geometry_count = geometry_id;
        backend.write_info(&self.info);
    }

    fn compact(&mut self, category: SceneObjectCategory) {
        let storage = &mut self.storages[category.index()];
        if !storage.has_holes() {
            return;
        }

        let order: Vec<u32> = storage.live_slots().collect();
        let owners = storage.relocate(&order);
        relink(&mut self.entries, owners);
    }

    fn compact_lights(&mut self) {
        let storage = &mut self.storages[SceneObjectCategory::Light.index()];

        let mut counts = [0u32; LightType::COUNT];
        let mut live = Vec::with_capacity(storage.count() as usize);
        let mut sorted = true;
        let mut previous = 0;

        for slot in 0..storage.count() {
            if storage.owner(slot).is_none() {
                continue;
            }
            let kind = light_kind(storage.bytes(slot));
            sorted &= kind >= previous;
            previous = kind;
            counts[kind] += 1;
            live.push((kind, slot));
        }

        let holes = live.len() != storage.count() as usize;
        let counts_changed = counts != self.info.light_count;
        self.info.light_count = counts;

        if !holes && sorted && !counts_changed {
            return;
        }

        // Stable, so lights of one type keep their relative order.
        live.sort_by_key(|&(kind, _)| kind);
        let order: Vec<u32> = live.into_iter().map(|(_, slot)| slot).collect();

        log::debug!(
            "Remapping {} lights ({} directional, {} spot, {} point)",
            order.len(),
            counts[0],
            counts[1],
            counts[2]
        );

        let owners = storage.relocate(&order);
        relink(&mut self.entries, owners);
    }

    fn update_material_indices(
        &mut self,
        category: SceneObjectCategory,
        geometry_id: &mut usize,
        backend: &mut dyn SceneBackend,
    ) {
        let storage = &self.storages[category.index()];

        for slot in 0..storage.count() {
            let Some(entry) = storage.owner(slot).and_then(|h| self.entries.get(&h)) else {
                continue;
            };

            let material_slot = entry
                .material
                .and_then(|m| self.entries.get(&m))
                .map_or(0, |material| material.slot);

            let id = *geometry_id;
            *geometry_id += 1;

            let dst = &mut self.material_indices[id];
            if *dst != material_slot {
                *dst = material_slot;
                backend.write_material_indices(id * std::mem::size_of::<u32>(), bytes_of(dst));
            }
        }
    }
}

fn check_size(category: SceneObjectCategory, data: &[u8]) -> Result<(), SceneTableError> {
    if data.len() != category.stride() {
        return Err(SceneTableError::ObjectSize {
            category,
            expected: category.stride(),
            actual: data.len(),
        });
    }
    Ok(())
}

fn relink(entries: &mut FastHashMap<SceneObjectHandle, SceneObjectEntry>, owners: &[Option<SceneObjectHandle>]) {
    for (slot, owner) in owners.iter().enumerate() {
        if let Some(entry) = owner.and_then(|h| entries.get_mut(&h)) {
            entry.slot = slot as u32;
        }
    }
}

/// Sort key of a light stored as raw bytes. Unknown types sort last.
fn light_kind(data: &[u8]) -> usize {
    let light: Light = pod_read_unaligned(data);
    match light.kind() {
        Ok(kind) => kind.index(),
        Err(e) => {
            log::warn!("{e}, sorting it with point lights");
            LightType::Point.index()
        }
    }
}
