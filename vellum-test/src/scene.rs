use vellum::{
    scene::SceneBackend,
    types::{SceneGraphInfo, SceneObjectCategory},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ObjectWrite {
    pub category: SceneObjectCategory,
    pub offset: usize,
    pub len: usize,
}

/// A backend keeping its own copy of every buffer, built only from the writes it receives.
#[derive(Debug, Default)]
pub struct RecordingSceneBackend {
    pub writes: Vec<ObjectWrite>,
    pub material_writes: Vec<(usize, u32)>,
    pub infos: Vec<SceneGraphInfo>,
    buffers: [Vec<u8>; SceneObjectCategory::COUNT],
    material_indices: Vec<u8>,
}

fn write_at(buffer: &mut Vec<u8>, offset: usize, data: &[u8]) {
    let end = offset + data.len();
    if buffer.len() < end {
        buffer.resize(end, 0);
    }
    buffer[offset..end].copy_from_slice(data);
}

impl RecordingSceneBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the writes seen so far, keeping the buffer contents.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
        self.material_writes.clear();
        self.infos.clear();
    }

    pub fn writes_of(&self, category: SceneObjectCategory) -> Vec<(usize, usize)> {
        self.writes
            .iter()
            .filter(|w| w.category == category)
            .map(|w| (w.offset, w.len))
            .collect()
    }

    pub fn buffer(&self, category: SceneObjectCategory) -> &[u8] {
        &self.buffers[category.index()]
    }

    pub fn material_index(&self, geometry_id: usize) -> Option<u32> {
        let bytes = self.material_indices.get(geometry_id * 4..geometry_id * 4 + 4)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }

    pub fn last_info(&self) -> Option<&SceneGraphInfo> {
        self.infos.last()
    }
}

impl SceneBackend for RecordingSceneBackend {
    fn write_objects(&mut self, category: SceneObjectCategory, byte_offset: usize, data: &[u8]) {
        self.writes.push(ObjectWrite {
            category,
            offset: byte_offset,
            len: data.len(),
        });
        write_at(&mut self.buffers[category.index()], byte_offset, data);
    }

    fn write_material_indices(&mut self, byte_offset: usize, data: &[u8]) {
        let mut index = [0; 4];
        index.copy_from_slice(data);
        self.material_writes.push((byte_offset, u32::from_le_bytes(index)));
        write_at(&mut self.material_indices, byte_offset, data);
    }

    fn write_info(&mut self, info: &SceneGraphInfo) {
        self.infos.push(*info);
    }
}
