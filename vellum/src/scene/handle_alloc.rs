use vellum_types::SceneObjectHandle;

/// Hands out scene object handles from a wrapping counter.
///
/// Zero is never produced. After the counter wraps, values still in use are
/// skipped, so two live objects never share a handle.
#[derive(Debug, Default)]
pub(crate) struct HandleAllocator {
    counter: u64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting after `counter`. Only useful to exercise wraparound.
    #[cfg(test)]
    pub fn starting_at(counter: u64) -> Self {
        Self { counter }
    }

    pub fn allocate(&mut self, mut is_live: impl FnMut(SceneObjectHandle) -> bool) -> SceneObjectHandle {
        loop {
            self.counter = self.counter.wrapping_add(1);
            match SceneObjectHandle::new(self.counter) {
                Some(handle) if !is_live(handle) => return handle,
                _ => continue,
            }
        }
    }
}
