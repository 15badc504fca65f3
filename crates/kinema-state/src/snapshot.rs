//! Snapshot store - the pre-update copy reconciliation blends away from

/// Holds at most one snapshot of an entity's own concrete type
#[derive(Debug, Clone)]
pub struct SnapshotSlot<E> {
    snapshot: Option<E>,
}

impl<E> Default for SnapshotSlot<E> {
    fn default() -> Self {
        SnapshotSlot { snapshot: None }
    }
}

impl<E: Clone> SnapshotSlot<E> {
    pub fn new() -> Self {
        SnapshotSlot::default()
    }

    /// Store a fresh copy of `source`, replacing any earlier snapshot
    pub fn save(&mut self, source: &E) {
        self.snapshot = Some(source.clone());
    }

    /// Consume the snapshot
    pub fn take(&mut self) -> Option<E> {
        self.snapshot.take()
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    pub fn get(&self) -> Option<&E> {
        self.snapshot.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.snapshot.is_some()
    }
}
