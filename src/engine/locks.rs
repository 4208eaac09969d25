use crate::model::ProcessId;
use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// One mutex per process instance with work in flight.
///
/// Entries are dropped again once nobody holds or waits on them, so the table
/// only grows with the number of concurrently busy instances.
#[derive(Debug, Default)]
pub(crate) struct ProcessLocks {
    slots: Mutex<AHashMap<ProcessId, Arc<Mutex<()>>>>,
}

impl ProcessLocks {
    /// Runs `f` while holding the lock of `process_id`.
    pub(crate) fn run_exclusive<T>(&self, process_id: ProcessId, f: impl FnOnce() -> T) -> T {
        let slot = Arc::clone(self.slots.lock().entry(process_id).or_default());
        let result = {
            let _guard = slot.lock();
            f()
        };
        drop(slot);
        self.prune(process_id);
        result
    }

    fn prune(&self, process_id: ProcessId) {
        let mut slots = self.slots.lock();
        if slots
            .get(&process_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&process_id);
        }
    }
}
