use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use shared::domain::{decode_swimmers, DecodedSwimmers, Swimmer};

use super::{Change, Committed, Persistence};
use crate::error::StoreError;

/// Process-local adapter holding the serialized collection in memory.
///
/// Clones share the same slot, so a test can keep a handle to inspect what was
/// written or to make the next writes fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    value: Option<Value>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from raw stored JSON, which may contain malformed records.
    pub fn with_value(value: Value) -> Self {
        let persistence = Self::default();
        persistence.slot().value = Some(value);
        persistence
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.slot().fail_writes = fail;
    }

    pub fn writes(&self) -> usize {
        self.slot().writes
    }

    pub fn stored(&self) -> Option<Value> {
        self.slot().value.clone()
    }

    fn slot(&self) -> MutexGuard<'_, MemorySlot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn load(&self) -> Result<DecodedSwimmers, StoreError> {
        Ok(self
            .slot()
            .value
            .as_ref()
            .map(decode_swimmers)
            .unwrap_or_default())
    }

    async fn commit(&self, _change: &Change, swimmers: &[Swimmer]) -> Result<Committed, StoreError> {
        let mut slot = self.slot();
        if slot.fail_writes {
            return Err(StoreError::persistence("storage quota exceeded"));
        }
        let value = serde_json::to_value(swimmers)
            .map_err(|e| StoreError::persistence(format!("failed to serialize swimmers: {e}")))?;
        slot.value = Some(value);
        slot.writes += 1;
        Ok(Committed::Accepted)
    }
}
