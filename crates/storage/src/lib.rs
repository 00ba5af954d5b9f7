//! Non-durable swimmer repository backing the REST server.
//!
//! Records live in an id-keyed map behind an async lock. Ids come from a
//! counter that only moves forward, so iteration order is insertion order and
//! a deleted id is never handed out again. Everything is lost on restart.

use std::{collections::BTreeMap, sync::Arc};

use shared::domain::{Swimmer, SwimmerId};
use tokio::sync::RwLock;
use tracing::debug;

const FIRST_SWIMMER_ID: i64 = 1;

#[derive(Clone, Default)]
pub struct Storage {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    swimmers: BTreeMap<SwimmerId, Swimmer>,
    next_id: i64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            swimmers: BTreeMap::new(),
            next_id: FIRST_SWIMMER_ID,
        }
    }
}

/// Field-level update applied by [`Storage::update_swimmer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwimmerPatch {
    pub name: Option<String>,
    pub lap_count: Option<u32>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn health_check(&self) -> bool {
        let guard = self.inner.read().await;
        guard.next_id >= FIRST_SWIMMER_ID
    }

    pub async fn list_swimmers(&self) -> Vec<Swimmer> {
        let guard = self.inner.read().await;
        guard.swimmers.values().cloned().collect()
    }

    pub async fn get_swimmer(&self, id: SwimmerId) -> Option<Swimmer> {
        let guard = self.inner.read().await;
        guard.swimmers.get(&id).cloned()
    }

    pub async fn create_swimmer(&self, name: &str, lap_count: u32) -> Swimmer {
        let mut guard = self.inner.write().await;
        let id = SwimmerId(guard.next_id);
        guard.next_id += 1;
        let swimmer = Swimmer {
            id,
            name: name.to_string(),
            lap_count,
        };
        guard.swimmers.insert(id, swimmer.clone());
        debug!(swimmer_id = id.0, "created swimmer");
        swimmer
    }

    pub async fn update_swimmer(&self, id: SwimmerId, patch: SwimmerPatch) -> Option<Swimmer> {
        self.modify(id, |swimmer| {
            if let Some(name) = patch.name {
                swimmer.name = name;
            }
            if let Some(lap_count) = patch.lap_count {
                swimmer.lap_count = lap_count;
            }
        })
        .await
    }

    pub async fn delete_swimmer(&self, id: SwimmerId) -> bool {
        let mut guard = self.inner.write().await;
        let removed = guard.swimmers.remove(&id).is_some();
        if removed {
            debug!(swimmer_id = id.0, "deleted swimmer");
        }
        removed
    }

    pub async fn reset_lap_count(&self, id: SwimmerId) -> Option<Swimmer> {
        self.modify(id, Swimmer::reset).await
    }

    /// Adds one lap under the write lock, so concurrent callers never lose an update.
    pub async fn increment_lap_count(&self, id: SwimmerId) -> Option<Swimmer> {
        self.modify(id, Swimmer::increment).await
    }

    /// Removes one lap, flooring at zero.
    pub async fn decrement_lap_count(&self, id: SwimmerId) -> Option<Swimmer> {
        self.modify(id, |swimmer| {
            swimmer.decrement();
        })
        .await
    }

    async fn modify(&self, id: SwimmerId, apply: impl FnOnce(&mut Swimmer)) -> Option<Swimmer> {
        let mut guard = self.inner.write().await;
        let swimmer = guard.swimmers.get_mut(&id)?;
        apply(swimmer);
        Some(swimmer.clone())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
