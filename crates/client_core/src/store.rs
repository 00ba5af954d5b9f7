//! The single owner of the swimmer collection.
//!
//! Every mutation is applied in memory, handed to the [`Persistence`] adapter
//! and only then treated as committed. A failed write restores the previous
//! state and surfaces [`StoreError::Persistence`], whichever adapter is bound.
//! Renderers subscribe to [`StoreEvent`]s and receive read-only snapshots.

use std::sync::Arc;

use shared::domain::{normalize_name, Swimmer, SwimmerId};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    intent::Intent,
    persistence::{Change, Committed, Persistence},
};

const FIRST_SWIMMER_ID: i64 = 1;
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone)]
pub enum StoreEvent {
    Loaded { swimmers: Arc<[Swimmer]> },
    Changed { change: Change, swimmers: Arc<[Swimmer]> },
}

impl StoreEvent {
    pub fn swimmers(&self) -> &Arc<[Swimmer]> {
        match self {
            StoreEvent::Loaded { swimmers } | StoreEvent::Changed { swimmers, .. } => swimmers,
        }
    }
}

pub struct SwimmerStore<P> {
    persistence: P,
    swimmers: Vec<Swimmer>,
    next_id: i64,
    events: broadcast::Sender<StoreEvent>,
}

impl<P: Persistence> SwimmerStore<P> {
    /// Creates an empty store. Call [`SwimmerStore::load`] to pick up persisted swimmers.
    pub fn new(persistence: P) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            persistence,
            swimmers: Vec::new(),
            next_id: FIRST_SWIMMER_ID,
            events,
        }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// Malformed records are skipped and counted. The next id becomes one past
    /// the highest loaded id.
    pub async fn load(&mut self) -> Result<LoadReport, StoreError> {
        let decoded = self.persistence.load().await?;
        if decoded.dropped > 0 {
            warn!(dropped = decoded.dropped, "skipped malformed swimmer records");
        }

        self.swimmers = decoded.swimmers;
        self.next_id = self
            .swimmers
            .iter()
            .map(|s| s.id.0)
            .max()
            .map_or(FIRST_SWIMMER_ID, |max| max.saturating_add(1));

        let report = LoadReport {
            loaded: self.swimmers.len(),
            dropped: decoded.dropped,
        };
        info!(loaded = report.loaded, next_id = self.next_id, "swimmers loaded");
        self.publish(StoreEvent::Loaded {
            swimmers: self.snapshot(),
        });
        Ok(report)
    }

    /// Current swimmers in insertion order.
    pub fn list(&self) -> &[Swimmer] {
        &self.swimmers
    }

    /// Read-only copy for a render pass.
    pub fn snapshot(&self) -> Arc<[Swimmer]> {
        Arc::from(self.swimmers.as_slice())
    }

    pub fn get(&self, id: SwimmerId) -> Result<&Swimmer, StoreError> {
        self.swimmers
            .iter()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn add(&mut self, name: &str) -> Result<Swimmer, StoreError> {
        let name = normalize_name(name)
            .ok_or_else(|| StoreError::Validation("swimmer name must not be empty".into()))?;

        let provisional = Swimmer::new(SwimmerId(self.next_id), name);
        self.swimmers.push(provisional.clone());

        let committed = match self
            .persistence
            .commit(&Change::Added(provisional.clone()), &self.swimmers)
            .await
        {
            Ok(committed) => committed,
            Err(err) => {
                self.swimmers.pop();
                warn!(error = %err, "add not persisted; rolled back");
                return Err(err);
            }
        };

        let swimmer = match committed {
            Committed::Record(record) => {
                if let Some(last) = self.swimmers.last_mut() {
                    *last = record.clone();
                }
                record
            }
            Committed::Accepted | Committed::Gone => provisional,
        };
        self.next_id = self.next_id.max(swimmer.id.0.saturating_add(1));

        info!(swimmer_id = swimmer.id.0, "swimmer added");
        self.publish_change(Change::Added(swimmer.clone()));
        Ok(swimmer)
    }

    /// Removes the swimmer if present. Absent ids are a no-op returning `None`.
    pub async fn remove(&mut self, id: SwimmerId) -> Result<Option<Swimmer>, StoreError> {
        let Some(index) = self.position(id) else {
            debug!(swimmer_id = id.0, "remove ignored; no such swimmer");
            return Ok(None);
        };

        let removed = self.swimmers.remove(index);
        if let Err(err) = self
            .persistence
            .commit(&Change::Removed(id), &self.swimmers)
            .await
        {
            self.swimmers.insert(index, removed);
            warn!(swimmer_id = id.0, error = %err, "remove not persisted; rolled back");
            return Err(err);
        }

        info!(swimmer_id = id.0, "swimmer removed");
        self.publish_change(Change::Removed(id));
        Ok(Some(removed))
    }

    pub async fn increment(&mut self, id: SwimmerId) -> Result<Option<Swimmer>, StoreError> {
        self.mutate(Change::Incremented(id), |swimmer| {
            swimmer.increment();
            true
        })
        .await
    }

    /// Lowers the count by one. At zero nothing is written and the record is returned unchanged.
    pub async fn decrement(&mut self, id: SwimmerId) -> Result<Option<Swimmer>, StoreError> {
        self.mutate(Change::Decremented(id), Swimmer::decrement)
            .await
    }

    pub async fn reset(&mut self, id: SwimmerId) -> Result<Option<Swimmer>, StoreError> {
        self.mutate(Change::Reset(id), |swimmer| {
            swimmer.reset();
            true
        })
        .await
    }

    /// Dispatches a user intent to the matching operation.
    ///
    /// Returns the record that was added, removed or updated, or `None` when
    /// the intent referred to a swimmer that no longer exists.
    pub async fn apply(&mut self, intent: Intent) -> Result<Option<Swimmer>, StoreError> {
        debug!(intent = intent.name(), "applying intent");
        match intent {
            Intent::Add(name) => self.add(&name).await.map(Some),
            Intent::Remove(id) => self.remove(id).await,
            Intent::Increment(id) => self.increment(id).await,
            Intent::Decrement(id) => self.decrement(id).await,
            Intent::Reset(id) => self.reset(id).await,
        }
    }

    async fn mutate(
        &mut self,
        change: Change,
        apply: impl FnOnce(&mut Swimmer) -> bool,
    ) -> Result<Option<Swimmer>, StoreError> {
        let id = change.swimmer_id();
        let Some(index) = self.position(id) else {
            debug!(swimmer_id = id.0, "update ignored; no such swimmer");
            return Ok(None);
        };

        let before = self.swimmers[index].clone();
        if !apply(&mut self.swimmers[index]) {
            return Ok(Some(before));
        }

        match self.persistence.commit(&change, &self.swimmers).await {
            Ok(Committed::Accepted) => {}
            Ok(Committed::Record(record)) => self.swimmers[index] = record,
            Ok(Committed::Gone) => {
                self.swimmers.remove(index);
                debug!(swimmer_id = id.0, "swimmer vanished from backend; dropped locally");
                self.publish_change(Change::Removed(id));
                return Ok(None);
            }
            Err(err) => {
                self.swimmers[index] = before;
                warn!(swimmer_id = id.0, error = %err, "update not persisted; rolled back");
                return Err(err);
            }
        }

        let updated = self.swimmers[index].clone();
        debug!(swimmer_id = id.0, lap_count = updated.lap_count, "lap count updated");
        self.publish_change(change);
        Ok(Some(updated))
    }

    fn position(&self, id: SwimmerId) -> Option<usize> {
        self.swimmers.iter().position(|s| s.id == id)
    }

    fn publish_change(&self, change: Change) {
        self.publish(StoreEvent::Changed {
            change,
            swimmers: self.snapshot(),
        });
    }

    fn publish(&self, event: StoreEvent) {
        // Send only fails when nobody is subscribed.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
