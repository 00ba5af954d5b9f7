//! Storage bindings for [`SwimmerStore`](crate::store::SwimmerStore).
//!
//! The store applies every mutation in memory first and then hands the change
//! plus the resulting collection to a [`Persistence`] adapter. Adapters that
//! mirror a whole collection (a JSON file) write the collection; adapters that
//! talk to an authority (the REST server) replay the change and answer with
//! the authoritative record.

use async_trait::async_trait;
use shared::domain::{DecodedSwimmers, Swimmer, SwimmerId};

use crate::error::StoreError;

mod local;
#[cfg(any(test, feature = "test-util"))]
mod memory;
mod remote;

pub use local::LocalFileStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryPersistence;
pub use remote::RemoteApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new record. Its id is provisional until the adapter confirms it.
    Added(Swimmer),
    Removed(SwimmerId),
    Incremented(SwimmerId),
    Decremented(SwimmerId),
    Reset(SwimmerId),
}

impl Change {
    pub fn swimmer_id(&self) -> SwimmerId {
        match self {
            Change::Added(swimmer) => swimmer.id,
            Change::Removed(id)
            | Change::Incremented(id)
            | Change::Decremented(id)
            | Change::Reset(id) => *id,
        }
    }
}

/// How an adapter acknowledged a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Committed {
    /// Stored as applied locally.
    Accepted,
    /// Stored; this is the backend's copy of the affected record and replaces the local one.
    Record(Swimmer),
    /// The backend no longer knows the record.
    Gone,
}

#[async_trait]
pub trait Persistence: Send + Sync {
    /// Reads the persisted collection. Malformed records are dropped, not fatal.
    async fn load(&self) -> Result<DecodedSwimmers, StoreError>;

    /// Durably records `change`. `swimmers` is the full collection after the change.
    async fn commit(&self, change: &Change, swimmers: &[Swimmer]) -> Result<Committed, StoreError>;
}
