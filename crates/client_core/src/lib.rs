//! Client side of the lap counter: the swimmer store, its persistence
//! adapters and the per-card swipe gesture controller.

pub mod error;
pub mod gesture;
pub mod intent;
pub mod persistence;
pub mod store;

pub use error::StoreError;
pub use gesture::{
    GestureOutcome, GesturePhase, LayoutDirection, SwipeAction, SwipeFrame, SwipeGesture,
};
pub use intent::Intent;
#[cfg(any(test, feature = "test-util"))]
pub use persistence::MemoryPersistence;
pub use persistence::{Change, Committed, LocalFileStore, Persistence, RemoteApi};
pub use store::{LoadReport, StoreEvent, SwimmerStore};
