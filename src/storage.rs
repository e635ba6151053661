/// Binary snapshots of a whole registry.
pub mod snapshot;
mod store;

pub use snapshot::SnapshotError;
pub use store::{Store, StoreError};
