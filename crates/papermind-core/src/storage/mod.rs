pub mod snapshot;

pub use snapshot::{FileSnapshotStore, SnapshotId, SnapshotStore, StoreError};
