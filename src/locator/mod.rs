pub mod snapshot_locator;

pub use snapshot_locator::{LocateOutcome, Snapshot, SnapshotLocator, TimestampSource};
