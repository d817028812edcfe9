mod operation;
mod snapshot;

pub use operation::Operation;
pub use snapshot::Snapshot;
