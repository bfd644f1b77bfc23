//! Long-running operation handling

pub mod poller;

pub use poller::{ensure_all_succeeded, OperationPoller};
