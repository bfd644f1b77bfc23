//! Domain types
//!
//! Wire keys are camelCase; timestamps are integer milliseconds.

pub mod application;
pub mod communication;
pub mod metadata;
pub mod operation;
pub mod page;
pub mod system;
pub mod time;

pub use application::{Application, APPLICATION_STATE_PUBLISHED};
pub use communication::{ComProto, Communication, SystemCommInfo, SystemSecurityInfo};
pub use metadata::Metadata;
pub use operation::{Operation, OperationCounters, OperationRef, OperationState};
pub use page::Page;
pub use system::{DataAggregate, Datapoint, Gateway, ImportSystemsDefaults, System, TsValue};
pub use time::Timestamp;
