//! Domain model (actions, status messages, queue keys, errors).

pub mod action;
pub mod errors;
pub mod ids;
pub mod queue_key;
pub mod status;

pub use action::{Action, Argument};
pub use errors::{CapabilityError, DecodeError, ExecutionError, QueueStoreError, WorkerError};
pub use ids::WorkerId;
pub use queue_key::{Priority, QueueKeys, WorkerIdentity};
pub use status::{ActionStatus, StatusKind};
