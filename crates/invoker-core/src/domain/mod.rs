//! Domain model (task payload, operation kinds, envelopes, relocation, errors).

pub mod deployment;
pub mod envelope;
pub mod errors;
pub mod operation;
pub mod relocation;
pub mod task;

pub use self::deployment::{DeploymentDetails, KeyStyle, ObjectCategory};
pub use self::envelope::{RESPONSE_FIELD, ResponseEnvelope};
pub use self::errors::{BoxError, InvokerError};
pub use self::operation::OperationKind;
pub use self::relocation::{
    CopyObjectRequest, ObjectAcl, ObjectLocation, RelocationResult, ServerSideEncryption,
};
pub use self::task::{PackageDetails, StorageMode, TaskPayload};
