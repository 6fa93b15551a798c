pub mod error;
pub mod evaluator;
pub mod gate;
pub mod model;
pub mod policy;

pub use error::{GateError, QuotaError};
pub use evaluator::{evaluate, QuotaStatus, NEAR_LIMIT_PERCENT};
pub use gate::{Gated, Metered, QuotaGate};
pub use model::{CounterKey, Period, QuotaLimit, QuotaPolicy, ResourceKind, Subject, SubjectScope};
pub use policy::PolicyResolver;
