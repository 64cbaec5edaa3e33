pub mod change;
pub mod guarantee;
pub mod statistics;

pub use change::{ChangeEvent, ChangeKind, ChangePayload};
pub use guarantee::{GuaranteeRecord, GuaranteeStatus, GuaranteeType};
pub use statistics::Statistics;
