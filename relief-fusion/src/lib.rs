pub mod cluster;
pub mod reconciliation;

pub use cluster::{cluster, consensus_confidence, Cluster};
pub use reconciliation::{
    ConfidenceWinsPolicy, Reconciliation, ReconciliationPolicy, ResolverTag, RoadStatus,
    TimePriorityWithClearOverride,
};
