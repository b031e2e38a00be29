//! The usage reconciliation pipeline.
//!
//! For each (generation, tier, provider) scope the derived rows are rebuilt
//! from scratch: clear the scope, write primary `tier_usage` rows with their
//! ability/item/move/tera/spread facts, then write teammate and counter rows,
//! which need the primary row ids.

pub mod batch;
pub mod engine;
pub mod kinds;
pub mod links;
pub mod run;

pub use batch::{
    BatchState, LinkStats, PrimaryStats, RunReport, ThresholdStop, TierReport, UsageIdMap,
};
pub use engine::{Reconciler, USAGE_CUTOFF};
pub use kinds::{CorrelationKind, RelationKind};
pub use run::RunOptions;
