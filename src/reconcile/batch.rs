use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use super::kinds::{CorrelationKind, RelationKind};
use crate::resolve::usage_key;
use crate::source::Provider;
use crate::store::Tier;

/// Lifecycle of one (generation, tier, provider) batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Start,
    Cleared,
    PrimaryImported,
    LinksImported,
    Done,
    /// No source document; nothing was cleared or written
    Skipped,
    /// A storage or parsing fault aborted the batch
    Failed,
}

impl BatchState {
    pub fn can_advance_to(self, next: BatchState) -> bool {
        use BatchState::*;

        match (self, next) {
            (Start, Cleared) | (Start, Skipped) => true,
            (Cleared, PrimaryImported) => true,
            (PrimaryImported, LinksImported) => true,
            (LinksImported, Done) => true,
            (Done | Skipped | Failed, _) => false,
            (_, Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Done | BatchState::Skipped | BatchState::Failed)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchState::Start => "start",
            BatchState::Cleared => "cleared",
            BatchState::PrimaryImported => "primary imported",
            BatchState::LinksImported => "links imported",
            BatchState::Done => "done",
            BatchState::Skipped => "skipped",
            BatchState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Primary usage row ids produced by the primary phase, keyed by the
/// subject's usage key and tier id. The link stage only reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageIdMap {
    ids: HashMap<(String, i64), i64>,
}

impl UsageIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subject: &str, tier_id: i64, tier_usage_id: i64) {
        self.ids.insert((usage_key(subject), tier_id), tier_usage_id);
    }

    pub fn get(&self, subject: &str, tier_id: i64) -> Option<i64> {
        self.ids.get(&(usage_key(subject), tier_id)).copied()
    }

    pub fn extend(&mut self, other: UsageIdMap) {
        self.ids.extend(other.ids);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Where rank iteration halted
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdStop {
    pub name: String,
    pub position: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryStats {
    pub records: usize,
    pub unresolved_subjects: usize,
    pub facts_created: BTreeMap<CorrelationKind, usize>,
    pub facts_dropped: BTreeMap<CorrelationKind, usize>,
    pub threshold_stop: Option<ThresholdStop>,
}

impl PrimaryStats {
    pub fn total_facts(&self) -> usize {
        self.facts_created.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkStats {
    pub created: BTreeMap<RelationKind, usize>,
    pub dropped: BTreeMap<RelationKind, usize>,
    /// Entries without a primary row (unresolved or below the cutoff)
    pub skipped_subjects: usize,
}

impl LinkStats {
    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }
}

/// Outcome of one batch
#[derive(Debug, Clone)]
pub struct TierReport {
    pub tier: Tier,
    pub provider: Provider,
    pub state: BatchState,
    pub cleared: usize,
    pub primary: PrimaryStats,
    pub links: LinkStats,
    pub error: Option<String>,
}

impl TierReport {
    pub fn new(tier: Tier, provider: Provider) -> Self {
        Self {
            tier,
            provider,
            state: BatchState::Start,
            cleared: 0,
            primary: PrimaryStats::default(),
            links: LinkStats::default(),
            error: None,
        }
    }

    /// Move to `next`; out-of-order transitions are ignored
    pub fn advance(&mut self, next: BatchState) -> bool {
        if !self.state.can_advance_to(next) {
            debug!(tier = %self.tier, from = %self.state, to = %next, "ignoring transition");
            return false;
        }
        debug!(tier = %self.tier, provider = %self.provider, from = %self.state, to = %next, "batch transition");
        self.state = next;
        true
    }

    pub fn fail(&mut self, error: impl fmt::Display) {
        self.error = Some(error.to_string());
        self.advance(BatchState::Failed);
    }
}

/// Outcome of a run over one generation
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub gen: u8,
    pub tiers: Vec<TierReport>,
}

impl RunReport {
    pub fn records(&self) -> usize {
        self.tiers.iter().map(|t| t.primary.records).sum()
    }

    pub fn count(&self, state: BatchState) -> usize {
        self.tiers.iter().filter(|t| t.state == state).count()
    }
}
