use super::entry::{Provider, UsageEntry};
use super::ladder::parse_ladder;
use super::standings::parse_standings;

/// How the usage metric of an entry is obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentPolicy {
    /// Use the percent reported by the document; a missing percent reads as zero
    Reported,
    /// Derive from the ordinal standing: `scale / rank`
    InverseRank { scale: f64 },
}

impl PercentPolicy {
    pub fn compute(&self, entry: &UsageEntry, rank: u32) -> f64 {
        match self {
            PercentPolicy::Reported => entry.usage.unwrap_or(0.0),
            PercentPolicy::InverseRank { scale } => {
                if rank == 0 {
                    return 0.0;
                }
                scale / f64::from(rank)
            }
        }
    }
}

/// Everything that differs between the two document shapes: parsing,
/// percent computation and the provider tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceFormat {
    pub provider: Provider,
    pub percent: PercentPolicy,
}

impl SourceFormat {
    /// Self-reported ladder statistics
    pub const LADDER: SourceFormat = SourceFormat {
        provider: Provider::SelfReported,
        percent: PercentPolicy::Reported,
    };

    /// Official standings, percent derived as `100 / rank`
    pub const STANDINGS: SourceFormat = SourceFormat {
        provider: Provider::OfficialStanding,
        percent: PercentPolicy::InverseRank { scale: 100.0 },
    };

    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::SelfReported => Self::LADDER,
            Provider::OfficialStanding => Self::STANDINGS,
        }
    }

    /// Same document shape and provider, different percent policy
    pub fn with_percent_policy(self, percent: PercentPolicy) -> Self {
        Self { percent, ..self }
    }

    pub fn parse_entries(&self, raw: &str) -> serde_json::Result<Vec<UsageEntry>> {
        match self.provider {
            Provider::SelfReported => parse_ladder(raw),
            Provider::OfficialStanding => parse_standings(raw),
        }
    }

    /// Rank of an entry: its declared standing, else the next free slot
    pub fn rank_for(&self, entry: &UsageEntry, next_slot: u32) -> u32 {
        entry.standing.unwrap_or(next_slot)
    }

    pub fn compute_percent(&self, entry: &UsageEntry, rank: u32) -> f64 {
        self.percent.compute(entry, rank)
    }
}
