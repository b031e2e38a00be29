use tracing::{debug, info};

use super::batch::{LinkStats, UsageIdMap};
use super::engine::Reconciler;
use super::kinds::RelationKind;
use crate::error::Result;
use crate::source::UsageEntry;
use crate::store::{Catalog, EntityKind, Persistence, Tier};

impl<'a, S: Catalog + Persistence + ?Sized> Reconciler<'a, S> {
    /// Second pass over the same entries: teammate and counter rows for every
    /// subject that kept a primary row. The cutoff is not re-applied; an
    /// entry missing from `ids` is skipped.
    pub fn import_links(
        &self,
        tier: &Tier,
        entries: &[UsageEntry],
        ids: &UsageIdMap,
    ) -> Result<LinkStats> {
        let mut stats = LinkStats::default();

        for entry in entries {
            let Some(tier_usage_id) = ids.get(&entry.name, tier.id) else {
                stats.skipped_subjects += 1;
                continue;
            };

            for kind in RelationKind::ALL {
                for fact in kind.facts(entry) {
                    let Some(counterpart) =
                        self.resolver.resolve(EntityKind::Pokemon, tier.gen, &fact.name)?
                    else {
                        debug!(%kind, subject = %entry.name, name = %fact.name, "dropping unresolved counterpart");
                        *stats.dropped.entry(kind).or_default() += 1;
                        continue;
                    };

                    self.store
                        .insert(&kind.row(tier_usage_id, counterpart.id, fact))?;
                    *stats.created.entry(kind).or_default() += 1;
                }
            }
        }

        info!(
            tier = %tier,
            teammates = stats.created.get(&RelationKind::Teammate).copied().unwrap_or(0),
            counters = stats.created.get(&RelationKind::Counter).copied().unwrap_or(0),
            skipped = stats.skipped_subjects,
            "imported teammates and counters"
        );
        Ok(stats)
    }
}
