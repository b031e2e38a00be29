use tracing::{debug, info, warn};

use super::batch::{PrimaryStats, ThresholdStop, UsageIdMap};
use super::kinds::CorrelationKind;
use crate::error::{Error, Result};
use crate::resolve::EntityResolver;
use crate::schema::{DependencyResolver, TableSchema, TIER_USAGE};
use crate::source::{Provider, SourceFormat, UsageEntry};
use crate::store::{Catalog, EntityKind, Persistence, Predicate, Row, Tier};

/// Entries whose usage metric falls below this percent end a tier's import
pub const USAGE_CUTOFF: f64 = 1.0;

/// Rebuilds the derived usage rows of one scope at a time
pub struct Reconciler<'a, S: ?Sized> {
    pub(super) store: &'a S,
    pub(super) resolver: EntityResolver<'a, S>,
    /// Derived tables, children before `tier_usage`
    clear_order: Vec<&'static TableSchema>,
}

impl<'a, S: Catalog + Persistence + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S) -> Result<Self> {
        let clear_order = DependencyResolver::new()
            .deletion_order(TIER_USAGE.name)
            .map_err(Error::Schema)?;

        Ok(Self {
            store,
            resolver: EntityResolver::new(store),
            clear_order,
        })
    }

    /// Delete every derived row of a (tier, provider) scope. Returns the
    /// number of rows removed across all derived tables.
    pub fn clear_batch(&self, tier: &Tier, provider: Provider) -> Result<usize> {
        let scope = Predicate::All(vec![
            Predicate::eq("tier_id", tier.id),
            Predicate::eq("provider", provider.as_str()),
        ]);

        let mut deleted = 0;
        for table in &self.clear_order {
            let predicate = if table.name == TIER_USAGE.name {
                scope.clone()
            } else {
                let column = table.column_referencing(TIER_USAGE.name).ok_or_else(|| {
                    Error::Schema(format!("{} does not reference {}", table.name, TIER_USAGE.name))
                })?;
                Predicate::InSelect {
                    column,
                    table: TIER_USAGE.name,
                    select_column: "id",
                    filter: Box::new(scope.clone()),
                }
            };

            let count = self.store.delete_where(table, &predicate)?;
            if count > 0 {
                debug!(table = table.name, count, "cleared");
            }
            deleted += count;
        }

        info!(tier = %tier, %provider, deleted, "cleared usages");
        Ok(deleted)
    }

    /// Create primary usage rows and their correlated facts from rank-ordered
    /// entries. Entries are taken in the given order and never re-sorted.
    ///
    /// - an unresolved subject is skipped and takes no rank
    /// - the first resolved entry below [`USAGE_CUTOFF`] ends the tier
    /// - unresolved sub-facts are dropped one by one
    pub fn import_primary(
        &self,
        tier: &Tier,
        entries: &[UsageEntry],
        format: &SourceFormat,
    ) -> Result<(UsageIdMap, PrimaryStats)> {
        let mut ids = UsageIdMap::new();
        let mut stats = PrimaryStats::default();
        let mut next_slot: u32 = 1;

        for entry in entries {
            let Some(pokemon) = self.resolver.resolve(EntityKind::Pokemon, tier.gen, &entry.name)?
            else {
                warn!(tier = %tier, name = %entry.name, "pokemon not found");
                stats.unresolved_subjects += 1;
                continue;
            };

            let rank = format.rank_for(entry, next_slot);
            let percent = format.compute_percent(entry, rank);

            if percent.is_nan() || percent < USAGE_CUTOFF {
                info!(
                    tier = %tier,
                    name = %entry.name,
                    position = entry.position,
                    percent,
                    "usage below cutoff, ignoring remaining entries"
                );
                stats.threshold_stop = Some(ThresholdStop {
                    name: entry.name.clone(),
                    position: entry.position,
                    percent,
                });
                break;
            }

            let row = Row::new(&TIER_USAGE)
                .set("tier_id", tier.id)
                .set("pokemon_id", pokemon.id)
                .set("percent", percent)
                .set("rank", rank)
                .set("provider", format.provider.as_str());
            let tier_usage_id = self.store.insert(&row)?;
            next_slot += 1;
            stats.records += 1;

            for kind in CorrelationKind::ALL {
                self.import_correlated(kind, tier.gen, tier_usage_id, entry, &mut stats)?;
            }

            ids.insert(&entry.name, tier.id, tier_usage_id);
        }

        info!(
            tier = %tier,
            provider = %format.provider,
            records = stats.records,
            facts = stats.total_facts(),
            unresolved = stats.unresolved_subjects,
            "imported primary usages"
        );
        Ok((ids, stats))
    }

    fn import_correlated(
        &self,
        kind: CorrelationKind,
        gen: u8,
        tier_usage_id: i64,
        entry: &UsageEntry,
        stats: &mut PrimaryStats,
    ) -> Result<()> {
        for fact in kind.facts(entry) {
            let Some(resolved) = self.resolver.resolve(kind.entity(), gen, &fact.name)? else {
                debug!(%kind, subject = %entry.name, name = %fact.name, "dropping unresolved fact");
                *stats.facts_dropped.entry(kind).or_default() += 1;
                continue;
            };

            self.store.insert(&kind.row(tier_usage_id, resolved.id, fact))?;
            *stats.facts_created.entry(kind).or_default() += 1;
        }
        Ok(())
    }
}
