use tracing::{error, info, warn};

use super::batch::{BatchState, RunReport, TierReport, UsageIdMap};
use super::engine::Reconciler;
use crate::error::{Error, Result};
use crate::source::{SourceFormat, SourceReader, UsageEntry};
use crate::store::{Catalog, Persistence, Tier};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Abort the generation on the first failed tier instead of moving on
    pub fail_fast: bool,
}

impl<'a, S: Catalog + Persistence + ?Sized> Reconciler<'a, S> {
    /// Import every tier of one generation for one provider.
    ///
    /// Phases run across all tiers before the next begins: load, clear,
    /// primary import, link import. A tier without a document is skipped
    /// before anything of it is cleared. A failed tier keeps whatever rows it
    /// wrote; re-running the batch clears them.
    pub fn run_generation(
        &self,
        gen: u8,
        tiers: &[Tier],
        format: &SourceFormat,
        reader: &dyn SourceReader,
        options: RunOptions,
    ) -> Result<RunReport> {
        let provider = format.provider;
        info!(gen, %provider, tiers = tiers.len(), "importing usages");

        let mut batches: Vec<(TierReport, Vec<UsageEntry>)> = Vec::with_capacity(tiers.len());

        for tier in tiers {
            let mut report = TierReport::new(tier.clone(), provider);
            let entries = match load_entries(tier, format, reader) {
                Ok(Some(entries)) => entries,
                Ok(None) => {
                    warn!(tier = %tier, %provider, "no usage document, skipping");
                    report.advance(BatchState::Skipped);
                    Vec::new()
                }
                Err(e) => {
                    record_fault(&mut report, e, options)?;
                    Vec::new()
                }
            };
            batches.push((report, entries));
        }

        for (report, _) in batches.iter_mut().filter(|(r, _)| r.state == BatchState::Start) {
            match self.clear_batch(&report.tier, provider) {
                Ok(deleted) => {
                    report.cleared = deleted;
                    report.advance(BatchState::Cleared);
                }
                Err(e) => record_fault(report, e, options)?,
            }
        }

        let mut ids = UsageIdMap::new();
        for (report, entries) in batches.iter_mut().filter(|(r, _)| r.state == BatchState::Cleared) {
            match self.import_primary(&report.tier, entries, format) {
                Ok((tier_ids, stats)) => {
                    ids.extend(tier_ids);
                    report.primary = stats;
                    report.advance(BatchState::PrimaryImported);
                }
                Err(e) => record_fault(report, e, options)?,
            }
        }

        for (report, entries) in batches
            .iter_mut()
            .filter(|(r, _)| r.state == BatchState::PrimaryImported)
        {
            match self.import_links(&report.tier, entries, &ids) {
                Ok(stats) => {
                    report.links = stats;
                    report.advance(BatchState::LinksImported);
                    report.advance(BatchState::Done);
                }
                Err(e) => record_fault(report, e, options)?,
            }
        }

        let report = RunReport {
            gen,
            tiers: batches.into_iter().map(|(report, _)| report).collect(),
        };

        info!(
            gen,
            %provider,
            records = report.records(),
            done = report.count(BatchState::Done),
            skipped = report.count(BatchState::Skipped),
            failed = report.count(BatchState::Failed),
            "generation complete"
        );
        Ok(report)
    }
}

fn load_entries(
    tier: &Tier,
    format: &SourceFormat,
    reader: &dyn SourceReader,
) -> Result<Option<Vec<UsageEntry>>> {
    let Some(raw) = reader.read(tier, format.provider)? else {
        return Ok(None);
    };

    let entries = format.parse_entries(&raw).map_err(|source| Error::Parse {
        tier: tier.to_string(),
        provider: format.provider,
        source,
    })?;

    info!(tier = %tier, entries = entries.len(), "loaded usage document");
    Ok(Some(entries))
}

/// Mark the batch failed; with `fail_fast` the fault also ends the run
fn record_fault(report: &mut TierReport, e: Error, options: RunOptions) -> Result<()> {
    error!(tier = %report.tier, provider = %report.provider, state = %report.state, "batch failed: {e}");
    report.fail(&e);

    if options.fail_fast {
        return Err(e);
    }
    Ok(())
}
