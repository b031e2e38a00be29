use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::entry::Provider;
use crate::error::{Error, Result};
use crate::store::Tier;

/// Ladder rating bracket used when a tier does not name its own
pub const DEFAULT_LADDER_REF: &str = "1630";

/// Supplies the raw usage document for a (tier, provider) scope.
///
/// `Ok(None)` means there is no document for that scope.
pub trait SourceReader {
    fn read(&self, tier: &Tier, provider: Provider) -> Result<Option<String>>;
}

/// Reads documents from a local usage directory laid out as:
///
/// - `formats/gen{gen}{tier}/{ladderRef}/pokedata.json` for ladder statistics
/// - `officials/{tier}.json` for official standings
pub struct FsSourceReader {
    usage_dir: PathBuf,
    default_ladder_ref: String,
}

impl FsSourceReader {
    pub fn new(usage_dir: impl Into<PathBuf>) -> Self {
        Self {
            usage_dir: usage_dir.into(),
            default_ladder_ref: DEFAULT_LADDER_REF.to_string(),
        }
    }

    pub fn with_ladder_ref(mut self, ladder_ref: impl Into<String>) -> Self {
        self.default_ladder_ref = ladder_ref.into();
        self
    }

    pub fn usage_dir(&self) -> &Path {
        &self.usage_dir
    }

    /// Location of the document for a scope
    pub fn document_path(&self, tier: &Tier, provider: Provider) -> PathBuf {
        match provider {
            Provider::SelfReported => {
                let ladder_ref = tier
                    .ladder_ref
                    .as_deref()
                    .unwrap_or(&self.default_ladder_ref);
                self.usage_dir
                    .join("formats")
                    .join(format!("gen{}{}", tier.gen, tier.usage_name))
                    .join(ladder_ref)
                    .join("pokedata.json")
            }
            Provider::OfficialStanding => self
                .usage_dir
                .join("officials")
                .join(format!("{}.json", tier.usage_name)),
        }
    }
}

impl SourceReader for FsSourceReader {
    fn read(&self, tier: &Tier, provider: Provider) -> Result<Option<String>> {
        let path = self.document_path(tier, provider);
        debug!(?path, "loading usage document");

        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Io { path, source }),
        }
    }
}

/// Documents held in memory, keyed by tier id and provider
#[derive(Debug, Default)]
pub struct MemorySourceReader {
    documents: HashMap<(i64, Provider), String>,
}

impl MemorySourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tier_id: i64, provider: Provider, raw: impl Into<String>) {
        self.documents.insert((tier_id, provider), raw.into());
    }

    pub fn remove(&mut self, tier_id: i64, provider: Provider) -> Option<String> {
        self.documents.remove(&(tier_id, provider))
    }
}

impl SourceReader for MemorySourceReader {
    fn read(&self, tier: &Tier, provider: Provider) -> Result<Option<String>> {
        Ok(self.documents.get(&(tier.id, provider)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(ladder_ref: Option<&str>) -> Tier {
        Tier {
            id: 1,
            name: "OU".to_string(),
            gen: 9,
            usage_name: "ou".to_string(),
            ladder_ref: ladder_ref.map(str::to_string),
            official: false,
        }
    }

    #[test]
    fn test_ladder_document_path() {
        let reader = FsSourceReader::new("/data/usages");
        assert_eq!(
            reader.document_path(&tier(None), Provider::SelfReported),
            PathBuf::from("/data/usages/formats/gen9ou/1630/pokedata.json")
        );
        assert_eq!(
            reader.document_path(&tier(Some("1825")), Provider::SelfReported),
            PathBuf::from("/data/usages/formats/gen9ou/1825/pokedata.json")
        );
    }

    #[test]
    fn test_official_document_path() {
        let reader = FsSourceReader::new("/data/usages").with_ladder_ref("1500");
        assert_eq!(
            reader.document_path(&tier(None), Provider::OfficialStanding),
            PathBuf::from("/data/usages/officials/ou.json")
        );
    }

    #[test]
    fn test_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FsSourceReader::new(dir.path());
        assert!(reader.read(&tier(None), Provider::SelfReported).unwrap().is_none());
    }

    #[test]
    fn test_reads_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FsSourceReader::new(dir.path());
        let path = reader.document_path(&tier(None), Provider::OfficialStanding);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[]").unwrap();

        let raw = reader.read(&tier(None), Provider::OfficialStanding).unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
    }
}
