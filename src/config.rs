use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

use crate::source::DEFAULT_LADDER_REF;

/// Most recent generation with usage data
pub const LAST_GEN: u8 = 9;

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub usage_dir: PathBuf,
    pub ladder_ref: String,
    pub last_gen: u8,
    pub fail_fast: bool,
}

impl Settings {
    /// Fill unset paths from the platform data directory
    pub fn resolve(
        db_path: Option<PathBuf>,
        usage_dir: Option<PathBuf>,
        ladder_ref: Option<String>,
        last_gen: Option<u8>,
        fail_fast: bool,
    ) -> Result<Self> {
        let (db_path, usage_dir) = match (db_path, usage_dir) {
            (Some(db), Some(usages)) => (db, usages),
            (db, usages) => {
                let data_dir = data_dir()?;
                (
                    db.unwrap_or_else(|| data_dir.join("usage.sqlite")),
                    usages.unwrap_or_else(|| data_dir.join("usages")),
                )
            }
        };

        Ok(Self {
            db_path,
            usage_dir,
            ladder_ref: ladder_ref.unwrap_or_else(|| DEFAULT_LADDER_REF.to_string()),
            last_gen: last_gen.unwrap_or(LAST_GEN),
            fail_fast,
        })
    }

    /// Requested generations, or every generation up to `last_gen`
    pub fn generations(&self, requested: &[u8]) -> Vec<u8> {
        if requested.is_empty() {
            (1..=self.last_gen).collect()
        } else {
            let mut gens = requested.to_vec();
            gens.sort_unstable();
            gens.dedup();
            gens
        }
    }
}

fn data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "usage-to-sqlite")
        .context("Could not determine data directory")?;
    let dir = proj_dirs.data_dir().to_path_buf();

    fs::create_dir_all(&dir).context("Failed to create data directory")?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::resolve(
            Some(PathBuf::from("usage.sqlite")),
            Some(PathBuf::from("usages")),
            None,
            None,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = settings();
        assert_eq!(settings.ladder_ref, "1630");
        assert_eq!(settings.last_gen, LAST_GEN);
        assert!(!settings.fail_fast);
    }

    #[test]
    fn test_generations() {
        let settings = settings();
        assert_eq!(settings.generations(&[]), (1..=LAST_GEN).collect::<Vec<_>>());
        assert_eq!(settings.generations(&[9, 8, 9]), vec![8, 9]);
    }
}
