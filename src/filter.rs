use crate::store::Tier;
use anyhow::{bail, Result};
use tracing::info;

/// Resolves which tiers to process based on include/exclude filters
pub fn resolve_tiers(
    tiers: Vec<Tier>,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Result<Vec<Tier>> {
    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            check_known(&tiers, include_list)?;
            let selected: Vec<Tier> = tiers
                .into_iter()
                .filter(|t| include_list.iter().any(|name| *name == t.usage_name))
                .collect();

            info!(tiers = ?names(&selected), "including tiers");
            Ok(selected)
        }
        (None, Some(exclude_list)) => {
            check_known(&tiers, exclude_list)?;
            let selected: Vec<Tier> = tiers
                .into_iter()
                .filter(|t| !exclude_list.iter().any(|name| *name == t.usage_name))
                .collect();

            info!(excluded = ?exclude_list, remaining = selected.len(), "excluding tiers");
            Ok(selected)
        }
        (None, None) => {
            info!(tiers = tiers.len(), "including all tiers");
            Ok(tiers)
        }
    }
}

fn check_known(tiers: &[Tier], requested: &[String]) -> Result<()> {
    for name in requested {
        if !tiers.iter().any(|t| t.usage_name == *name) {
            bail!("Unknown tier: {}", name);
        }
    }
    Ok(())
}

fn names(tiers: &[Tier]) -> Vec<&str> {
    tiers.iter().map(|t| t.usage_name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<Tier> {
        ["ou", "uu", "vgc2024"]
            .iter()
            .enumerate()
            .map(|(idx, name)| Tier {
                id: idx as i64 + 1,
                name: name.to_uppercase(),
                gen: 9,
                usage_name: name.to_string(),
                ladder_ref: None,
                official: *name == "vgc2024",
            })
            .collect()
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        assert_eq!(resolve_tiers(tiers(), None, None).unwrap().len(), 3);
    }

    #[test]
    fn test_include() {
        let include = vec!["uu".to_string()];
        let selected = resolve_tiers(tiers(), Some(&include), None).unwrap();
        assert_eq!(names(&selected), ["uu"]);
    }

    #[test]
    fn test_exclude() {
        let exclude = vec!["uu".to_string()];
        let selected = resolve_tiers(tiers(), None, Some(&exclude)).unwrap();
        assert_eq!(names(&selected), ["ou", "vgc2024"]);
    }

    #[test]
    fn test_both_filters_rejected() {
        let list = vec!["uu".to_string()];
        assert!(resolve_tiers(tiers(), Some(&list), Some(&list)).is_err());
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let include = vec!["lc".to_string()];
        assert!(resolve_tiers(tiers(), Some(&include), None).is_err());
    }
}
