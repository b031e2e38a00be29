//! Turns loosely formatted display names from usage documents into catalog ids.

use tracing::trace;

use crate::error::Result;
use crate::store::{Catalog, EntityKind, EntityRef};

/// Normalize a display name into the catalog's usage key: lowercase ASCII
/// letters and digits only ("Landorus-Therian" -> "landorustherian").
pub fn usage_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// How a kind of entity is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Normalized usage key within the generation
    UsageKey,
    /// Literal display name within the generation
    Name,
    /// Literal display name, any generation
    NameAnyGeneration,
}

impl Lookup {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Pokemon | EntityKind::Ability | EntityKind::Item | EntityKind::Move => {
                Lookup::UsageKey
            }
            EntityKind::Type => Lookup::Name,
            EntityKind::Nature => Lookup::NameAnyGeneration,
        }
    }
}

/// Resolves raw names against a [`Catalog`].
///
/// A miss is `Ok(None)`; callers drop the fact and carry on. Errors are
/// reserved for catalog storage faults.
pub struct EntityResolver<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: Catalog + ?Sized> EntityResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, kind: EntityKind, gen: u8, raw_name: &str) -> Result<Option<EntityRef>> {
        let found = match Lookup::for_kind(kind) {
            Lookup::UsageKey => {
                let key = usage_key(raw_name);
                if key.is_empty() {
                    return Ok(None);
                }
                self.catalog.resolve_by_usage_key(kind, gen, &key)?
            }
            Lookup::Name => self.catalog.resolve_by_name(kind, Some(gen), raw_name)?,
            Lookup::NameAnyGeneration => self.catalog.resolve_by_name(kind, None, raw_name)?,
        };

        if found.is_none() {
            trace!(%kind, gen, name = raw_name, "unresolved");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Tier;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingCatalog {
        calls: RefCell<Vec<String>>,
    }

    impl Catalog for RecordingCatalog {
        fn resolve_by_usage_key(
            &self,
            kind: EntityKind,
            gen: u8,
            usage_key: &str,
        ) -> Result<Option<EntityRef>> {
            self.calls
                .borrow_mut()
                .push(format!("key:{kind}:{gen}:{usage_key}"));
            Ok((usage_key == "landorustherian").then(|| EntityRef {
                id: 1,
                name: "Landorus-Therian".to_string(),
            }))
        }

        fn resolve_by_name(
            &self,
            kind: EntityKind,
            gen: Option<u8>,
            name: &str,
        ) -> Result<Option<EntityRef>> {
            self.calls
                .borrow_mut()
                .push(format!("name:{kind}:{gen:?}:{name}"));
            Ok(None)
        }

        fn tiers(&self, _gen: u8) -> Result<Vec<Tier>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_usage_key() {
        assert_eq!(usage_key("Landorus-Therian"), "landorustherian");
        assert_eq!(usage_key("Mr. Mime"), "mrmime");
        assert_eq!(usage_key(" Farfetch’d "), "farfetchd");
        assert_eq!(usage_key("Porygon2"), "porygon2");
        assert_eq!(usage_key("--"), "");
    }

    #[test]
    fn test_lookup_strategy_per_kind() {
        let catalog = RecordingCatalog::default();
        let resolver = EntityResolver::new(&catalog);

        let hit = resolver.resolve(EntityKind::Pokemon, 9, "Landorus-Therian").unwrap();
        assert_eq!(hit.map(|e| e.id), Some(1));
        assert!(resolver.resolve(EntityKind::Type, 9, "Fairy").unwrap().is_none());
        assert!(resolver.resolve(EntityKind::Nature, 9, "Jolly").unwrap().is_none());

        assert_eq!(
            *catalog.calls.borrow(),
            vec![
                "key:pokemon:9:landorustherian".to_string(),
                "name:type:Some(9):Fairy".to_string(),
                "name:nature:None:Jolly".to_string(),
            ]
        );
    }

    #[test]
    fn test_blank_name_skips_catalog() {
        let catalog = RecordingCatalog::default();
        let resolver = EntityResolver::new(&catalog);

        assert!(resolver.resolve(EntityKind::Item, 9, " - ").unwrap().is_none());
        assert!(catalog.calls.borrow().is_empty());
    }
}
