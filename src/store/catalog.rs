use std::fmt;

use crate::error::Result;
use crate::schema::{TableSchema, ABILITIES, ITEMS, MOVES, NATURES, POKEMON, TYPES};

/// Kinds of reference entity a usage document can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Pokemon,
    Ability,
    Item,
    Move,
    Type,
    Nature,
}

impl EntityKind {
    pub fn table(&self) -> &'static TableSchema {
        match self {
            EntityKind::Pokemon => &POKEMON,
            EntityKind::Ability => &ABILITIES,
            EntityKind::Item => &ITEMS,
            EntityKind::Move => &MOVES,
            EntityKind::Type => &TYPES,
            EntityKind::Nature => &NATURES,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table().name)
    }
}

/// A resolved catalog row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub id: i64,
    pub name: String,
}

/// A competitive format within a generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub id: i64,
    pub name: String,
    pub gen: u8,
    pub usage_name: String,
    pub ladder_ref: Option<String>,
    pub official: bool,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}{}", self.gen, self.usage_name)
    }
}

/// Read-only lookups against the reference catalog
pub trait Catalog {
    /// Look up by normalized usage key within a generation
    fn resolve_by_usage_key(
        &self,
        kind: EntityKind,
        gen: u8,
        usage_key: &str,
    ) -> Result<Option<EntityRef>>;

    /// Look up by literal display name; `gen: None` ignores the generation
    fn resolve_by_name(
        &self,
        kind: EntityKind,
        gen: Option<u8>,
        name: &str,
    ) -> Result<Option<EntityRef>>;

    /// Tiers of a generation that have a usage name
    fn tiers(&self, gen: u8) -> Result<Vec<Tier>>;
}
