//! The fact kinds hanging off a primary usage row, each with its own row builder.

use std::fmt;

use crate::schema::{
    TableSchema, POKEMON_CHECKS, TEAM_MATES, USAGE_ABILITY, USAGE_ITEM, USAGE_MOVE, USAGE_SPREAD,
    USAGE_TERA,
};
use crate::source::{SubFact, UsageEntry};
use crate::store::{EntityKind, Row};

/// Popularity facts about the subject itself, written in the primary phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CorrelationKind {
    Ability,
    Item,
    Move,
    TeraType,
    Spread,
}

impl CorrelationKind {
    /// Import order within one primary row
    pub const ALL: [CorrelationKind; 5] = [
        CorrelationKind::Ability,
        CorrelationKind::Item,
        CorrelationKind::Move,
        CorrelationKind::TeraType,
        CorrelationKind::Spread,
    ];

    /// Catalog entity the fact's name resolves to
    pub fn entity(&self) -> EntityKind {
        match self {
            CorrelationKind::Ability => EntityKind::Ability,
            CorrelationKind::Item => EntityKind::Item,
            CorrelationKind::Move => EntityKind::Move,
            CorrelationKind::TeraType => EntityKind::Type,
            CorrelationKind::Spread => EntityKind::Nature,
        }
    }

    pub fn table(&self) -> &'static TableSchema {
        match self {
            CorrelationKind::Ability => &USAGE_ABILITY,
            CorrelationKind::Item => &USAGE_ITEM,
            CorrelationKind::Move => &USAGE_MOVE,
            CorrelationKind::TeraType => &USAGE_TERA,
            CorrelationKind::Spread => &USAGE_SPREAD,
        }
    }

    pub fn facts<'e>(&self, entry: &'e UsageEntry) -> &'e [SubFact] {
        match self {
            CorrelationKind::Ability => &entry.abilities,
            CorrelationKind::Item => &entry.items,
            CorrelationKind::Move => &entry.moves,
            CorrelationKind::TeraType => &entry.tera_types,
            CorrelationKind::Spread => &entry.spreads,
        }
    }

    pub fn row(&self, tier_usage_id: i64, resolved_id: i64, fact: &SubFact) -> Row {
        let row = Row::new(self.table()).set("tier_usage_id", tier_usage_id);
        let row = match self {
            CorrelationKind::Ability => row.set("ability_id", resolved_id),
            CorrelationKind::Item => row.set("item_id", resolved_id),
            CorrelationKind::Move => row.set("move_id", resolved_id),
            CorrelationKind::TeraType => row.set("type_id", resolved_id),
            CorrelationKind::Spread => row
                .set("nature_id", resolved_id)
                .set("evs", fact.detail.clone()),
        };
        row.set("percent", fact.percent)
    }
}

impl fmt::Display for CorrelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CorrelationKind::Ability => "ability",
            CorrelationKind::Item => "item",
            CorrelationKind::Move => "move",
            CorrelationKind::TeraType => "tera type",
            CorrelationKind::Spread => "spread",
        };
        f.write_str(label)
    }
}

/// Facts pairing the subject with another pokemon, written in the link stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    Teammate,
    Counter,
}

impl RelationKind {
    pub const ALL: [RelationKind; 2] = [RelationKind::Teammate, RelationKind::Counter];

    pub fn table(&self) -> &'static TableSchema {
        match self {
            RelationKind::Teammate => &TEAM_MATES,
            RelationKind::Counter => &POKEMON_CHECKS,
        }
    }

    pub fn facts<'e>(&self, entry: &'e UsageEntry) -> &'e [SubFact] {
        match self {
            RelationKind::Teammate => &entry.teammates,
            RelationKind::Counter => &entry.counters,
        }
    }

    /// `fact.percent` is the co-usage share for teammates and the
    /// effectiveness score for counters
    pub fn row(&self, tier_usage_id: i64, counterpart_id: i64, fact: &SubFact) -> Row {
        Row::new(self.table())
            .set("tier_usage_id", tier_usage_id)
            .set("pokemon_id", counterpart_id)
            .set("percent", fact.percent)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Teammate => f.write_str("teammate"),
            RelationKind::Counter => f.write_str("counter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlValue;

    #[test]
    fn test_rows_fill_every_required_column() {
        let fact = SubFact::new("Jolly", 31.5).with_detail("0/252/0/0/4/252");

        for kind in CorrelationKind::ALL {
            let row = kind.row(7, 3, &fact);
            for col in kind.table().columns {
                if col.name == "id" || col.nullable {
                    continue;
                }
                assert!(row.get(col.name).is_some(), "{kind}: missing {}", col.name);
            }
            assert!(row.values.iter().all(|(name, _)| kind.table().has_column(name)));
        }

        for kind in RelationKind::ALL {
            let row = kind.row(7, 3, &fact);
            assert_eq!(row.get("pokemon_id"), Some(&SqlValue::Integer(3)));
            assert_eq!(row.get("percent"), Some(&SqlValue::Real(31.5)));
        }
    }

    #[test]
    fn test_spread_row_carries_evs() {
        let fact = SubFact::new("Jolly", 31.5).with_detail("0/252/0/0/4/252");
        let row = CorrelationKind::Spread.row(7, 3, &fact);
        assert_eq!(
            row.get("evs"),
            Some(&SqlValue::Text("0/252/0/0/4/252".to_string()))
        );
    }

    #[test]
    fn test_tera_types_resolve_as_types() {
        assert_eq!(CorrelationKind::TeraType.entity(), EntityKind::Type);
        assert_eq!(CorrelationKind::Spread.entity(), EntityKind::Nature);
    }
}
