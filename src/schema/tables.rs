//! Table schema definitions for the reference catalog and the derived usage tables

use super::types::*;

// =============================================================================
// Catalog Tables (populated elsewhere, read-only during imports)
// =============================================================================

pub static TYPES: TableSchema = TableSchema {
    name: "type",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("gen", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name", "gen"])],
};

pub static NATURES: TableSchema = TableSchema {
    name: "nature",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("usage_name", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
};

pub static ABILITIES: TableSchema = TableSchema {
    name: "ability",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("usage_name", ColumnType::Text),
        Column::required("gen", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["usage_name", "gen"])],
};

pub static ITEMS: TableSchema = TableSchema {
    name: "item",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("usage_name", ColumnType::Text),
        Column::required("gen", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["usage_name", "gen"])],
};

pub static MOVES: TableSchema = TableSchema {
    name: "move",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("usage_name", ColumnType::Text),
        Column::required("gen", ColumnType::Integer),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["usage_name", "gen"])],
};

pub static POKEMON: TableSchema = TableSchema {
    name: "pokemon",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("usage_name", ColumnType::Text),
        Column::required("gen", ColumnType::Integer),
        Column::new("type_1_id", ColumnType::Integer),
        Column::new("type_2_id", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("type_1_id", "type"),
        ForeignKey::new("type_2_id", "type"),
    ],
    indexes: &[Index::on(&["usage_name", "gen"])],
};

pub static TIERS: TableSchema = TableSchema {
    name: "tier",
    scope: TableScope::Catalog,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("gen", ColumnType::Integer),
        Column::new("usage_name", ColumnType::Text),
        Column::new("ladder_ref", ColumnType::Text),
        Column::required("official", ColumnType::Boolean),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["gen"])],
};

// =============================================================================
// Derived Tables (rebuilt on every import batch)
// =============================================================================

pub static TIER_USAGE: TableSchema = TableSchema {
    name: "tier_usage",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
        Column::required("rank", ColumnType::Integer),
        Column::required("provider", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_id", "tier"),
        ForeignKey::new("pokemon_id", "pokemon"),
    ],
    indexes: &[Index::on(&["tier_id", "provider"])],
};

pub static USAGE_ABILITY: TableSchema = TableSchema {
    name: "usage_ability",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("ability_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("ability_id", "ability"),
    ],
    indexes: &[],
};

pub static USAGE_ITEM: TableSchema = TableSchema {
    name: "usage_item",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("item_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("item_id", "item"),
    ],
    indexes: &[],
};

pub static USAGE_MOVE: TableSchema = TableSchema {
    name: "usage_move",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("move_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("move_id", "move"),
    ],
    indexes: &[],
};

pub static USAGE_TERA: TableSchema = TableSchema {
    name: "usage_tera",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("type_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("type_id", "type"),
    ],
    indexes: &[],
};

pub static USAGE_SPREAD: TableSchema = TableSchema {
    name: "usage_spread",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("nature_id", ColumnType::Integer),
        Column::new("evs", ColumnType::Text),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("nature_id", "nature"),
    ],
    indexes: &[],
};

pub static TEAM_MATES: TableSchema = TableSchema {
    name: "team_mate",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("pokemon_id", "pokemon"),
    ],
    indexes: &[],
};

pub static POKEMON_CHECKS: TableSchema = TableSchema {
    name: "pokemon_check",
    scope: TableScope::Derived,
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("tier_usage_id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("percent", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("tier_usage_id", "tier_usage"),
        ForeignKey::new("pokemon_id", "pokemon"),
    ],
    indexes: &[],
};

// =============================================================================
// Table Registry
// =============================================================================

/// All tables in creation order (parents before children)
pub static ALL_TABLES: &[&TableSchema] = &[
    // Wave 1: No dependencies
    &TYPES,
    &NATURES,
    &ABILITIES,
    &ITEMS,
    &MOVES,
    &TIERS,
    // Wave 2: Catalog tables with FK dependencies
    &POKEMON,
    // Wave 3: Primary usage rows
    &TIER_USAGE,
    // Wave 4: Rows hanging off a primary usage row
    &USAGE_ABILITY,
    &USAGE_ITEM,
    &USAGE_MOVE,
    &USAGE_TERA,
    &USAGE_SPREAD,
    &TEAM_MATES,
    &POKEMON_CHECKS,
];

/// Get a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

/// All tables rebuilt by usage imports
pub fn derived_tables() -> Vec<&'static TableSchema> {
    ALL_TABLES
        .iter()
        .filter(|t| t.scope == TableScope::Derived)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_unique() {
        let names = table_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn test_foreign_keys_reference_known_tables() {
        for table in ALL_TABLES {
            for fk in table.foreign_keys {
                assert!(
                    get_table(fk.references_table).is_some(),
                    "{}.{} references unknown table {}",
                    table.name,
                    fk.column,
                    fk.references_table
                );
                assert!(table.has_column(fk.column));
            }
        }
    }

    #[test]
    fn test_derived_tables_hang_off_tier_usage() {
        for table in derived_tables() {
            if table.name == "tier_usage" {
                continue;
            }
            assert_eq!(table.column_referencing("tier_usage"), Some("tier_usage_id"));
        }
    }
}
