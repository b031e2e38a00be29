use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS \"{}\" (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let pk = if col.name == "id" { " PRIMARY KEY" } else { "" };

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint
        ));
    }

    // Add foreign key constraints
    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES \"{}\"({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns and explicit indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let fk_indexes = schema.foreign_keys.iter().map(|fk| {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{} ON \"{}\"({})",
            schema.name, fk.column, schema.name, fk.column
        )
    });

    let explicit = schema.indexes.iter().map(|index| {
        format!(
            "CREATE {}INDEX IF NOT EXISTS idx_{}_{} ON \"{}\"({})",
            if index.unique { "UNIQUE " } else { "" },
            schema.name,
            index.columns.join("_"),
            schema.name,
            index.columns.join(", ")
        )
    });

    fk_indexes.chain(explicit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{TIER_USAGE, TYPES};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&TIER_USAGE);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS \"tier_usage\""));
        assert!(sql.contains("id INTEGER PRIMARY KEY"));
        assert!(sql.contains("percent REAL NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (pokemon_id) REFERENCES \"pokemon\"(id)"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&TIER_USAGE);
        assert!(indexes.iter().any(|i| i.contains("idx_tier_usage_tier_id ")));
        assert!(indexes.iter().any(|i| i.contains("idx_tier_usage_tier_id_provider")));

        let indexes = generate_indexes(&TYPES);
        assert_eq!(indexes.len(), 1);
        assert!(indexes[0].starts_with("CREATE UNIQUE INDEX"));
    }
}
