use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

use super::catalog::{Catalog, EntityKind, EntityRef, Tier};
use super::gateway::{Persistence, Predicate, Row};
use super::schema_gen::{generate_create_table, generate_indexes};
use super::value::SqlValue;
use crate::error::Result;
use crate::schema::TableSchema;

/// SQLite-backed catalog reader and derived-row writer
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::configure(conn)
    }

    /// Open an in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Enforce catalog references and keep per-row inserts cheap
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables for the given schemas, skipping ones that exist
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        info!(tables = schemas.len(), "creating tables");

        for schema in schemas {
            self.conn.execute(&generate_create_table(schema), [])?;

            for index_sql in generate_indexes(schema) {
                self.conn.execute(&index_sql, [])?;
            }
        }

        Ok(())
    }

    /// Count rows of `table` matching `predicate`
    pub fn count_where(&self, table: &TableSchema, predicate: &Predicate) -> Result<usize> {
        let mut params = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM \"{}\" WHERE {}",
            table.name,
            predicate.to_sql(&mut params)
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        bind_all(&mut stmt, &params)?;
        let mut rows = stmt.raw_query();
        let count: i64 = match rows.next()? {
            Some(row) => row.get(0)?,
            None => 0,
        };

        Ok(count as usize)
    }

    /// Tiers of a generation flagged as official formats
    pub fn official_tiers(&self, gen: u8) -> Result<Vec<Tier>> {
        Ok(self
            .tiers(gen)?
            .into_iter()
            .filter(|tier| tier.official)
            .collect())
    }

    /// Raw connection access for seeding and inspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Finalize the database
    pub fn finalize(self) -> Result<()> {
        debug!("optimizing database");
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }

    fn find_entity(&self, sql: &str, params: &[SqlValue]) -> Result<Option<EntityRef>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        bind_all(&mut stmt, params)?;
        let mut rows = stmt.raw_query();

        let entity = rows
            .next()?
            .map(|row| -> rusqlite::Result<EntityRef> {
                Ok(EntityRef {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .transpose()?;

        Ok(entity)
    }
}

impl Catalog for SqliteStore {
    fn resolve_by_usage_key(
        &self,
        kind: EntityKind,
        gen: u8,
        usage_key: &str,
    ) -> Result<Option<EntityRef>> {
        let sql = format!(
            "SELECT id, name FROM \"{}\" WHERE usage_name = ?1 AND gen = ?2 ORDER BY id LIMIT 1",
            kind.table().name
        );
        self.find_entity(&sql, &[usage_key.into(), gen.into()])
    }

    fn resolve_by_name(
        &self,
        kind: EntityKind,
        gen: Option<u8>,
        name: &str,
    ) -> Result<Option<EntityRef>> {
        let table = kind.table().name;
        match gen {
            Some(gen) => {
                let sql = format!(
                    "SELECT id, name FROM \"{}\" WHERE name = ?1 AND gen = ?2 ORDER BY id LIMIT 1",
                    table
                );
                self.find_entity(&sql, &[name.into(), gen.into()])
            }
            None => {
                let sql = format!(
                    "SELECT id, name FROM \"{}\" WHERE name = ?1 ORDER BY id LIMIT 1",
                    table
                );
                self.find_entity(&sql, &[name.into()])
            }
        }
    }

    fn tiers(&self, gen: u8) -> Result<Vec<Tier>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, gen, usage_name, ladder_ref, official
             FROM \"tier\"
             WHERE gen = ?1 AND usage_name IS NOT NULL
             ORDER BY id",
        )?;

        let tiers = stmt
            .query_map([gen], |row| {
                Ok(Tier {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    gen: row.get(2)?,
                    usage_name: row.get(3)?,
                    ladder_ref: row.get(4)?,
                    official: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tiers)
    }
}

impl Persistence for SqliteStore {
    fn insert(&self, row: &Row) -> Result<i64> {
        let columns: Vec<&str> = row.values.iter().map(|(name, _)| *name).collect();
        let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            row.table.name,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        for (idx, (_, value)) in row.values.iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute()?;

        Ok(self.conn.last_insert_rowid())
    }

    fn delete_where(&self, table: &TableSchema, predicate: &Predicate) -> Result<usize> {
        let mut params = Vec::new();
        let sql = format!(
            "DELETE FROM \"{}\" WHERE {}",
            table.name,
            predicate.to_sql(&mut params)
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        bind_all(&mut stmt, &params)?;
        Ok(stmt.raw_execute()?)
    }
}

fn bind_all(stmt: &mut rusqlite::Statement, params: &[SqlValue]) -> rusqlite::Result<()> {
    for (idx, value) in params.iter().enumerate() {
        value.bind_to(idx + 1, stmt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ALL_TABLES, POKEMON, TIER_USAGE};

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_tables(ALL_TABLES).unwrap();
        store
            .connection()
            .execute_batch(
                "INSERT INTO \"tier\" (id, name, gen, usage_name, official) VALUES (1, 'OU', 9, 'ou', 0);
                 INSERT INTO \"tier\" (id, name, gen, usage_name, official) VALUES (2, 'VGC', 9, 'vgc2024', 1);
                 INSERT INTO \"tier\" (id, name, gen, usage_name, official) VALUES (3, 'Hidden', 9, NULL, 0);
                 INSERT INTO \"pokemon\" (id, name, usage_name, gen) VALUES (10, 'Garchomp', 'garchomp', 9);
                 INSERT INTO \"pokemon\" (id, name, usage_name, gen) VALUES (11, 'Garchomp', 'garchomp', 8);
                 INSERT INTO \"nature\" (id, name, usage_name) VALUES (1, 'Jolly', 'jolly');",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_create_tables_is_repeatable() {
        let store = store();
        store.create_tables(ALL_TABLES).unwrap();
    }

    #[test]
    fn test_resolve_by_usage_key_respects_generation() {
        let store = store();
        let hit = store
            .resolve_by_usage_key(EntityKind::Pokemon, 8, "garchomp")
            .unwrap()
            .unwrap();
        assert_eq!(hit.id, 11);
        assert!(store
            .resolve_by_usage_key(EntityKind::Pokemon, 7, "garchomp")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_resolve_nature_ignores_generation() {
        let store = store();
        let hit = store
            .resolve_by_name(EntityKind::Nature, None, "Jolly")
            .unwrap()
            .unwrap();
        assert_eq!(hit.id, 1);
    }

    #[test]
    fn test_tiers_require_usage_name() {
        let store = store();
        let tiers = store.tiers(9).unwrap();
        assert_eq!(tiers.len(), 2);
        let official = store.official_tiers(9).unwrap();
        assert_eq!(official.len(), 1);
        assert_eq!(official[0].usage_name, "vgc2024");
    }

    #[test]
    fn test_insert_and_delete_where() {
        let store = store();
        let row = Row::new(&TIER_USAGE)
            .set("tier_id", 1i64)
            .set("pokemon_id", 10i64)
            .set("percent", 42.5)
            .set("rank", 1u32)
            .set("provider", "showdown");

        let first = store.insert(&row).unwrap();
        let second = store.insert(&row).unwrap();
        assert_ne!(first, second);

        let scope = Predicate::eq("tier_id", 1i64);
        assert_eq!(store.count_where(&TIER_USAGE, &scope).unwrap(), 2);
        assert_eq!(store.delete_where(&TIER_USAGE, &scope).unwrap(), 2);
        assert_eq!(store.count_where(&TIER_USAGE, &scope).unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_unknown_catalog_reference() {
        let store = store();
        let row = Row::new(&TIER_USAGE)
            .set("tier_id", 1i64)
            .set("pokemon_id", 999i64)
            .set("percent", 42.5)
            .set("rank", 1u32)
            .set("provider", "showdown");

        assert!(store.insert(&row).is_err());
        assert_eq!(
            store
                .count_where(&POKEMON, &Predicate::All(vec![]))
                .unwrap(),
            2
        );
    }
}
