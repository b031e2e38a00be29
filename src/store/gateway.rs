use crate::error::Result;
use crate::schema::TableSchema;

use super::value::SqlValue;

/// A row ready for insertion into one table
#[derive(Debug, Clone)]
pub struct Row {
    pub table: &'static TableSchema,
    pub values: Vec<(&'static str, SqlValue)>,
}

impl Row {
    pub fn new(table: &'static TableSchema) -> Self {
        Self {
            table,
            values: Vec::new(),
        }
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}

/// Row filter for deletes
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `column = value`
    Eq(&'static str, SqlValue),
    /// Every inner predicate holds
    All(Vec<Predicate>),
    /// `column IN (SELECT select_column FROM table WHERE filter)`
    InSelect {
        column: &'static str,
        table: &'static str,
        select_column: &'static str,
        filter: Box<Predicate>,
    },
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Predicate::Eq(column, value.into())
    }

    /// Render as a SQL boolean expression, appending bound values in order
    pub fn to_sql(&self, params: &mut Vec<SqlValue>) -> String {
        match self {
            Predicate::Eq(column, value) => {
                params.push(value.clone());
                format!("{} = ?", column)
            }
            Predicate::All(parts) if parts.is_empty() => "1 = 1".to_string(),
            Predicate::All(parts) => {
                let rendered: Vec<String> = parts
                    .iter()
                    .map(|p| format!("({})", p.to_sql(params)))
                    .collect();
                rendered.join(" AND ")
            }
            Predicate::InSelect {
                column,
                table,
                select_column,
                filter,
            } => {
                let inner = filter.to_sql(params);
                format!(
                    "{} IN (SELECT {} FROM {} WHERE {})",
                    column, select_column, table, inner
                )
            }
        }
    }
}

/// Write access to the derived tables
pub trait Persistence {
    /// Insert a row and return its generated id
    fn insert(&self, row: &Row) -> Result<i64>;

    /// Delete every row of `table` matching `predicate`, returning the count
    fn delete_where(&self, table: &TableSchema, predicate: &Predicate) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_to_sql() {
        let predicate = Predicate::InSelect {
            column: "tier_usage_id",
            table: "tier_usage",
            select_column: "id",
            filter: Box::new(Predicate::All(vec![
                Predicate::eq("tier_id", 3i64),
                Predicate::eq("provider", "showdown"),
            ])),
        };

        let mut params = Vec::new();
        let sql = predicate.to_sql(&mut params);

        assert_eq!(
            sql,
            "tier_usage_id IN (SELECT id FROM tier_usage WHERE (tier_id = ?) AND (provider = ?))"
        );
        assert_eq!(
            params,
            vec![SqlValue::Integer(3), SqlValue::Text("showdown".to_string())]
        );
    }

    #[test]
    fn test_empty_conjunction_matches_everything() {
        let mut params = Vec::new();
        assert_eq!(Predicate::All(vec![]).to_sql(&mut params), "1 = 1");
        assert!(params.is_empty());
    }
}
