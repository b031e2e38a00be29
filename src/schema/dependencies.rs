use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolves table dependencies for creation and clearing order
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
    /// Map of table name -> tables that depend on it
    reverse_deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let mut deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        let mut reverse_deps: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();

        for table in ALL_TABLES {
            let table_deps = table.dependencies();
            deps.insert(table.name, table_deps.clone());

            for dep in table_deps {
                reverse_deps.entry(dep).or_default().insert(table.name);
            }
        }

        Self { deps, reverse_deps }
    }

    /// All tables in dependency order (parents before children)
    pub fn creation_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let included: HashSet<&str> = ALL_TABLES.iter().map(|t| t.name).collect();
        self.topological_sort(&included)
    }

    /// A table plus every table that transitively references it,
    /// ordered children before parents so rows can be deleted without
    /// violating foreign keys.
    pub fn deletion_order(&self, root: &str) -> Result<Vec<&'static TableSchema>, String> {
        if get_table(root).is_none() {
            return Err(format!("Unknown table: {}", root));
        }

        let mut included: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([root]);

        while let Some(table_name) = queue.pop_front() {
            if !included.insert(table_name) {
                continue;
            }
            if let Some(children) = self.reverse_deps.get(table_name) {
                for child in children {
                    if !included.contains(child) {
                        queue.push_back(child);
                    }
                }
            }
        }

        let mut ordered = self.topological_sort(&included)?;
        ordered.reverse();
        Ok(ordered)
    }

    /// Topological sort of tables by dependencies
    fn topological_sort(
        &self,
        included: &HashSet<&str>,
    ) -> Result<Vec<&'static TableSchema>, String> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        // Walk in registry order so the output is deterministic
        for table in ALL_TABLES {
            if included.contains(table.name) && !visited.contains(table.name) {
                self.visit(
                    table.name,
                    included,
                    &mut visited,
                    &mut temp_visited,
                    &mut result,
                )?;
            }
        }

        Ok(result)
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        included: &HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<(), String> {
        if temp_visited.contains(name) {
            return Err(format!("Circular dependency detected at: {}", name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            for dep in deps {
                if *dep != name && included.contains(dep) {
                    self.visit(dep, included, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        if let Some(table) = get_table(name) {
            result.push(table);
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(names: &[&str], name: &str) -> usize {
        names.iter().position(|&n| n == name).unwrap()
    }

    #[test]
    fn test_creation_order_puts_parents_first() {
        let resolver = DependencyResolver::new();
        let tables = resolver.creation_order().unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        assert_eq!(names.len(), ALL_TABLES.len());
        assert!(position(&names, "type") < position(&names, "pokemon"));
        assert!(position(&names, "pokemon") < position(&names, "tier_usage"));
        assert!(position(&names, "tier_usage") < position(&names, "team_mate"));
    }

    #[test]
    fn test_deletion_order_of_tier_usage() {
        let resolver = DependencyResolver::new();
        let tables = resolver.deletion_order("tier_usage").unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();

        assert_eq!(names.len(), 8);
        assert_eq!(names.last(), Some(&"tier_usage"));
        assert!(names.contains(&"usage_spread"));
        assert!(names.contains(&"pokemon_check"));
        // Catalog tables are never part of a clear
        assert!(!names.contains(&"pokemon"));
    }

    #[test]
    fn test_unknown_table_error() {
        let resolver = DependencyResolver::new();
        assert!(resolver.deletion_order("nonexistent").is_err());
    }
}
