//! Self-reported ladder documents (`pokedata.json`).
//!
//! The document is an object keyed by display name. Key order is the
//! provider's ranking by descending usage and is kept as-is.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::entry::{SubFact, UsageEntry};

#[derive(Debug, Deserialize)]
struct LadderDetail {
    usage: f64,
    #[serde(default)]
    abilities: Vec<NamedUsage>,
    #[serde(default)]
    items: Vec<NamedUsage>,
    #[serde(default)]
    moves: Vec<NamedUsage>,
    #[serde(default)]
    teratypes: Vec<NamedUsage>,
    #[serde(default)]
    spreads: Vec<LadderSpread>,
    #[serde(default)]
    teammates: Vec<NamedUsage>,
    #[serde(default)]
    counters: Vec<Counter>,
}

#[derive(Debug, Deserialize)]
struct NamedUsage {
    name: String,
    usage: f64,
}

#[derive(Debug, Deserialize)]
struct LadderSpread {
    nature: String,
    evs: Value,
    usage: f64,
}

#[derive(Debug, Deserialize)]
struct Counter {
    name: String,
    eff: f64,
}

impl From<NamedUsage> for SubFact {
    fn from(value: NamedUsage) -> Self {
        SubFact::new(value.name, value.usage)
    }
}

/// Parse a ladder document into entries, in document order
pub fn parse_ladder(raw: &str) -> serde_json::Result<Vec<UsageEntry>> {
    let document: Map<String, Value> = serde_json::from_str(raw)?;

    document
        .into_iter()
        .enumerate()
        .map(|(idx, (name, detail))| {
            let detail: LadderDetail = serde_json::from_value(detail)?;
            Ok(into_entry(name, idx as u32 + 1, detail))
        })
        .collect()
}

fn into_entry(name: String, position: u32, detail: LadderDetail) -> UsageEntry {
    UsageEntry {
        name,
        position,
        usage: Some(detail.usage),
        standing: None,
        abilities: detail.abilities.into_iter().map(Into::into).collect(),
        items: detail.items.into_iter().map(Into::into).collect(),
        moves: detail.moves.into_iter().map(Into::into).collect(),
        tera_types: detail.teratypes.into_iter().map(Into::into).collect(),
        spreads: detail
            .spreads
            .into_iter()
            .map(|s| SubFact::new(s.nature, s.usage).with_detail(evs_text(s.evs)))
            .collect(),
        teammates: detail.teammates.into_iter().map(Into::into).collect(),
        counters: detail
            .counters
            .into_iter()
            .map(|c| SubFact::new(c.name, c.eff))
            .collect(),
    }
}

fn evs_text(evs: Value) -> String {
    match evs {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ladder_keeps_document_order() {
        let raw = r#"{
            "Landorus-Therian": {"usage": 42.3, "abilities": [{"name": "Intimidate", "usage": 99.1}]},
            "Great Tusk": {"usage": 30.0},
            "Garchomp": {"usage": 0.9}
        }"#;

        let entries = parse_ladder(raw).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["Landorus-Therian", "Great Tusk", "Garchomp"]);
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[2].position, 3);
        assert_eq!(entries[0].usage, Some(42.3));
        assert_eq!(entries[0].abilities, vec![SubFact::new("Intimidate", 99.1)]);
        assert!(entries[1].abilities.is_empty());
    }

    #[test]
    fn test_parse_ladder_spreads_and_counters() {
        let raw = r#"{
            "Garchomp": {
                "usage": 12.0,
                "spreads": [{"nature": "Jolly", "evs": "0/252/0/0/4/252", "usage": 31.5}],
                "counters": [{"name": "Skarmory", "eff": 55.2}]
            }
        }"#;

        let entries = parse_ladder(raw).unwrap();
        assert_eq!(entries[0].spreads[0].name, "Jolly");
        assert_eq!(entries[0].spreads[0].detail.as_deref(), Some("0/252/0/0/4/252"));
        assert_eq!(entries[0].counters, vec![SubFact::new("Skarmory", 55.2)]);
    }

    #[test]
    fn test_parse_ladder_requires_usage() {
        assert!(parse_ladder(r#"{"Garchomp": {"abilities": []}}"#).is_err());
        assert!(parse_ladder("[]").is_err());
    }
}
