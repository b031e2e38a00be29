//! Official standings documents.
//!
//! An array of ranked objects without a usage percent. Percent fields on
//! sub-facts are sometimes strings ("12.5") and sometimes numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::entry::{SubFact, UsageEntry};

#[derive(Debug, Deserialize)]
struct Standing {
    name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    ranking: Option<f64>,
    #[serde(default)]
    abilities: Vec<AbilityShare>,
    #[serde(default)]
    items: Vec<ItemShare>,
    #[serde(default)]
    moves: Vec<MoveShare>,
    #[serde(default)]
    teratypes: Vec<TeraShare>,
    #[serde(default)]
    spreads: Vec<SpreadShare>,
    #[serde(default)]
    team: Vec<TeamShare>,
}

#[derive(Debug, Deserialize)]
struct AbilityShare {
    ability: String,
    #[serde(default, deserialize_with = "lenient_number")]
    percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ItemShare {
    item: String,
    #[serde(default, deserialize_with = "lenient_number")]
    percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MoveShare {
    #[serde(rename = "move")]
    move_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TeraShare {
    #[serde(default)]
    teratype: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SpreadShare {
    nature: String,
    #[serde(default)]
    evs: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TeamShare {
    pokemon: String,
    #[serde(default, deserialize_with = "lenient_number")]
    percent: Option<f64>,
}

/// Parse a standings document into entries, in array order
pub fn parse_standings(raw: &str) -> serde_json::Result<Vec<UsageEntry>> {
    let standings: Vec<Standing> = serde_json::from_str(raw)?;

    Ok(standings
        .into_iter()
        .enumerate()
        .map(|(idx, standing)| into_entry(idx as u32 + 1, standing))
        .collect())
}

fn into_entry(position: u32, standing: Standing) -> UsageEntry {
    let declared = standing
        .ranking
        .filter(|r| *r >= 1.0)
        .map(|r| r as u32);

    UsageEntry {
        name: standing.name,
        position,
        usage: None,
        standing: Some(declared.unwrap_or(position)),
        abilities: shares(standing.abilities.into_iter().map(|a| (a.ability, a.percent))),
        items: shares(standing.items.into_iter().map(|i| (i.item, i.percent))),
        moves: shares(standing.moves.into_iter().map(|m| (m.move_name, m.percent))),
        tera_types: shares(
            standing
                .teratypes
                .into_iter()
                .filter_map(|t| match t.teratype {
                    Some(name) if !name.trim().is_empty() => Some((name, t.percent)),
                    _ => None,
                }),
        ),
        spreads: standing
            .spreads
            .into_iter()
            .filter_map(|s| {
                let percent = s.percent?;
                let fact = SubFact::new(s.nature, percent);
                Some(match s.evs {
                    Some(evs) => fact.with_detail(evs),
                    None => fact,
                })
            })
            .collect(),
        // A teammate without a readable share still counts, at zero
        teammates: standing
            .team
            .into_iter()
            .map(|t| SubFact::new(t.pokemon, t.percent.unwrap_or(0.0)))
            .collect(),
        counters: Vec::new(),
    }
}

/// Keep only shares whose percent could be read
fn shares(items: impl Iterator<Item = (String, Option<f64>)>) -> Vec<SubFact> {
    items
        .filter_map(|(name, percent)| match percent {
            Some(percent) => Some(SubFact::new(name, percent)),
            None => {
                debug!(%name, "dropping share without a readable percent");
                None
            }
        })
        .collect()
}

/// Accept a number, or a string starting with one ("12.5", "12.5%")
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_float(&s),
        _ => None,
    })
}

fn parse_leading_float(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (idx, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            '-' | '+' if idx == 0 => {}
            _ => break,
        }
        end = idx + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("12.5"), Some(12.5));
        assert_eq!(parse_leading_float(" 7.25%"), Some(7.25));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float("n/a"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("."), None);
    }

    #[test]
    fn test_parse_standings() {
        let raw = r#"[
            {
                "name": "Flutter Mane",
                "ranking": 1,
                "abilities": [{"ability": "Protosynthesis", "percent": "100.000"}],
                "moves": [{"move": "Moonblast", "percent": 98.5}, {"move": "Shadow Ball", "percent": "?"}],
                "teratypes": [{"teratype": "Fairy", "percent": "60"}, {"teratype": "", "percent": "1"}],
                "spreads": [{"nature": "Timid", "evs": "4/0/0/252/0/252", "percent": "40.1"}],
                "team": [{"pokemon": "Incineroar", "percent": "33.3"}, {"pokemon": "Amoonguss"}]
            },
            {"name": "Incineroar"}
        ]"#;

        let entries = parse_standings(raw).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.standing, Some(1));
        assert_eq!(first.usage, None);
        assert_eq!(first.abilities, vec![SubFact::new("Protosynthesis", 100.0)]);
        assert_eq!(first.moves, vec![SubFact::new("Moonblast", 98.5)]);
        assert_eq!(first.tera_types, vec![SubFact::new("Fairy", 60.0)]);
        assert_eq!(first.spreads[0].detail.as_deref(), Some("4/0/0/252/0/252"));
        assert_eq!(first.teammates[1], SubFact::new("Amoonguss", 0.0));
        assert!(first.counters.is_empty());

        // No declared ranking: the array position stands in
        assert_eq!(entries[1].standing, Some(2));
    }

    #[test]
    fn test_parse_standings_rejects_object() {
        assert!(parse_standings(r#"{"name": "Flutter Mane"}"#).is_err());
    }
}
