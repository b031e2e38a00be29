use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Where a batch of usage data comes from. Batches are cleared and rebuilt
/// independently per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Self-reported ladder statistics
    SelfReported,
    /// Official tournament standings
    OfficialStanding,
}

impl Provider {
    /// Tag stored in `tier_usage.provider`
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::SelfReported => "showdown",
            Provider::OfficialStanding => "home",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "showdown" | "ladder" | "self-reported" => Ok(Provider::SelfReported),
            "home" | "official" | "official-standing" => Ok(Provider::OfficialStanding),
            _ => Err(Error::UnknownProvider(s.to_string())),
        }
    }
}

/// One named, weighted sub-fact of a usage entry (an ability, a teammate, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct SubFact {
    pub name: String,
    pub percent: f64,
    /// Extra payload carried into the row; the EV string for spreads
    pub detail: Option<String>,
}

impl SubFact {
    pub fn new(name: impl Into<String>, percent: f64) -> Self {
        Self {
            name: name.into(),
            percent,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A source document entry, normalized across providers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageEntry {
    /// Raw display name as it appears in the document
    pub name: String,
    /// 1-based position in the document
    pub position: u32,
    /// Usage percent reported by the document, if any
    pub usage: Option<f64>,
    /// Ordinal standing declared by the document, if any
    pub standing: Option<u32>,
    pub abilities: Vec<SubFact>,
    pub items: Vec<SubFact>,
    pub moves: Vec<SubFact>,
    pub tera_types: Vec<SubFact>,
    /// Nature name with the EV string as detail
    pub spreads: Vec<SubFact>,
    pub teammates: Vec<SubFact>,
    pub counters: Vec<SubFact>,
}

impl UsageEntry {
    pub fn new(name: impl Into<String>, position: u32) -> Self {
        Self {
            name: name.into(),
            position,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trips_through_tag() {
        for provider in [Provider::SelfReported, Provider::OfficialStanding] {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
        assert!("smogon".parse::<Provider>().is_err());
    }
}
