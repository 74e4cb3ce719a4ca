use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type GameId = i64;

/// One row of the raw dataset: a title under a single genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub name: String,
    pub genre_name: String,
    #[serde(default)]
    pub developer_name: String,
    pub year: i32,
    pub metacritic: Option<f64>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub added: u64,
    /// Variance of individual user ratings (1-5 scale), when the source has it
    #[serde(default)]
    pub rating_variance: Option<f64>,
}

/// A record with both scores present, placed on the common 0-100 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGame {
    pub id: GameId,
    pub name: String,
    pub genre_name: String,
    pub developer_name: String,
    pub year: i32,
    pub metacritic: f64,
    pub rating: f64,
    pub added: u64,
    pub rating_variance: Option<f64>,
    pub normalized_rating: f64,
    pub discrepancy_score: f64,
    pub discrepancy_type: DiscrepancyType,
    pub is_extreme: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyType {
    Overhyped,  // critics markedly above users
    Polarizing, // split user opinion, or between the bands
    Consensus,  // within the consensus band
    HiddenGem,  // users markedly above critics
}

impl DiscrepancyType {
    pub const ALL: [DiscrepancyType; 4] = [
        DiscrepancyType::Overhyped,
        DiscrepancyType::Polarizing,
        DiscrepancyType::Consensus,
        DiscrepancyType::HiddenGem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyType::Overhyped => "overhyped",
            DiscrepancyType::Polarizing => "polarizing",
            DiscrepancyType::Consensus => "consensus",
            DiscrepancyType::HiddenGem => "hidden_gem",
        }
    }
}

impl fmt::Display for DiscrepancyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscrepancyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overhyped" => Ok(DiscrepancyType::Overhyped),
            "polarizing" => Ok(DiscrepancyType::Polarizing),
            "consensus" => Ok(DiscrepancyType::Consensus),
            "hidden_gem" | "hidden-gem" | "hiddengem" => Ok(DiscrepancyType::HiddenGem),
            other => Err(format!("unknown discrepancy type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrepancy_type_parse() {
        assert_eq!("hidden_gem".parse(), Ok(DiscrepancyType::HiddenGem));
        assert_eq!(" Overhyped ".parse(), Ok(DiscrepancyType::Overhyped));
        assert!("meh".parse::<DiscrepancyType>().is_err());

        for kind in DiscrepancyType::ALL {
            assert_eq!(kind.as_str().parse(), Ok(kind));
        }
    }

    #[test]
    fn test_discrepancy_type_serializes_snake_case() {
        let json = serde_json::to_string(&DiscrepancyType::HiddenGem).unwrap();
        assert_eq!(json, "\"hidden_gem\"");
    }
}
