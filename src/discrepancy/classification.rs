use crate::config::settings::DiscrepancySettings;
use crate::domain::DiscrepancyType;

/// Assigns exactly one type to any score, NaN included.
///
/// Bands are checked in order: consensus, split user opinion, overhyped,
/// hidden gem. Whatever is left (scores between the consensus band and the
/// directional thresholds, or non-finite input) is polarizing. Without a
/// volatility signal the split-opinion check never fires.
pub fn classify(
    score: f64,
    volatility: Option<f64>,
    bands: &DiscrepancySettings,
) -> DiscrepancyType {
    if score.abs() <= bands.consensus_band {
        DiscrepancyType::Consensus
    } else if is_split_opinion(volatility, bands) {
        DiscrepancyType::Polarizing
    } else if score <= bands.overhyped_threshold {
        DiscrepancyType::Overhyped
    } else if score >= bands.hidden_gem_threshold {
        DiscrepancyType::HiddenGem
    } else {
        DiscrepancyType::Polarizing
    }
}

pub fn is_extreme(score: f64, bands: &DiscrepancySettings) -> bool {
    score.abs() >= bands.extreme_threshold
}

fn is_split_opinion(volatility: Option<f64>, bands: &DiscrepancySettings) -> bool {
    volatility.is_some_and(|variance| variance >= bands.polarizing_variance)
}
