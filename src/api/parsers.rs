use std::collections::BTreeSet;

use crate::aggregation::RankOrder;
use crate::domain::{DiscrepancyType, YearRange};

/// Comma-separated list. Absent means "no filter"; present but empty
/// means "match nothing".
pub fn parse_list(raw: Option<&str>) -> Option<BTreeSet<String>> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
}

pub fn parse_types(raw: Option<&str>) -> Result<Option<BTreeSet<DiscrepancyType>>, String> {
    match parse_list(raw) {
        None => Ok(None),
        Some(items) => items
            .iter()
            .map(|item| item.parse::<DiscrepancyType>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some),
    }
}

/// Either bound may be omitted for an open-ended range
pub fn parse_year_range(from: Option<i32>, to: Option<i32>) -> Option<YearRange> {
    match (from, to) {
        (None, None) => None,
        (Some(from), None) => Some(YearRange::new(from, i32::MAX)),
        (None, Some(to)) => Some(YearRange::new(i32::MIN, to)),
        (Some(from), Some(to)) => Some(YearRange::new(from, to)),
    }
}

pub fn parse_order(raw: Option<&str>) -> Result<RankOrder, String> {
    match raw.map(|o| o.trim().to_ascii_lowercase()).as_deref() {
        None | Some("desc") => Ok(RankOrder::Descending),
        Some("asc") => Ok(RankOrder::Ascending),
        Some(other) => Err(format!("unknown order: {}", other)),
    }
}
