use colored::*;
use std::fmt::Write;

use crate::aggregation::RankOrder;
use crate::analytics::DiscrepancySnapshot;
use crate::domain::{DiscrepancyType, ExtremeCase, GenreAggregate};

/// Terminal summary of a snapshot
pub fn render_report(snapshot: &DiscrepancySnapshot, top: usize) -> String {
    let mut out = String::new();
    let stats = snapshot.overall_stats();
    let coverage = snapshot.coverage();

    let _ = writeln!(out, "{}", "Rating Discrepancy Report".bright_green().bold());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Overview".bold());
    let _ = writeln!(out, "  Scored rows:      {}", stats.count);
    let _ = writeln!(out, "  Distinct titles:  {}", stats.distinct_titles);
    let _ = writeln!(out, "  Genres:           {}", stats.distinct_genre_count);
    let _ = writeln!(out, "  Mean discrepancy: {}", fmt_optional(stats.mean_discrepancy, ""));
    let _ = writeln!(
        out,
        "  Extreme cases:    {} ({})",
        stats.extreme_count,
        fmt_optional(stats.extreme_pct, "%")
    );
    let _ = writeln!(
        out,
        "  Coverage:         {}/{} rows ({} missing score, {} out of range, {} malformed)",
        coverage.scored,
        coverage.total_rows,
        coverage.missing_score,
        coverage.invalid_range,
        coverage.malformed
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Type distribution".bold());
    let distribution = snapshot.type_distribution();
    for kind in DiscrepancyType::ALL {
        let _ = writeln!(out, "  {:<12} {}", paint(kind, kind.as_str()), distribution.count(kind));
    }

    render_genres(&mut out, "Top genres", &snapshot.ranked_genres(RankOrder::Descending, top, false));
    render_genres(&mut out, "Bottom genres", &snapshot.ranked_genres(RankOrder::Ascending, top, false));

    for kind in [DiscrepancyType::Overhyped, DiscrepancyType::HiddenGem] {
        render_extremes(&mut out, kind, &snapshot.extreme_cases(kind, top));
    }

    out
}

fn render_genres(out: &mut String, title: &str, genres: &[GenreAggregate]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title.bold());
    if genres.is_empty() {
        let _ = writeln!(out, "  {}", "no data".dimmed());
    }
    for genre in genres {
        let marker = if genre.low_support { " (low support)".dimmed().to_string() } else { String::new() };
        let _ = writeln!(
            out,
            "  {:<24} {:>8.2}  n={}{}",
            genre.genre_name, genre.discrepancy_score, genre.game_count, marker
        );
    }
}

fn render_extremes(out: &mut String, kind: DiscrepancyType, cases: &[ExtremeCase]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{} {}", "Extreme cases:".bold(), paint(kind, kind.as_str()));
    if cases.is_empty() {
        let _ = writeln!(out, "  {}", "no data".dimmed());
    }
    for case in cases {
        let _ = writeln!(
            out,
            "  {:>2}. {:<32} {:>8.2}  meta={} rating={} [{}]",
            case.rank,
            case.game_name,
            case.discrepancy_score,
            case.metacritic,
            case.rating,
            case.genres.join(", ")
        );
    }
}

fn paint(kind: DiscrepancyType, text: &str) -> ColoredString {
    match kind {
        DiscrepancyType::Overhyped => text.red(),
        DiscrepancyType::HiddenGem => text.green(),
        DiscrepancyType::Polarizing => text.yellow(),
        DiscrepancyType::Consensus => text.cyan(),
    }
}

fn fmt_optional(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}{}", v, suffix))
}
