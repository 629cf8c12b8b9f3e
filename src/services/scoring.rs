use crate::models::analysis::{Classification, CriterionScore};

/// Tier for `total_score` given how many criteria were scored.
///
/// Three to five criteria use fixed cutoffs; any other count falls back to
/// proportional thresholds of the maximum (85% / 70% / 50%).
pub fn classify(total_score: u32, criteria_count: usize) -> Classification {
    if criteria_count == 0 {
        return Classification::Weak;
    }

    let cutoffs = match criteria_count {
        3 => Some((13, 10, 7)),
        4 => Some((17, 13, 9)),
        5 => Some((21, 17, 12)),
        _ => None,
    };

    match cutoffs {
        Some((excellent, good, average)) => {
            if total_score >= excellent {
                Classification::Excellent
            } else if total_score >= good {
                Classification::Good
            } else if total_score >= average {
                Classification::Average
            } else {
                Classification::Weak
            }
        }
        None => {
            let max = (criteria_count * CriterionScore::MAX as usize) as f64;
            let pct = total_score as f64 / max * 100.0;
            if pct >= 85.0 {
                Classification::Excellent
            } else if pct >= 70.0 {
                Classification::Good
            } else if pct >= 50.0 {
                Classification::Average
            } else {
                Classification::Weak
            }
        }
    }
}

/// Maps a total onto 0..=100, where `n * 1` is 0 and `n * 5` is 100.
pub fn score_to_percentage(total_score: u32, criteria_count: usize) -> f64 {
    if criteria_count == 0 {
        return 0.0;
    }
    let min = (criteria_count * CriterionScore::MIN as usize) as f64;
    let max = (criteria_count * CriterionScore::MAX as usize) as f64;
    let score = (total_score as f64).clamp(min, max);
    (score - min) / (max - min) * 100.0
}
