use crate::error::{Error, Result};
use crate::models::analysis::{AnalysisResult, Criterion, CriterionScore};
use crate::models::session::{Grade, SessionSummary};
use chrono::Utc;
use uuid::Uuid;

const STRENGTH_MIN: u8 = 4;
const WEAKNESS_MAX: u8 = 3;
const RED_FLAG_MAX: u8 = 2;

fn area_label(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::MigrationIntent => "Strong return intent",
        Criterion::FinancialUnderstanding => "Financial understanding",
        Criterion::AcademicCredibility => "Academic credibility",
        Criterion::SpecificityResearch => "Specificity & research",
        Criterion::Consistency => "Consistency",
        Criterion::CommunicationQuality => "Communication quality",
        Criterion::RedFlags => "No red flags",
    }
}

fn red_flag_label(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::MigrationIntent => "Shows potential immigration intent",
        Criterion::FinancialUnderstanding => "Poor financial understanding or planning",
        Criterion::AcademicCredibility => "Weak academic fit or credibility",
        Criterion::SpecificityResearch => "Lacks specific knowledge or research",
        Criterion::Consistency => "Inconsistent answers or contradictions",
        Criterion::CommunicationQuality => "Poor communication or clarity",
        Criterion::RedFlags => "Major red flags detected",
    }
}

/// Letter grade for a mean total against the mean attainable maximum.
pub fn grade(average_score: f64, average_criteria: f64) -> Grade {
    if average_criteria <= 0.0 {
        return Grade::D;
    }
    let pct = average_score / (average_criteria * CriterionScore::MAX as f64) * 100.0;
    if pct >= 85.0 {
        Grade::A
    } else if pct >= 70.0 {
        Grade::B
    } else if pct >= 50.0 {
        Grade::C
    } else {
        Grade::D
    }
}

pub fn recommendation(average_score: f64) -> &'static str {
    if average_score >= 32.0 {
        "Excellent performance! You're well-prepared. Focus on maintaining confidence and natural delivery during the actual interview."
    } else if average_score >= 25.0 {
        "Good foundation. Review the specific feedback for each answer and practice the improved versions. Focus on being more specific and confident in your responses."
    } else if average_score >= 18.0 {
        "You need more practice. Focus on providing specific examples, showing strong ties to your home country, and demonstrating clear post-graduation plans."
    } else {
        "Significant improvement needed. Consider working with an advisor to strengthen your answers. Focus on clarity, specificity, and addressing visa officer concerns about immigrant intent."
    }
}

/// Criteria meeting `hit` in at least half of the analyses, in rubric order.
fn recurring<F>(analyses: &[&AnalysisResult], hit: F) -> Vec<String>
where
    F: Fn(u8) -> bool,
{
    Criterion::ALL
        .into_iter()
        .filter(|criterion| {
            let hits = analyses
                .iter()
                .filter(|a| a.scores.get(*criterion).is_some_and(|s| hit(s.value())))
                .count();
            hits > 0 && hits * 2 >= analyses.len()
        })
        .map(|c| area_label(c).to_string())
        .collect()
}

fn red_flags(analyses: &[&AnalysisResult]) -> Vec<String> {
    Criterion::ALL
        .into_iter()
        .filter(|criterion| {
            analyses.iter().any(|a| {
                a.scores
                    .get(*criterion)
                    .is_some_and(|s| s.value() <= RED_FLAG_MAX)
            })
        })
        .map(|c| red_flag_label(c).to_string())
        .collect()
}

/// Aggregates every per-answer analysis of a finished session.
pub fn summarize<'a, I>(session_id: Uuid, analyses: I) -> Result<SessionSummary>
where
    I: IntoIterator<Item = &'a AnalysisResult>,
{
    let analyses: Vec<&AnalysisResult> = analyses.into_iter().collect();
    if analyses.is_empty() {
        return Err(Error::EmptySummary);
    }

    let count = analyses.len() as f64;
    let total: u32 = analyses.iter().map(|a| a.scores.present_sum()).sum();
    let criteria: usize = analyses.iter().map(|a| a.criteria_count()).sum();
    let average_score = total as f64 / count;
    let average_criteria = criteria as f64 / count;

    Ok(SessionSummary {
        session_id,
        total_questions: analyses.len(),
        average_score,
        overall_grade: grade(average_score, average_criteria),
        strong_areas: recurring(&analyses, |s| s >= STRENGTH_MIN),
        weak_areas: recurring(&analyses, |s| s <= WEAKNESS_MAX),
        common_red_flags: red_flags(&analyses),
        recommendation: recommendation(average_score).to_string(),
        completed_at: Utc::now(),
    })
}
