//! Turns the reasoning service's free-form reply into a trusted
//! [`AnalysisResult`].
//!
//! Every field of the reply is advisory. Criterion scores are range-checked,
//! criteria that do not apply to the question's category are dropped, and
//! `total_score` plus `classification` are recomputed from what remains.

use crate::error::{Error, Result};
use crate::models::analysis::{
    AnalysisResult, AnalysisScores, Classification, Criterion, CriterionScore, Feedback,
};
use crate::models::question::Category;
use crate::services::rubric;
use crate::services::scoring;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    scores: ReplyScores,
    #[serde(default)]
    classification: Option<String>,
    #[serde(default)]
    feedback: ReplyFeedback,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyScores {
    #[serde(default)]
    migration_intent: Option<i64>,
    #[serde(default)]
    financial_understanding: Option<i64>,
    #[serde(default)]
    academic_credibility: Option<i64>,
    #[serde(default)]
    specificity_research: Option<i64>,
    #[serde(default)]
    consistency: Option<i64>,
    #[serde(default)]
    communication_quality: Option<i64>,
    #[serde(default)]
    red_flags: Option<i64>,
    #[serde(default)]
    total_score: Option<i64>,
}

impl ReplyScores {
    fn get(&self, criterion: Criterion) -> Option<i64> {
        match criterion {
            Criterion::MigrationIntent => self.migration_intent,
            Criterion::FinancialUnderstanding => self.financial_understanding,
            Criterion::AcademicCredibility => self.academic_credibility,
            Criterion::SpecificityResearch => self.specificity_research,
            Criterion::Consistency => self.consistency,
            Criterion::CommunicationQuality => self.communication_quality,
            Criterion::RedFlags => self.red_flags,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReplyFeedback {
    #[serde(default)]
    overall: Option<String>,
    #[serde(default)]
    by_criterion: BTreeMap<String, Option<String>>,
    #[serde(default)]
    improvements: Vec<String>,
}

/// A change made to the reply while reconciling it with the rubric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    IrrelevantCriterion {
        criterion: Criterion,
        category: Category,
    },
    TotalScore {
        stated: i64,
        actual: u32,
    },
    Classification {
        stated: Option<String>,
        expected: Classification,
    },
}

#[derive(Debug, Clone)]
pub struct ValidatedAnalysis {
    pub analysis: AnalysisResult,
    pub corrections: Vec<Correction>,
}

/// Removes surrounding whitespace and Markdown code fences.
pub fn strip_wrapping(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Returns the first balanced `{ ... }` object in `text`.
///
/// Braces inside JSON string literals are ignored, so feedback text such as
/// `"use {placeholders}"` does not end the object early.
pub fn extract_json_object(text: &str) -> Result<&str> {
    let start = text
        .find('{')
        .ok_or_else(|| Error::decode("no JSON object found in reply", text))?;

    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(Error::decode("unmatched braces in reply", text))
}

fn parse_classification(label: &str) -> Option<Classification> {
    match label.trim().to_ascii_lowercase().as_str() {
        "excellent" => Some(Classification::Excellent),
        "good" => Some(Classification::Good),
        "average" => Some(Classification::Average),
        "weak" => Some(Classification::Weak),
        _ => None,
    }
}

/// Full pipeline: strip, extract, decode, then reconcile against the rubric.
pub fn validate_reply(raw: &str, category: Option<Category>) -> Result<ValidatedAnalysis> {
    let decoded = extract_json_object(strip_wrapping(raw))
        .map_err(|e| match e {
            Error::Decode { reason, .. } => Error::decode(reason, raw),
            other => other,
        })
        .and_then(|object| {
            serde_json::from_str::<ReplyEnvelope>(object)
                .map_err(|e| Error::decode(format!("failed to parse analysis: {}", e), raw))
        })
        .and_then(|envelope| reconcile(envelope, category, raw));

    if let Err(Error::Decode { reason, .. }) = &decoded {
        tracing::error!(reason = %reason, raw = %raw, "Reasoning service reply rejected");
    }
    decoded
}

fn reconcile(
    envelope: ReplyEnvelope,
    category: Option<Category>,
    raw: &str,
) -> Result<ValidatedAnalysis> {
    let mut corrections = Vec::new();
    let mut scores = AnalysisScores::default();

    for criterion in Criterion::ALL {
        let Some(value) = envelope.scores.get(criterion) else {
            continue;
        };
        let score = CriterionScore::new(value)
            .map_err(|e| Error::decode(format!("{}: {}", criterion, e), raw))?;

        if let Some(category) = category {
            if !rubric::is_relevant(category, criterion) {
                tracing::warn!(
                    criterion = %criterion,
                    category = %category,
                    score = value,
                    "Dropping score for criterion not evaluated in this category"
                );
                corrections.push(Correction::IrrelevantCriterion {
                    criterion,
                    category,
                });
                continue;
            }
        }
        scores.set(criterion, Some(score));
    }

    let total = scores.present_sum();
    if let Some(stated) = envelope.scores.total_score {
        if stated != total as i64 {
            tracing::debug!(stated, actual = total, "Replacing stated total_score");
            corrections.push(Correction::TotalScore {
                stated,
                actual: total,
            });
        }
    }

    let criteria_count = scores.criteria_count();
    let expected = scoring::classify(total, criteria_count);
    let stated = envelope.classification.as_deref().and_then(parse_classification);
    if stated != Some(expected) {
        tracing::warn!(
            stated = ?envelope.classification,
            expected = %expected,
            total_score = total,
            max_score = criteria_count * CriterionScore::MAX as usize,
            criteria_count,
            "Classification mismatch, correcting"
        );
        corrections.push(Correction::Classification {
            stated: envelope.classification.clone(),
            expected,
        });
    }

    let by_criterion = envelope
        .feedback
        .by_criterion
        .into_iter()
        .filter_map(|(key, text)| {
            let criterion = Criterion::from_key(key.trim())?;
            let text = text?.trim().to_string();
            if text.is_empty() || scores.get(criterion).is_none() {
                return None;
            }
            Some((criterion, text))
        })
        .collect();

    let feedback = Feedback {
        overall: envelope.feedback.overall.unwrap_or_default().trim().to_string(),
        by_criterion,
        improvements: envelope
            .feedback
            .improvements
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    };

    Ok(ValidatedAnalysis {
        analysis: AnalysisResult::new(scores, feedback),
        corrections,
    })
}
