//! Fraud and forgery heuristics.
//!
//! Three checks run as a checklist over the extracted fields: identity
//! match against the grantor registry, document date plausibility, and
//! textual formatting. Each failed check multiplies a running document
//! confidence (starting at 1.0) by its configured penalty; the reported
//! signal is `fraudConfidence = 1 - final`, so 1.0 means certain fraud.

use crate::agent::{ClaimSnapshot, SignalAgent};
use crate::error::AgentResult;
use crate::extract::FieldExtractor;
use crate::identity::{IdentityMatcher, MatchQuality};
use async_trait::async_trait;
use chrono::Utc;
use landgate_storage::GrantorDirectory;
use landgate_types::{FraudConfig, SignalKind, SignalResult, SignalVerdict};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub struct FraudAgent {
    directory: Arc<dyn GrantorDirectory>,
    extractor: FieldExtractor,
    matcher: IdentityMatcher,
    config: FraudConfig,
}

impl FraudAgent {
    pub fn new(directory: Arc<dyn GrantorDirectory>, config: FraudConfig) -> Self {
        let matcher = IdentityMatcher::new(&config);
        Self {
            directory,
            extractor: FieldExtractor::new(),
            matcher,
            config,
        }
    }
}

#[async_trait]
impl SignalAgent for FraudAgent {
    fn kind(&self) -> SignalKind {
        SignalKind::FraudHeuristics
    }

    async fn evaluate(&self, snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
        let started = Instant::now();
        let text = &snapshot.document.document_text;
        let fields = self.extractor.extract(text);
        let records = self.directory.list_grantor_records().await?;

        let mut confidence: f64 = 1.0;
        let mut reasons = Vec::new();

        if let Some(ocr) = snapshot.document.ocr_confidence {
            if ocr < self.config.min_ocr_confidence {
                confidence *= self.config.low_ocr_penalty;
                reasons.push(format!("low ocr confidence {ocr:.2}"));
            }
        }

        let identity = self.matcher.match_identity(&fields, &records);
        reasons.push(identity.reason.clone());
        if identity.quality == MatchQuality::NoMatch {
            confidence *= self.config.name_mismatch_penalty;
            if fields.grantor_name.is_some() {
                // An extracted name that matches nothing on file is
                // stronger evidence than a name we never found.
                confidence *= self.config.no_match_penalty;
            }
        }

        let today = Utc::now().date_naive();
        let document_age = fields.document_date.and_then(|date| today.years_since(date));
        match fields.document_date {
            Some(date) => match document_age {
                None => {
                    confidence *= self.config.date_anomaly_penalty;
                    reasons.push(format!("future date - high risk: document dated {date}"));
                }
                Some(age) if age > self.config.max_document_age_years => {
                    confidence *= self.config.date_anomaly_penalty;
                    reasons.push(format!(
                        "document dated {} years ago, beyond the {}-year plausible lease span",
                        age, self.config.max_document_age_years
                    ));
                }
                Some(age) => {
                    reasons.push(format!("document age {age} years is plausible"));
                }
            },
            None => {
                if let Some(raw) = &fields.raw_date {
                    reasons.push(format!("date text '{raw}' could not be parsed"));
                }
            }
        }

        let flags = formatting_flags(text, document_age, &self.config);
        if !flags.is_empty() {
            confidence *= self.config.formatting_penalty;
            reasons.extend(flags);
        }

        let confidence = confidence.clamp(0.0, 1.0);
        let fraud_confidence = 1.0 - confidence;
        let verdict = if confidence >= self.config.clear_threshold {
            SignalVerdict::Clear
        } else if confidence >= self.config.review_threshold {
            SignalVerdict::NeedsReview
        } else {
            SignalVerdict::Flagged
        };

        debug!(
            claim_id = %snapshot.claim_id,
            fraud_confidence,
            ?verdict,
            "fraud heuristics complete"
        );

        Ok(
            SignalResult::new(SignalKind::FraudHeuristics, fraud_confidence, verdict)
                .with_reasons(reasons)
                .with_duration(started.elapsed().as_millis() as u64),
        )
    }
}

/// Textual patterns that mark a document as synthetic or doctored.
/// Every triggered flag is returned; the caller applies one penalty.
fn formatting_flags(text: &str, document_age: Option<u32>, config: &FraudConfig) -> Vec<String> {
    let mut flags = Vec::new();
    let lower = text.to_lowercase();

    let lengths: Vec<usize> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| line.len() >= 30)
        .map(str::len)
        .collect();
    if lengths.len() >= 4 {
        if let (Some(min), Some(max)) = (lengths.iter().min(), lengths.iter().max()) {
            if max - min <= 2 {
                flags.push("near-uniform line lengths suggest synthetic text".to_string());
            }
        }
    }

    let indents: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .collect();
    if indents.len() >= 4 {
        let first = indents[0];
        if !first.is_empty() && indents.iter().all(|indent| *indent == first) {
            flags.push("perfectly uniform indentation across all lines".to_string());
        }
    }

    if let Some(age) = document_age {
        if age > config.modern_term_age_years {
            for term in &config.modern_terms {
                if lower.contains(term.as_str()) {
                    flags.push(format!(
                        "modern term '{term}' on a document dated {age} years ago"
                    ));
                }
            }
        }
    }

    if text.contains('\u{FFFD}') {
        flags.push("encoding replacement characters present".to_string());
    }

    for term in &config.suspicious_terms {
        if lower.contains(term.as_str()) {
            flags.push(format!("suspicious term '{term}' found in document"));
        }
    }

    flags
}
