//! Tampering indicators in the submitted document text.
//!
//! OCR of a doctored scan tends to betray the editing: software
//! watermarks, zero-width characters from copy-paste, homoglyph
//! substitution, and duplicated paragraph blocks. Each indicator adds
//! to a detection score; the signal reports detection confidence
//! (1.0 = certainly tampered), inverted by the aggregator.

use crate::agent::{ClaimSnapshot, SignalAgent};
use crate::error::AgentResult;
use async_trait::async_trait;
use landgate_types::{SignalKind, SignalResult, SignalVerdict};
use std::collections::HashMap;
use std::time::Instant;

/// Editing-software traces that have no business in a deed scan.
const EDITOR_MARKERS: &[&str] = &["adobe photoshop", "photoshop", "gimp", "canva", "screenshot"];

const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

const FLAG_THRESHOLD: f64 = 0.7;
const REVIEW_THRESHOLD: f64 = 0.4;

/// Signal agent scanning for document doctoring artifacts.
#[derive(Default)]
pub struct TamperingAgent;

impl TamperingAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignalAgent for TamperingAgent {
    fn kind(&self) -> SignalKind {
        SignalKind::TamperingCheck
    }

    async fn evaluate(&self, snapshot: &ClaimSnapshot) -> AgentResult<SignalResult> {
        let started = Instant::now();
        let text = &snapshot.document.document_text;
        let lower = text.to_lowercase();

        let mut score: f64 = 0.0;
        let mut reasons = Vec::new();

        if let Some(marker) = EDITOR_MARKERS.iter().find(|marker| lower.contains(*marker)) {
            score += 0.5;
            reasons.push(format!("editing software trace '{marker}' in document text"));
        }

        if text.chars().any(|c| ZERO_WIDTH.contains(&c)) {
            score += 0.4;
            reasons.push("zero-width characters embedded in text".to_string());
        }

        if has_cyrillic_homoglyphs(text) {
            score += 0.45;
            reasons.push("cyrillic homoglyphs mixed into latin text".to_string());
        }

        if let Some(line) = most_repeated_long_line(text) {
            score += 0.25;
            reasons.push(format!("paragraph block repeated verbatim: \"{line}\""));
        }

        let score = score.clamp(0.0, 1.0);
        let verdict = if score >= FLAG_THRESHOLD {
            SignalVerdict::Flagged
        } else if score >= REVIEW_THRESHOLD {
            SignalVerdict::NeedsReview
        } else {
            SignalVerdict::Clear
        };
        if reasons.is_empty() {
            reasons.push("no tampering indicators found".to_string());
        }

        Ok(SignalResult::new(SignalKind::TamperingCheck, score, verdict)
            .with_reasons(reasons)
            .with_duration(started.elapsed().as_millis() as u64))
    }
}

/// A document mostly in latin script with cyrillic characters mixed in
/// points at lookalike substitution.
fn has_cyrillic_homoglyphs(text: &str) -> bool {
    let cyrillic = text
        .chars()
        .filter(|c| ('\u{0400}'..='\u{04FF}').contains(c))
        .count();
    let latin = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    cyrillic > 0 && latin > cyrillic * 4
}

fn most_repeated_long_line(text: &str) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in text.lines().map(str::trim).filter(|line| line.len() >= 40) {
        *counts.entry(line).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count >= 3)
        .max_by_key(|(_, count)| *count)
        .map(|(line, _)| line.to_string())
}
