//! Deterministic pattern-based field extraction.
//!
//! Serves two callers: the fraud heuristics always extract through
//! here, and the document agent falls back to it when the vision
//! collaborator is unavailable. Candidate patterns per field are tried
//! in order and the first capture wins; a field no pattern matches
//! stays `None` rather than being guessed.

use chrono::NaiveDate;
use landgate_types::{DocumentAnalysis, DocumentInput, DocumentType, ExtractedFields};
use regex::Regex;

/// Accepted date layouts, tried in order after normalisation.
///
/// Two-digit-year forms come before their four-digit twins so that
/// "14/03/98" resolves to 1998 instead of year 98.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%d %B %Y",
    "%d %B, %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

/// Tokens that end a captured name span. Deed prose runs names straight
/// into connectives ("Kofi Mensah AND ..."), which the capture pattern
/// cannot distinguish from a fourth name word.
const NAME_STOPWORDS: &[&str] = &["AND", "OF", "THE", "TO", "HEREINAFTER", "ALIAS"];

pub struct FieldExtractor {
    grantor_patterns: Vec<Regex>,
    parcel_patterns: Vec<Regex>,
    date_patterns: Vec<Regex>,
    ordinal_suffix: Regex,
    day_of: Regex,
}

impl FieldExtractor {
    pub fn new() -> Self {
        // Name words carry no dot so a capture cannot run across a
        // sentence boundary ("Kofi Mensah. Parcel No" stops at Mensah).
        let name = r"([A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*){0,3})";
        let month = r"(?i:january|february|march|april|may|june|july|august|september|october|november|december)";
        Self {
            grantor_patterns: vec![
                Regex::new(&format!(r"(?i:grantor)\s*[:\-]?\s*{name}")).unwrap(),
                Regex::new(&format!(r"(?i:transferor|vendor|seller)\s*[:\-]?\s*{name}")).unwrap(),
                Regex::new(&format!(r"(?i:between)\s+{name}")).unwrap(),
            ],
            parcel_patterns: vec![
                Regex::new(
                    r"(?i:parcel|plot)\s*(?i:no|number|id)?\.?\s*[:\-]?\s*([A-Z]{1,4}[-/][A-Z0-9][-/A-Z0-9]*)",
                )
                .unwrap(),
                Regex::new(
                    r"(?i:title|registration)\s*(?i:no|number)?\.?\s*[:\-]?\s*([A-Z0-9][-/A-Z0-9]{3,})",
                )
                .unwrap(),
                Regex::new(r"\b([A-Z]{2,3}[-/]\d{3,5}[-/]\d{2,4})\b").unwrap(),
            ],
            date_patterns: vec![
                Regex::new(
                    r"(?i:dated?|made)(?:\s+this)?\s*[:\-]?\s*(\d{1,2}(?:st|nd|rd|th)?(?:\s+day\s+of)?\s+[A-Za-z]+,?\s+\d{4})",
                )
                .unwrap(),
                Regex::new(r"(?i:dated?)\s*[:\-]?\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").unwrap(),
                Regex::new(&format!(
                    r"\b(\d{{1,2}}(?:st|nd|rd|th)?\s+{month}\s+\d{{4}})\b"
                ))
                .unwrap(),
                Regex::new(&format!(r"\b({month}\s+\d{{1,2}},?\s+\d{{4}})\b")).unwrap(),
                Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap(),
            ],
            ordinal_suffix: Regex::new(r"(?i)(\d{1,2})(?:st|nd|rd|th)\b").unwrap(),
            day_of: Regex::new(r"(?i)day\s+of\s+").unwrap(),
        }
    }

    /// Pull the structured fields out of OCR text.
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let grantor_name =
            first_capture(&self.grantor_patterns, text).and_then(|raw| clean_name(&raw));
        let parcel_id = first_capture(&self.parcel_patterns, text);
        let raw_date = first_capture(&self.date_patterns, text);
        let document_date = raw_date.as_deref().and_then(|raw| self.parse_date(raw));
        ExtractedFields {
            grantor_name,
            parcel_id,
            document_date,
            raw_date,
        }
    }

    /// Parse a captured date string, tolerating ordinal suffixes and
    /// the "Nth day of Month, Year" deed convention.
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let no_ordinal = self.ordinal_suffix.replace_all(raw, "$1");
        let no_day_of = self.day_of.replace_all(&no_ordinal, "");
        let cleaned = no_day_of.split_whitespace().collect::<Vec<_>>().join(" ");
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
    }

    /// Build a full document analysis from patterns alone.
    ///
    /// Same shape the vision collaborator returns, at deliberately
    /// lower confidence and with `fallback` set.
    pub fn fallback_analysis(&self, input: &DocumentInput) -> DocumentAnalysis {
        let fields = self.extract(&input.document_text);
        let document_type = detect_document_type(&input.document_text);

        let mut confidence: f64 = 0.35;
        let mut reasons =
            vec!["deterministic pattern extraction used in place of vision analysis".to_string()];
        if let Some(name) = &fields.grantor_name {
            confidence += 0.10;
            reasons.push(format!("grantor name extracted: {name}"));
        }
        if let Some(parcel) = &fields.parcel_id {
            confidence += 0.10;
            reasons.push(format!("parcel id extracted: {parcel}"));
        }
        if fields.document_date.is_some() {
            confidence += 0.05;
            reasons.push("document date extracted".to_string());
        }
        if document_type != DocumentType::Unknown {
            confidence += 0.10;
        }

        let mut analysis = DocumentAnalysis::new(document_type, fields, confidence).as_fallback();
        analysis.reasoning = reasons;
        analysis
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify the document from characteristic phrases.
pub fn detect_document_type(text: &str) -> DocumentType {
    let lower = text.to_lowercase();
    if lower.contains("indenture") {
        DocumentType::Indenture
    } else if lower.contains("conveyance") {
        DocumentType::DeedOfConveyance
    } else if lower.contains("land certificate") || lower.contains("certificate of title") {
        DocumentType::LandCertificate
    } else if lower.contains("allocation") {
        DocumentType::AllocationNote
    } else {
        DocumentType::Unknown
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

fn clean_name(raw: &str) -> Option<String> {
    let kept: Vec<&str> = raw
        .split_whitespace()
        .take_while(|word| {
            let upper = word.to_uppercase();
            !NAME_STOPWORDS.contains(&upper.trim_end_matches(['.', ',']))
        })
        .collect();
    if kept.is_empty() {
        return None;
    }
    let name = kept.join(" ");
    let name = name.trim_end_matches(['.', ',']).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
