//! Fuzzy identity matching against the grantor registry.

use landgate_storage::GrantorRecord;
use landgate_types::{ExtractedFields, FraudConfig};
use strsim::jaro_winkler;

/// How strongly an extracted identity matched a registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    Exact,
    Partial,
    NoMatch,
}

/// Outcome of one identity comparison.
#[derive(Debug, Clone)]
pub struct IdentityMatch {
    pub quality: MatchQuality,
    /// Name similarity in [0, 1]; 1.0 for a parcel-id short circuit.
    pub similarity: f64,
    pub matched_name: Option<String>,
    pub reason: String,
}

/// Matches extracted grantor identity against on-file records.
///
/// An exact parcel-id hit short-circuits; otherwise the best
/// Jaro-Winkler name similarity decides, with thresholds from
/// `FraudConfig`.
pub struct IdentityMatcher {
    partial_threshold: f64,
    exact_threshold: f64,
}

impl IdentityMatcher {
    pub fn new(config: &FraudConfig) -> Self {
        Self {
            partial_threshold: config.partial_match_threshold,
            exact_threshold: config.exact_match_threshold,
        }
    }

    pub fn match_identity(
        &self,
        fields: &ExtractedFields,
        records: &[GrantorRecord],
    ) -> IdentityMatch {
        if let Some(parcel) = &fields.parcel_id {
            if let Some(record) = records
                .iter()
                .find(|record| record.parcel_id.trim().eq_ignore_ascii_case(parcel.trim()))
            {
                return IdentityMatch {
                    quality: MatchQuality::Exact,
                    similarity: 1.0,
                    matched_name: Some(record.full_name.clone()),
                    reason: format!(
                        "parcel id {} matches the registry record for {}",
                        parcel, record.full_name
                    ),
                };
            }
        }

        let Some(name) = fields.grantor_name.as_deref() else {
            return IdentityMatch {
                quality: MatchQuality::NoMatch,
                similarity: 0.0,
                matched_name: None,
                reason: "no grantor name extracted from the document".to_string(),
            };
        };

        let needle = normalise(name);
        let best = records
            .iter()
            .map(|record| (jaro_winkler(&needle, &normalise(&record.full_name)), record))
            .max_by(|a, b| a.0.total_cmp(&b.0));

        match best {
            None => IdentityMatch {
                quality: MatchQuality::NoMatch,
                similarity: 0.0,
                matched_name: None,
                reason: "registry has no grantor records to compare against".to_string(),
            },
            Some((similarity, record)) if similarity > self.exact_threshold => IdentityMatch {
                quality: MatchQuality::Exact,
                similarity,
                matched_name: Some(record.full_name.clone()),
                reason: format!(
                    "grantor name matches {} ({:.0}% similarity)",
                    record.full_name,
                    similarity * 100.0
                ),
            },
            Some((similarity, record)) if similarity > self.partial_threshold => IdentityMatch {
                quality: MatchQuality::Partial,
                similarity,
                matched_name: Some(record.full_name.clone()),
                reason: format!(
                    "partial match against {} at {:.0}% similarity",
                    record.full_name,
                    similarity * 100.0
                ),
            },
            Some((similarity, record)) => IdentityMatch {
                quality: MatchQuality::NoMatch,
                similarity,
                matched_name: None,
                reason: format!(
                    "no registry record resembles '{}' (closest: {} at {:.0}%)",
                    name,
                    record.full_name,
                    similarity * 100.0
                ),
            },
        }
    }
}

fn normalise(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
