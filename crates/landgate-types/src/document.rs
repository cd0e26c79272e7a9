//! Document analysis types shared between the vision collaborator and
//! the deterministic fallback extractor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coarse classification of a supporting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Indenture,
    DeedOfConveyance,
    LandCertificate,
    AllocationNote,
    Unknown,
}

/// Input handed to document analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    /// OCR text of the submitted document.
    pub document_text: String,
    pub image_ref: Option<String>,
    /// Upstream OCR confidence, when the scanner reported one.
    pub ocr_confidence: Option<f64>,
}

impl DocumentInput {
    pub fn from_text(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            image_ref: None,
            ocr_confidence: None,
        }
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_ocr_confidence(mut self, confidence: f64) -> Self {
        self.ocr_confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// Fields pulled out of a document, each explicitly optional.
///
/// Extraction never guesses: a field that no pattern matched stays
/// `None` and downstream checks treat the absence itself as a signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub grantor_name: Option<String>,
    pub parcel_id: Option<String>,
    pub document_date: Option<NaiveDate>,
    /// The date text as it appeared, kept for audit trails even when
    /// parsing failed.
    pub raw_date: Option<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.grantor_name.is_none()
            && self.parcel_id.is_none()
            && self.document_date.is_none()
            && self.raw_date.is_none()
    }
}

/// Result of analysing one supporting document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub document_type: DocumentType,
    pub fields: ExtractedFields,
    /// Analysis confidence in [0, 1].
    pub confidence: f64,
    pub is_authentic: bool,
    pub fraud_indicators: Vec<String>,
    pub reasoning: Vec<String>,
    /// True when produced by the deterministic pattern extractor rather
    /// than the vision collaborator.
    pub fallback: bool,
}

impl DocumentAnalysis {
    pub fn new(document_type: DocumentType, fields: ExtractedFields, confidence: f64) -> Self {
        Self {
            document_type,
            fields,
            confidence: confidence.clamp(0.0, 1.0),
            is_authentic: true,
            fraud_indicators: Vec::new(),
            reasoning: Vec::new(),
            fallback: false,
        }
    }

    pub fn with_fraud_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.fraud_indicators.push(indicator.into());
        self.is_authentic = false;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }
}
