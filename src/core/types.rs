use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Safe,
    Warning,
    Danger,
    Scam,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Safe => "safe",
            LinkStatus::Warning => "warning",
            LinkStatus::Danger => "danger",
            LinkStatus::Scam => "scam",
        }
    }
}

/// Final verdict for one analyzed URL. Field names follow the wire
/// contract consumed by the web client (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkVerdict {
    pub status: LinkStatus,
    pub score: u8,
    pub domain: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scam_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modus_operandi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    pub is_brand_squatting: bool,
    pub is_url_shortener: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targeted_brand: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Verified,
    Fake,
    NeedsVerification,
}

impl Classification {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "verified" => Some(Classification::Verified),
            "fake" => Some(Classification::Fake),
            "needs_verification" => Some(Classification::NeedsVerification),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Verified => "verified",
            Classification::Fake => "fake",
            Classification::NeedsVerification => "needs_verification",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Government,
    Factchecker,
    Media,
    Academic,
}

/// A curated reference the caller can consult to double-check a claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceReference {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub name: String,
    pub description: String,
    pub url: String,
    pub relevance: String,
}

/// Final verdict for one verified claim.
///
/// Invariant: `references` mirrors `sources` URL-for-URL; the model never
/// contributes citations of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationVerdict {
    pub classification: Classification,
    pub is_true: bool,
    pub confidence: f64,
    pub headline: String,
    pub reasoning: String,
    pub fact_summary: String,
    pub key_points: Vec<String>,
    pub limitations: String,
    pub sources: Vec<SourceReference>,
    pub references: Vec<String>,
}
