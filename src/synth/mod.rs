use serde::Deserialize;
use tracing::debug;

use crate::core::types::{Classification, SourceReference, VerificationVerdict};

const MAX_FALLBACK_REASONING: usize = 500;
const MAX_SUMMARY: usize = 200;
const FALLBACK_LIMITATIONS: &str = "Análise automatizada pode conter imprecisões.";

/// What the model is asked to produce. Every field is optional on the
/// wire; synthesis supplies the defaults.
#[derive(Debug, Default, Deserialize)]
struct ModelVerdict {
    #[serde(default)]
    classification: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    analysis: String,
    #[serde(default)]
    fact_correction: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    limitations: String,
}

/// Turn a raw completion plus the routed sources into the response
/// contract. Never fails: unparseable output degrades to a
/// needs_verification verdict built from the raw text.
pub fn synthesize(raw: &str, sources: Vec<SourceReference>) -> VerificationVerdict {
    let model = parse_model_verdict(raw);

    let classification =
        Classification::parse(&model.classification).unwrap_or(Classification::NeedsVerification);
    let confidence = model.confidence.unwrap_or(0.5).clamp(0.0, 1.0);

    let headline = if model.headline.trim().is_empty() {
        match classification {
            Classification::Fake => "Possível Desinformação".to_string(),
            _ => "Verificação Inconclusiva".to_string(),
        }
    } else {
        model.headline.trim().to_string()
    };

    let reasoning = if model.analysis.trim().is_empty() {
        truncate_chars(raw.trim(), MAX_FALLBACK_REASONING)
    } else {
        model.analysis.trim().to_string()
    };

    let fact_summary = if model.fact_correction.trim().is_empty() {
        truncate_chars(&reasoning, MAX_SUMMARY)
    } else {
        model.fact_correction.trim().to_string()
    };

    let limitations = if model.limitations.trim().is_empty() {
        FALLBACK_LIMITATIONS.to_string()
    } else {
        model.limitations.trim().to_string()
    };

    let references: Vec<String> = sources.iter().map(|s| s.url.clone()).collect();

    VerificationVerdict {
        classification,
        is_true: classification == Classification::Verified,
        confidence,
        headline,
        reasoning,
        fact_summary,
        key_points: model.key_points,
        limitations,
        sources,
        references,
    }
}

/// Three-tier parse: strict JSON, then the first balanced JSON object
/// embedded in surrounding prose, then a keyword scan over the raw text.
fn parse_model_verdict(raw: &str) -> ModelVerdict {
    if let Ok(v) = serde_json::from_str::<ModelVerdict>(raw.trim()) {
        return v;
    }
    if let Some(candidate) = extract_json_object(raw) {
        if let Ok(v) = serde_json::from_str::<ModelVerdict>(&candidate) {
            debug!("model verdict recovered from embedded json");
            return v;
        }
    }
    debug!("model verdict fell back to keyword scan");
    keyword_fallback(raw)
}

/// Scan for the first balanced `{...}` span, tracking string literals so
/// braces inside quoted values do not confuse the depth counter.
fn extract_json_object(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..=i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn keyword_fallback(raw: &str) -> ModelVerdict {
    let lower = raw.to_lowercase();
    let classification = if lower.contains("falso")
        || lower.contains("fake")
        || lower.contains("desinforma")
    {
        "fake"
    } else if lower.contains("verdadeiro") || lower.contains("confirmado") {
        "verified"
    } else {
        "needs_verification"
    };

    ModelVerdict {
        classification: classification.to_string(),
        confidence: Some(0.5),
        analysis: truncate_chars(raw.trim(), MAX_FALLBACK_REASONING),
        limitations: FALLBACK_LIMITATIONS.to_string(),
        ..ModelVerdict::default()
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
