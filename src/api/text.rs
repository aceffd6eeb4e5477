use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::{client_key, AppState};
use crate::extract::text::{extract_keywords, validate_claim};
use crate::history;
use crate::inference::prompts;
use crate::sources::route_sources;
use crate::synth::synthesize;

#[derive(Debug, Deserialize)]
pub struct VerifyTextRequest {
    pub text: String,
}

pub async fn verify_text(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<VerifyTextRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = client_key(&req);
    if !state.text_limiter.admit(&caller) {
        warn!(%caller, "text verification rate limited");
        return Err(ApiError::RateLimited);
    }

    let claim = validate_claim(&payload.text)?;

    // Unlike link analysis, the model is the verdict here, not an
    // augmentation. Without a configured client there is nothing to serve.
    let Some(client) = &state.inference else {
        warn!("text verification requested without inference client");
        return Err(ApiError::Unavailable);
    };

    let keywords = extract_keywords(&claim);
    let sources = route_sources(&keywords);
    info!(keywords = keywords.len(), sources = sources.len(), "claim routed");

    let raw = client
        .infer(
            &prompts::verification_system_prompt(&sources),
            &prompts::verification_user_prompt(&claim, &keywords),
            Some(0.2),
            None,
        )
        .await?;

    let verdict = synthesize(&raw, sources);
    info!(
        classification = verdict.classification.as_str(),
        confidence = verdict.confidence,
        "claim verified"
    );

    if let Some(store) = &state.history {
        history::record_async(
            store.clone(),
            "text",
            claim,
            verdict.classification.as_str().to_string(),
            verdict.confidence,
            verdict.fact_summary.clone(),
            verdict.references.clone(),
        );
    }

    Ok(HttpResponse::Ok().json(verdict))
}
