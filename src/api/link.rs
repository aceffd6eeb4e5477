use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::{client_key, AppState};
use crate::extract::url::extract_url_signals;
use crate::history;
use crate::inference::prompts;
use crate::scoring::link::score_url;

// Verdicts in this band are uncertain enough that a model opinion adds
// value; confirmed scams and clean links skip the extra call.
const AI_SCORE_FLOOR: u8 = 0;
const AI_SCORE_CEILING: u8 = 80;

#[derive(Debug, Deserialize)]
pub struct AnalyzeLinkRequest {
    pub url: String,
}

pub async fn analyze_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<AnalyzeLinkRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = client_key(&req);
    if !state.link_limiter.admit(&caller) {
        warn!(%caller, "link analysis rate limited");
        return Err(ApiError::RateLimited);
    }

    let signals = extract_url_signals(&payload.url)?;
    let mut verdict = score_url(&signals);
    info!(
        domain = %verdict.domain,
        score = verdict.score,
        status = verdict.status.as_str(),
        "link analyzed"
    );

    // Model augmentation is advisory. Any failure here is logged and the
    // heuristic verdict goes out unchanged.
    if verdict.score > AI_SCORE_FLOOR && verdict.score < AI_SCORE_CEILING {
        if let Some(client) = &state.inference {
            match client
                .infer(
                    prompts::link_system_prompt(),
                    &prompts::link_user_prompt(&signals.full_url, &verdict.issues),
                    Some(0.3),
                    Some(300),
                )
                .await
            {
                Ok(analysis) => verdict.ai_analysis = Some(analysis.trim().to_string()),
                Err(err) => warn!(error = %err, "link ai augmentation skipped"),
            }
        }
    }

    if let Some(store) = &state.history {
        history::record_async(
            store.clone(),
            "link",
            payload.url.clone(),
            verdict.status.as_str().to_string(),
            f64::from(verdict.score) / 100.0,
            verdict.scam_type.clone().unwrap_or_default(),
            Vec::new(),
        );
    }

    Ok(HttpResponse::Ok().json(verdict))
}
