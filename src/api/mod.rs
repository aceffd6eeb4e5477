pub mod error;
pub mod link;
pub mod text;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::AppConfig;
use crate::core::rate_limiter::SlidingWindowLimiter;
use crate::history::HistoryStore;
use crate::inference::InferenceClient;

/// Shared per-worker state. Limiters are separate per endpoint so a
/// burst of link checks cannot starve text verification.
pub struct AppState {
    pub config: AppConfig,
    pub link_limiter: SlidingWindowLimiter,
    pub text_limiter: SlidingWindowLimiter,
    pub inference: Option<InferenceClient>,
    pub history: Option<HistoryStore>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/analyze-link")
            .route(web::post().to(link::analyze_link))
            .route(web::method(actix_web::http::Method::OPTIONS).to(preflight)),
    )
    .service(
        web::resource("/verify-text")
            .route(web::post().to(text::verify_text))
            .route(web::method(actix_web::http::Method::OPTIONS).to(preflight)),
    );
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Rate-limit key for one caller. Trusts the first x-forwarded-for hop
/// when present (the expected reverse-proxy deployment), falls back to
/// the socket peer.
pub fn client_key(req: &HttpRequest) -> String {
    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
