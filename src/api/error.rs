use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;

use crate::core::error::EngineError;

/// Errors surfaced to HTTP callers. Messages are the PT-BR strings the
/// web client displays verbatim; internal detail stays in the logs.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Limite de requisições excedido. Tente novamente em alguns minutos.")]
    RateLimited,
    #[error("Limite de requisições excedido. Tente novamente mais tarde.")]
    UpstreamRateLimited,
    #[error("Serviço temporariamente indisponível")]
    Unavailable,
    #[error("Erro interno do servidor")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited | ApiError::UpstreamRateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(json!({ "error": self.to_string() }))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidUrl => {
                ApiError::InvalidInput("Formato de URL inválido".to_string())
            }
            EngineError::TextTooShort(min) => ApiError::InvalidInput(format!(
                "Texto muito curto. Envie pelo menos {min} caracteres."
            )),
            EngineError::TextTooLong(max) => ApiError::InvalidInput(format!(
                "Texto muito longo. O limite é de {max} caracteres."
            )),
            EngineError::UpstreamRateLimited => ApiError::UpstreamRateLimited,
            EngineError::UpstreamUnavailable(_) | EngineError::UpstreamUnreachable(_) => {
                ApiError::Unavailable
            }
            EngineError::Config(_) | EngineError::Db(_) | EngineError::Io(_) => ApiError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn engine_errors_map_to_client_messages() {
        let err: ApiError = EngineError::InvalidUrl.into();
        assert!(matches!(err, ApiError::InvalidInput(ref m) if m.contains("URL")));

        let err: ApiError = EngineError::TextTooShort(10).into();
        assert!(matches!(err, ApiError::InvalidInput(ref m) if m.contains("10")));

        let err: ApiError = EngineError::UpstreamUnavailable("boom".into()).into();
        assert!(matches!(err, ApiError::Unavailable));
    }
}
