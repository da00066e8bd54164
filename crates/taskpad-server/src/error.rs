use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::time::Duration;
use taskpad_llm::LLMError;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Failures reported before the response stream opens.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid message")]
    InvalidRequest,

    #[error("GEMINI_API_KEY not configured. Please add it to .env.local")]
    Configuration,

    #[error("{}", upstream_message(.credential))]
    UpstreamRejected { credential: bool },
}

fn upstream_message(credential: &bool) -> &'static str {
    if *credential {
        "Invalid API key. Please check your GEMINI_API_KEY in .env.local"
    } else {
        "Failed to generate response. Please try again."
    }
}

impl AppError {
    pub fn from_upstream(err: &LLMError) -> Self {
        AppError::UpstreamRejected {
            credential: err.is_credential_error(),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest => StatusCode::BAD_REQUEST,
            AppError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamRejected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(JsonError {
            error: self.to_string(),
        })
    }
}

/// Failure after the 200 response has been committed. Yielding one of these
/// from the body stream aborts the chunked response.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream stream failed: {0}")]
    Upstream(String),

    #[error("no fragment from upstream within {0:?}")]
    IdleTimeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_web::test]
    async fn test_status_codes_and_bodies() {
        assert_eq!(AppError::InvalidRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(AppError::InvalidRequest).await,
            serde_json::json!({"error": "Invalid message"})
        );

        assert_eq!(
            AppError::Configuration.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let body = body_json(AppError::Configuration).await;
        assert!(body["error"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_upstream_rejection_distinguishes_credentials() {
        let invalid_key = AppError::from_upstream(&LLMError::Auth("bad key".into()));
        assert_eq!(
            invalid_key.to_string(),
            "Invalid API key. Please check your GEMINI_API_KEY in .env.local"
        );

        let generic = AppError::from_upstream(&LLMError::Api("HTTP 503".into()));
        assert_eq!(
            generic.to_string(),
            "Failed to generate response. Please try again."
        );
        assert_eq!(generic.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
