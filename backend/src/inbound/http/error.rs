//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failure the same JSON envelope: `success: false`, a short `error`
//! string, the stable `code`, and optional structured `details`. Internal
//! errors are redacted so responses never leak implementation detail; the
//! trace id survives redaction for correlation.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::TokenExpired => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound | ErrorCode::NoConsultantAvailable | ErrorCode::InvalidToken => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::TokenAlreadyUsed => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Failure envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorBody {
    fn redacted_if_internal(error: &Error) -> Self {
        if matches!(error.code(), ErrorCode::InternalError) {
            return Self {
                success: false,
                error: "Internal server error".to_owned(),
                code: error.code(),
                details: None,
                trace_id: error.trace_id().map(str::to_owned),
            };
        }
        Self {
            success: false,
            error: error.message().to_owned(),
            code: error.code(),
            details: error.details().cloned(),
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorBody::redacted_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Status mapping and envelope shape.

    use actix_web::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn body_json(error: Error) -> Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        serde_json::from_slice(&bytes).expect("error body is JSON")
    }

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (Error::invalid_request("bad"), StatusCode::BAD_REQUEST),
            (Error::not_found("missing"), StatusCode::NOT_FOUND),
            (
                Error::no_consultant_available("nobody"),
                StatusCode::NOT_FOUND,
            ),
            (Error::invalid_token("unknown"), StatusCode::NOT_FOUND),
            (Error::token_expired("stale"), StatusCode::BAD_REQUEST),
            (Error::token_already_used("dupe"), StatusCode::CONFLICT),
            (
                Error::service_unavailable("down"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status);
        }
    }

    #[actix_web::test]
    async fn envelope_flags_failure_and_carries_the_code() {
        let body = body_json(Error::token_expired("token has expired")).await;

        assert_eq!(body.get("success"), Some(&json!(false)));
        assert_eq!(body.get("error"), Some(&json!("token has expired")));
        assert_eq!(body.get("code"), Some(&json!("token_expired")));
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let err = Error::internal("db password rejected").with_details(json!({ "dsn": "secret" }));
        let body = body_json(err).await;

        assert_eq!(body.get("error"), Some(&json!("Internal server error")));
        assert!(body.get("details").is_none());
    }

    #[actix_web::test]
    async fn validation_details_are_exposed() {
        let err = Error::invalid_request("bad").with_details(json!({ "field": "plataforma" }));
        let body = body_json(err).await;

        assert_eq!(body.get("details"), Some(&json!({ "field": "plataforma" })));
    }

    #[actix_web::test]
    async fn trace_id_is_echoed_as_a_header() {
        let err = Error::invalid_token("nope").with_trace_id("abc");
        let response = err.error_response();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii");
        assert_eq!(header, "abc");
    }
}
