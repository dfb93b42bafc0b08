use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors that end a request with a non-200 status and a `{"detail": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(format!("Unexpected error: {}", err))
    }
}

impl From<mib_core::Error> for ApiError {
    fn from(err: mib_core::Error) -> Self {
        match err {
            mib_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            err @ mib_core::Error::MissingField(_) => ApiError::Unprocessable(err.to_string()),
            other => ApiError::unexpected(other),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Unexpected error occurred: {}", self.detail());
        } else {
            tracing::warn!("HTTP {}: {}", status.as_u16(), self.detail());
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mib_core::Error;

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(Error::InvalidInput("Empty file uploaded".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), "Empty file uploaded");

        let err = ApiError::from(Error::MissingField("image".into()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail(), "Field required: image");

        let err = ApiError::from(Error::Internal("worker panicked".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Unexpected error: Internal error: worker panicked");
    }

    #[tokio::test]
    async fn test_response_body_is_detail() {
        let response = ApiError::unexpected("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "detail": "Unexpected error: boom" }));
    }
}
