use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nd_core::Error;
use serde_json::json;
use tracing::error;

/// Maps pipeline failures onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Search(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError(Error::InvalidInput("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(Error::Search("down".into())).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError(Error::Tts("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(Error::QuotaExceeded("daily limit".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
