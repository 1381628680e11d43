//! Error conversions - axum integration for [`AppError`]
//!
//! Renders an RFC 7807 response body. Compiled only with the `axum` feature.

use super::app_error::AppError;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;
    use axum::response::IntoResponse;

    #[test]
    fn test_response_status_follows_kind() {
        let response = AppError::forbidden("Unauthorized access").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);

        let response = AppError::new(ErrorKind::Conflict, "Already registered").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
    }
}
