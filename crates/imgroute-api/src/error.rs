//! HTTP error response conversion
//!
//! Handlers return `Result<Response, HttpAppError>`. Error responses carry a
//! status code and an empty body; the detail only goes to the logs.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use imgroute_core::{AppError, ErrorMetadata, LogLevel};

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from imgroute-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, error_code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Body::empty()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::ForbiddenTransform("r_1_1".into()), StatusCode::NOT_FOUND),
            (AppError::ConfigNotFound("/x".into()), StatusCode::NOT_FOUND),
            (AppError::UnknownTransform("sepia".into()), StatusCode::BAD_REQUEST),
            (AppError::EncodeFailure("ico".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            let response = HttpAppError::from(error).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
