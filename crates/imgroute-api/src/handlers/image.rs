use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::Response,
};
use imgroute_core::constants::SERVER_NAME;
use imgroute_core::AppError;
use std::sync::Arc;

/// Serve `/<transform>/<key>.<suffix>`.
///
/// A path that cannot be extracted (for example invalid UTF-8 after percent
/// decoding) is a malformed key like any other.
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, HttpAppError> {
    let Path(path) = path.map_err(|rejection| AppError::MalformedKey(rejection.body_text()))?;
    let rendered = state.resolver.resolve(&format!("/{}", path)).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::SERVER, SERVER_NAME)
        .header(header::CONTENT_TYPE, rendered.content_type)
        .header(header::CONTENT_LENGTH, rendered.bytes.len());
    if let Some(expire) = rendered.expire {
        builder = builder.header(header::CACHE_CONTROL, format!("public, max-age={}", expire));
    }

    let response = builder.body(Body::from(rendered.bytes)).map_err(|e| {
        tracing::error!(error = %e, "Failed to build response");
        HttpAppError::from(AppError::Internal(e.to_string()))
    })?;

    Ok(response)
}

pub async fn favicon() -> StatusCode {
    StatusCode::NOT_FOUND
}
