use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::{LookupError, WeatherLookupService, WeatherRecord};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherLookupService>,
    pub body_limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct AreaQuery {
    pub area: Option<String>,
}

/// POST body: a flat object of string values. `null` and a missing
/// `area` key both resolve to the empty name.
pub type AreaRequest = Option<HashMap<String, String>>;

/// Error responses of the `/weather` endpoint, sent as plain text
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Lookup(LookupError),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::AreaNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Lookup(LookupError::AreaNotFound { area }) => {
                format!("area code not found for '{area}'")
            }
            ApiError::Lookup(LookupError::SourceUnavailable { .. }) => {
                "failed to read area code table".to_string()
            }
            ApiError::Lookup(err) => format!("failed to get weather: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(message) => warn!("Rejected request: {}", message),
            ApiError::Lookup(LookupError::AreaNotFound { area }) => {
                warn!("Unknown area requested: {}", area)
            }
            ApiError::Lookup(err) => error!("Weather lookup failed: {}", err),
        }
        (status, self.message()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/weather",
            get(get_weather).post(post_weather).head(method_not_allowed),
        )
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<AreaQuery>,
) -> Result<Json<WeatherRecord>, ApiError> {
    let area = query
        .area
        .filter(|area| !area.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing query parameter: area".to_string()))?;

    let record = state.service.lookup(&area).await?;
    Ok(Json(record))
}

async fn post_weather(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<WeatherRecord>, ApiError> {
    let bytes = to_bytes(body, state.body_limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read request body: {e}")))?;

    // parsed regardless of content type
    let request: AreaRequest = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("failed to parse JSON body: {e}")))?;

    let area = request
        .and_then(|mut fields| fields.remove("area"))
        .unwrap_or_default();

    let record = state.service.lookup(&area).await?;
    Ok(Json(record))
}

// HEAD would otherwise be served by the GET handler
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET,POST")],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Lookup(LookupError::AreaNotFound { area: "x".to_string() }), StatusCode::NOT_FOUND)]
    #[case(ApiError::Lookup(LookupError::SourceUnavailable {
        path: "tqdm.txt".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    }), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ApiError::Lookup(LookupError::network("refused")), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ApiError::Lookup(LookupError::read("eof")), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ApiError::Lookup(LookupError::timeout("10s")), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ApiError::Lookup(LookupError::parse("utf-8")), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
    }

    #[test]
    fn test_upstream_message_embeds_cause() {
        let err = ApiError::Lookup(LookupError::network("connection refused"));
        assert_eq!(err.message(), "failed to get weather: request failed: connection refused");
    }

    #[rstest]
    #[case::empty_object("{}")]
    #[case::null("null")]
    fn test_request_without_area(#[case] body: &str) {
        let request: AreaRequest = serde_json::from_str(body).unwrap();
        assert!(request.and_then(|mut fields| fields.remove("area")).is_none());
    }

    #[rstest]
    #[case::number_value(r#"{"area": "北京", "n": 1}"#)]
    #[case::number_area(r#"{"area": 5}"#)]
    #[case::array(r#"["北京"]"#)]
    fn test_request_rejects_non_string_fields(#[case] body: &str) {
        assert!(serde_json::from_str::<AreaRequest>(body).is_err());
    }
}
