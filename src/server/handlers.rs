/// API Request Handlers
/// Reuses core business logic from existing modules

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::{
    build_health_summary, Dataset, HealthSummary, ReadingsSource, Report, ThresholdConfig,
    ThresholdStore,
};
use crate::utils::{resolve_data_dir, DATA_FILE, RANGE_CONFIG_FILE};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

/// Per-request source construction; nothing is cached between requests, so
/// every response reflects the files as they are right now.
fn open_sources() -> anyhow::Result<(ThresholdStore, ReadingsSource)> {
    let dir = resolve_data_dir()?;
    Ok((
        ThresholdStore::new(dir.join(RANGE_CONFIG_FILE)),
        ReadingsSource::new(dir.join(DATA_FILE)),
    ))
}

// ============================================================================
// Data Handlers
// ============================================================================

pub async fn get_data() -> Result<Json<ApiResponse<Dataset>>, StatusCode> {
    let (store, source) = open_sources().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // A broken threshold config degrades to "no thresholds", it never takes
    // the data endpoint down
    let config = store.load_or_empty();

    Ok(Json(ApiResponse::ok(source.load_dataset(&config))))
}

/// POST /api/update - force a re-ingestion cycle and return the fresh dataset
pub async fn refresh_data() -> Result<Json<ApiResponse<Dataset>>, StatusCode> {
    get_data().await
}

pub async fn get_raw() -> Response {
    let Ok((_, source)) = open_sources() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    // No bootstrap here: a missing data file is a 404, not a write trigger
    match source.read_existing() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "数据文件未找到").into_response(),
    }
}

// ============================================================================
// Configuration Handlers
// ============================================================================

pub async fn get_config() -> Result<Json<ApiResponse<ThresholdConfig>>, StatusCode> {
    let (store, _) = open_sources().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match store.load() {
        Ok(config) => Ok(Json(ApiResponse::ok(config))),
        Err(err) => Ok(Json(ApiResponse::error(err.to_string()))),
    }
}

pub async fn put_config(
    Json(new_config): Json<ThresholdConfig>,
) -> Result<Json<ApiResponse<ThresholdConfig>>, StatusCode> {
    let (store, _) = open_sources().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Validate-then-swap: a rejected payload leaves the prior config in effect
    match store.replace(&new_config) {
        Ok(()) => Ok(Json(ApiResponse::ok(new_config))),
        Err(err) => Ok(Json(ApiResponse::error(err.to_string()))),
    }
}

// ============================================================================
// Monitoring Handlers
// ============================================================================

pub async fn get_health() -> Result<Json<ApiResponse<HealthSummary>>, StatusCode> {
    let (store, source) = open_sources().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let config = store.load_or_empty();
    let dataset = source.load_dataset(&config);

    Ok(Json(ApiResponse::ok(build_health_summary(&dataset))))
}

pub async fn get_report() -> Result<Json<ApiResponse<Report>>, StatusCode> {
    let (store, source) = open_sources().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let config = store.load_or_empty();
    let dataset = source.load_dataset(&config);

    Ok(Json(ApiResponse::ok(Report::from_dataset(&dataset))))
}
