//! HTTP handler functions for the business stats API.
//!
//! Each statistics handler loads the dataset for this request only and
//! computes one aggregate over it.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use la_business_analytics as analytics;
use la_business_server_models::{ApiHealth, ApiMostLocations, ApiTotal};

use crate::AppState;
use crate::error::{ApiError, NOT_FOUND_MESSAGE, error_body};

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /total`
///
/// Returns the number of distinct business names.
pub async fn total(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let list = state.provider.get_list().await?;

    Ok(HttpResponse::Ok().json(ApiTotal {
        total: analytics::unique_count(&list),
    }))
}

/// `GET /oldest`
///
/// Returns the oldest business record exactly as the source published it.
pub async fn oldest(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let list = state.provider.get_list().await?;
    let record = analytics::oldest(&list)?;

    Ok(HttpResponse::Ok().json(record))
}

/// `GET /most-locations`
///
/// Returns the business name with the most location rows.
pub async fn most_locations(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let list = state.provider.get_list().await?;
    let most = analytics::most_locations(&list)?;

    Ok(HttpResponse::Ok().json(ApiMostLocations::from(most)))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    error_body(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}
