//! Centralized error responder.
//!
//! Handlers return `Result<HttpResponse, ApiError>` and use `?` on the
//! dataset and aggregate calls. Actix renders every `Err` through
//! [`ResponseError`], so logging and the `{ "error": ... }` body live in one
//! place instead of in each handler.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use la_business_analytics::AnalyticsError;
use la_business_dataset::DataUnavailableError;
use la_business_server_models::ApiError as ApiErrorBody;

/// Message for requests that match no route.
pub const NOT_FOUND_MESSAGE: &str = "The resource you are looking for does not exist";

/// Errors a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The dataset could not be loaded.
    #[error(transparent)]
    Unavailable(#[from] DataUnavailableError),

    /// The aggregate could not be computed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("Request failed: {}", error_chain(self));
        error_body(self.status_code(), self.to_string())
    }
}

/// Builds a JSON error response.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiErrorBody {
        error: message.into(),
    })
}

/// Formats an error and all of its sources as `outer: inner: ...`.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use la_business_cache::CacheError;

    use super::*;

    fn corrupt() -> DataUnavailableError {
        CacheError::Corrupt {
            path: PathBuf::from("cache/businesses.json"),
            source: serde_json::from_str::<Vec<u8>>("nope").unwrap_err(),
        }
        .into()
    }

    #[test]
    fn unavailable_is_500_with_generic_message() {
        let err = ApiError::from(corrupt());

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error while requesting data");
    }

    #[test]
    fn empty_dataset_is_500() {
        let err = ApiError::from(AnalyticsError::EmptyDataset);

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Dataset is empty");
    }

    #[test]
    fn chain_includes_cause() {
        let err = ApiError::from(corrupt());
        let chain = error_chain(&err);

        assert!(chain.starts_with("Error while requesting data: "));
        assert!(chain.contains("cache/businesses.json is corrupt"));
    }
}
