use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pawmart_types::ports::market_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Every store-layer failure is reported once, as a generic server
/// error carrying a fixed per-operation message. The driver detail is
/// logged, never sent to the caller.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Store {
        message: &'static str,
        source: StoreError,
    },
}

impl AppError {
    pub fn store(message: &'static str, source: StoreError) -> Self {
        Self::Store { message, source }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Store { message, source } = &self;
        tracing::error!(error = %source, "{message}");

        let body = serde_json::to_string(&ErrorBody {
            error: (*message).to_string(),
        })
        .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "application/json")],
            body,
        )
            .into_response()
    }
}
