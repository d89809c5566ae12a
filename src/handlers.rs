use crate::config::Config;
use crate::db::VendorStore;
use crate::errors::AppError;
use crate::models::{decode_vendor, VendorCreated};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on a single insert, measured per request.
pub const INSERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where created vendors are written. Shared read-only across requests.
    pub store: Arc<dyn VendorStore>,
    /// Application configuration.
    pub config: Config,
    /// Deadline applied to each insert.
    pub insert_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn VendorStore>, config: Config) -> Self {
        Self {
            store,
            config,
            insert_timeout: INSERT_TIMEOUT,
        }
    }
}

/// Health check endpoint.
///
/// Returns the service status and version. Does not touch the store.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/vendor
///
/// Decodes the body into a [`crate::models::Vendor`] and inserts it as a new document.
///
/// The body is decoded regardless of `Content-Type`. A body that cannot be
/// read, is not valid JSON, or whose fields have the wrong types yields 400
/// with the underlying message and nothing is written. A failed or timed-out
/// insert yields 500 with a fixed message.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<VendorCreated>), AppError>` - 201 with the generated id, or an error.
pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<VendorCreated>), AppError> {
    let vendor = decode_vendor(&body?)?;
    tracing::info!(
        "POST /api/vendor - vendor_id: {} -> {}.{}",
        vendor.vendor_id,
        state.config.db_name,
        state.config.collection_name
    );

    let inserted_id =
        tokio::time::timeout(state.insert_timeout, state.store.insert_vendor(&vendor)).await??;

    tracing::info!(
        "Created vendor {} as document {}",
        vendor.vendor_id,
        inserted_id
    );

    Ok((
        StatusCode::CREATED,
        Json(VendorCreated::new(inserted_id, vendor.vendor_id)),
    ))
}
