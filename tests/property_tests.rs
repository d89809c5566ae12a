/// Property-based tests using proptest
/// Tests decode and echo behavior that should hold for all inputs
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mongodb::bson::oid::ObjectId;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;
use vendor_api::config::Config;
use vendor_api::db::VendorStore;
use vendor_api::errors::AppError;
use vendor_api::handlers::AppState;
use vendor_api::models::Vendor;
use vendor_api::routes::build_router;

#[derive(Default)]
struct CountingStore {
    inserts: AtomicUsize,
}

#[async_trait]
impl VendorStore for CountingStore {
    async fn insert_vendor(&self, _vendor: &Vendor) -> Result<String, AppError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(ObjectId::new().to_hex())
    }
}

fn post(store: Arc<CountingStore>, body: String) -> (StatusCode, Value) {
    let config = Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        db_name: "db".to_string(),
        collection_name: "vendors".to_string(),
        port: 8080,
    };
    let app = build_router(Arc::new(AppState::new(store, config)));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async move {
        let request = Request::builder()
            .method("POST")
            .uri("/api/vendor")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    })
}

// Property: well-typed vendors are created and their vendor_id is echoed
proptest! {
    #[test]
    fn valid_vendor_echoes_vendor_id(
        vendor_id in "\\PC*",
        name in "[A-Za-z ]{0,20}",
        ratings in proptest::collection::vec(("[a-z0-9]{1,8}", -10.0f64..10.0), 0..5),
        avg_response_time in any::<i64>(),
        trust_score in -1.0f64..2.0
    ) {
        let store = Arc::new(CountingStore::default());
        let company_wise_ratings: Vec<Value> = ratings
            .iter()
            .map(|(id, rating)| json!({"company_id": id, "avg_rating": rating}))
            .collect();
        let body = json!({
            "vendor_id": vendor_id,
            "name": name,
            "company_wise_ratings": company_wise_ratings,
            "global_metrics": {"avg_response_time": avg_response_time},
            "trust_score": trust_score
        });

        let (status, resp) = post(store.clone(), body.to_string());

        prop_assert_eq!(status, StatusCode::CREATED);
        prop_assert_eq!(resp["vendor_id"].as_str(), Some(vendor_id.as_str()));
        prop_assert!(!resp["insertedId"].as_str().unwrap_or_default().is_empty());
        prop_assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn string_trust_score_rejected(trust_score in "\\PC*") {
        let store = Arc::new(CountingStore::default());
        let body = json!({"vendor_id": "v1", "trust_score": trust_score});

        let (status, resp) = post(store.clone(), body.to_string());

        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
        prop_assert!(!resp["error"].as_str().unwrap_or_default().is_empty());
        prop_assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arbitrary_bytes_never_panic(body in proptest::collection::vec(any::<u8>(), 0..256)) {
        let store = Arc::new(CountingStore::default());
        let (status, _) = post(store, String::from_utf8_lossy(&body).into_owned());

        prop_assert!(status == StatusCode::CREATED || status == StatusCode::BAD_REQUEST);
    }
}
