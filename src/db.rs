use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson},
    options::ClientOptions,
    Client, Collection,
};
use std::time::Duration;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::Vendor;

/// Upper bound on connecting to the store and confirming it answers a ping.
pub const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination for newly created vendor documents.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Appends `vendor` as a new document and returns the identifier the
    /// store generated for it.
    async fn insert_vendor(&self, vendor: &Vendor) -> Result<String, AppError>;
}

/// MongoDB-backed store holding one collection handle for the process lifetime.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Vendor>,
}

impl MongoStore {
    /// Connects to MongoDB and verifies it is reachable.
    ///
    /// Both the connection and the liveness ping must complete within
    /// [`BOOTSTRAP_TIMEOUT`].
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        tokio::time::timeout(BOOTSTRAP_TIMEOUT, Self::connect_inner(config))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Could not connect to MongoDB within {}s",
                    BOOTSTRAP_TIMEOUT.as_secs()
                )
            })?
    }

    async fn connect_inner(config: &Config) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(&config.mongo_uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        // Timeouts given in the URI win over the bootstrap default.
        options.connect_timeout.get_or_insert(BOOTSTRAP_TIMEOUT);
        options.server_selection_timeout.get_or_insert(BOOTSTRAP_TIMEOUT);

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| anyhow::anyhow!("Could not connect to MongoDB: {}", e))?;

        let collection = client
            .database(&config.db_name)
            .collection::<Vendor>(&config.collection_name);

        Ok(Self { collection })
    }

    pub fn collection(&self) -> &Collection<Vendor> {
        &self.collection
    }
}

#[async_trait]
impl VendorStore for MongoStore {
    async fn insert_vendor(&self, vendor: &Vendor) -> Result<String, AppError> {
        let result = self.collection.insert_one(vendor).await?;
        Ok(inserted_id_string(&result.inserted_id))
    }
}

/// Renders a generated `_id` the way it appears in JSON responses.
///
/// ObjectIds become their 24-character hex form; any other id type falls back
/// to its relaxed extended JSON text.
pub fn inserted_id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}
