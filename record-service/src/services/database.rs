use crate::config::MongoConfig;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client as MongoClient, Collection, Database,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;

pub const RECORDS_COLLECTION: &str = "records";

/// Handle to the application database.
///
/// Obtained through [`MongoDb::connect`], which only succeeds once the
/// deployment has answered a ping. The handle is never re-validated.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(database = %config.database, "Connecting to MongoDB");

        let mut client_options = ClientOptions::parse(config.uri.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                AppError::from(e)
            })?;
        client_options.app_name = Some(config.app_name.clone());
        client_options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;

        let db = Self::with_client(client, &config.database);
        db.ping().await?;

        tracing::info!(
            database = %config.database,
            "Pinged deployment, successfully connected to MongoDB"
        );
        Ok(db)
    }

    /// Wraps an existing client without pinging the deployment.
    pub fn with_client(client: MongoClient, database: &str) -> Self {
        let db = client.database(database);
        Self { client, db }
    }

    /// Liveness check against the `admin` database.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB ping failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn records(&self) -> Collection<Document> {
        self.db.collection(RECORDS_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
