#![allow(dead_code)]

use axum::Router;
use mongodb::{options::ClientOptions, Client};
use record_service::{
    build_router, config::RecordConfig, services::MongoDb, AppState, Application,
};

/// Points at a port nothing listens on, with a short selection timeout.
pub const UNREACHABLE_MONGODB_URI: &str = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";

pub fn config_from(pairs: &[(&str, &str)]) -> RecordConfig {
    RecordConfig::from_source(Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    ))
    .expect("Failed to build test configuration")
}

/// Router wired to a database handle whose deployment is unreachable.
///
/// Anything that touches MongoDB fails; everything else behaves normally.
pub async fn router_with_unreachable_db() -> Router {
    let config = config_from(&[("MONGODB_URI", UNREACHABLE_MONGODB_URI)]);
    let options = ClientOptions::parse(UNREACHABLE_MONGODB_URI)
        .await
        .expect("Failed to parse MongoDB connection string");
    let client = Client::with_options(options).expect("Failed to create MongoDB client");
    let db = MongoDb::with_client(client, &config.mongodb.database);

    build_router(AppState::new(db))
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: mongodb::Database,
    pub db_name: String,
}

impl TestApp {
    /// Spawns the full application against `TEST_MONGODB_URI` on a random port.
    pub async fn spawn() -> Self {
        let db_name = format!("record_test_{}", uuid::Uuid::new_v4().simple());
        let uri = std::env::var("TEST_MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let config = config_from(&[
            ("MONGODB_URI", uri.as_str()),
            ("MONGODB_DATABASE", db_name.as_str()),
            ("PORT", "0"),
        ]);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let db = app.db().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    /// Cleanup test database after test completes.
    pub async fn cleanup(&self) {
        self.db
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}
