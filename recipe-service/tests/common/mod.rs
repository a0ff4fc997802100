//! Common test utilities for recipe-service integration tests.

#![allow(dead_code)]

use recipe_service::config::{
    DatabaseConfig, GeminiSettings, RecipeConfig, DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL,
};
use recipe_service::services::providers::mock::MockTextProvider;
use recipe_service::services::{ModelHandle, RecipeDb};
use recipe_service::startup::Application;
use service_core::config::Config as CommonConfig;
use std::path::PathBuf;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,recipe_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub address: String,
    pub db: RecipeDb,
    pub client: reqwest::Client,
    db_path: PathBuf,
}

impl TestApp {
    /// Spawn the app with an echoing mock model.
    pub async fn spawn() -> (Self, Arc<MockTextProvider>) {
        let mock = Arc::new(MockTextProvider::new());
        let app = Self::spawn_with_model(ModelHandle::Ready(mock.clone())).await;
        (app, mock)
    }

    /// Spawn the app with no model configured.
    pub async fn spawn_without_model() -> Self {
        Self::spawn_with_model(ModelHandle::Unavailable("not configured in test".to_string()))
            .await
    }

    pub async fn spawn_with_model(model: ModelHandle) -> Self {
        init_tracing();

        let db_path = std::env::temp_dir().join(format!("recipe_test_{}.db", uuid::Uuid::new_v4()));

        let config = RecipeConfig {
            common: CommonConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            service_name: "recipe-service-test".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                path: db_path.to_string_lossy().into_owned(),
                max_connections: 2,
            },
            gemini: GeminiSettings {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            },
        };

        let app = Application::build_with_model(config, model)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());
        let db = app.db().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
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
            db,
            client,
            db_path,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn add_recipe(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url("/add_recipe"))
            .form(fields)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn transform(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url("/transform_recipe"))
            .form(fields)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_recipes(&self) -> Vec<serde_json::Value> {
        let response = self
            .client
            .get(self.url("/get_recipes"))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn cleanup(self) {
        self.db.close().await;
        let _ = std::fs::remove_file(&self.db_path);
    }
}

/// A complete transform form.
pub fn transform_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("recipe_name", "Paneer Butter Masala"),
        ("recipe_text", "Simmer paneer in a butter, cream and cashew gravy"),
        ("diet", "vegan"),
        ("Allergy", "cashew"),
        ("Place", "Bengaluru"),
        ("Calories", "450"),
    ]
}
