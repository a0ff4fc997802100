//! Database service for recipe-service.

use crate::config::DatabaseConfig;
use crate::models::{Recipe, RecipeSummary};
use crate::services::metrics::{record_db_error, record_db_operation};
use service_core::error::AppError;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, Sqlite};
use std::time::{Duration, Instant};
use tracing::{info, instrument};

const RECIPES_TABLE: &str = "recipes";

const CREATE_RECIPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    recipe_id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_name TEXT NOT NULL,
    recipe_text TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQLite-backed recipe catalog.
#[derive(Clone)]
pub struct RecipeDb {
    pool: SqlitePool,
}

impl RecipeDb {
    /// Open (creating if needed) the database file and build the pool.
    ///
    /// The schema statement runs on every newly opened connection.
    #[instrument(skip(config), fields(path = %config.path))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            "Opening SQLite database"
        );

        if config.max_connections == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "database pool needs at least one connection"
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute(CREATE_RECIPES_TABLE).await?;
                    Ok(())
                })
            })
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection pool established");

        Ok(Self { pool })
    }

    /// Create the recipes table if it does not exist yet.
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let mut conn = self.acquire("ensure_schema").await?;
        sqlx::query(CREATE_RECIPES_TABLE)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("ensure_schema", "Failed to create schema", e))?;
        info!("Recipe schema ready");
        Ok(())
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Insert a recipe and return the stored row with its assigned id.
    #[instrument(skip(self, recipe_text), fields(recipe_name = %recipe_name))]
    pub async fn insert_recipe(
        &self,
        recipe_name: &str,
        recipe_text: &str,
    ) -> Result<Recipe, AppError> {
        let start = Instant::now();
        let mut conn = self.acquire("insert_recipe").await?;

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (recipe_name, recipe_text)
            VALUES (?, ?)
            RETURNING recipe_id, recipe_name, recipe_text, created_at
            "#,
        )
        .bind(recipe_name)
        .bind(recipe_text)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| db_error("insert_recipe", "Failed to insert recipe", e))?;

        record_db_operation(
            "insert_recipe",
            RECIPES_TABLE,
            start.elapsed().as_secs_f64(),
        );

        info!(recipe_id = recipe.recipe_id, "Recipe inserted");

        Ok(recipe)
    }

    /// List every recipe as an `(id, name)` pair, in id order.
    #[instrument(skip(self))]
    pub async fn list_recipes(&self) -> Result<Vec<RecipeSummary>, AppError> {
        let start = Instant::now();
        let mut conn = self.acquire("list_recipes").await?;

        let recipes = sqlx::query_as::<_, RecipeSummary>(
            "SELECT recipe_id, recipe_name FROM recipes ORDER BY recipe_id",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| db_error("list_recipes", "Failed to list recipes", e))?;

        record_db_operation(
            "list_recipes",
            RECIPES_TABLE,
            start.elapsed().as_secs_f64(),
        );

        Ok(recipes)
    }

    /// Check out a connection; it goes back to the pool when dropped.
    async fn acquire(&self, operation: &str) -> Result<PoolConnection<Sqlite>, AppError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| db_error(operation, "Failed to acquire connection", e))
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn db_error(operation: &str, context: &str, err: sqlx::Error) -> AppError {
    record_db_error(operation, RECIPES_TABLE);
    AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, err))
}
