//! Recipe catalog model.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// A persisted recipe row.
///
/// Rows are created once and never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub recipe_text: String,
    pub created_at: Option<NaiveDateTime>,
}

/// The `(id, name)` projection returned by the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeSummary {
    #[sqlx(rename = "recipe_id")]
    pub id: i64,
    #[sqlx(rename = "recipe_name")]
    pub name: String,
}
