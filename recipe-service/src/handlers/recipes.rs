//! Recipe catalog handlers.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form, Json,
};
use service_core::error::AppError;
use tracing::instrument;

use crate::{
    dtos::{AddRecipeForm, AddRecipeResponse, NewRecipe},
    handlers::invalid_form,
    models::RecipeSummary,
    AppState,
};

/// Store a new recipe in the catalog.
#[instrument(skip_all)]
pub async fn add_recipe(
    State(state): State<AppState>,
    form: Result<Form<AddRecipeForm>, FormRejection>,
) -> Result<(StatusCode, Json<AddRecipeResponse>), AppError> {
    let Form(form) = form.map_err(invalid_form)?;
    let new_recipe = NewRecipe::try_from(form)?;

    let recipe = state
        .db
        .insert_recipe(&new_recipe.recipe_name, &new_recipe.recipe_text)
        .await?;

    tracing::info!(
        recipe_id = recipe.recipe_id,
        recipe_name = %recipe.recipe_name,
        "Recipe added"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddRecipeResponse {
            message: "Recipe added successfully".to_string(),
            recipe_id: recipe.recipe_id,
        }),
    ))
}

/// List every recipe as `{id, name}`.
#[instrument(skip_all)]
pub async fn get_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let recipes = state.db.list_recipes().await?;
    tracing::debug!(count = recipes.len(), "Listed recipes");
    Ok(Json(recipes))
}
