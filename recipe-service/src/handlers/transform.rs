//! Recipe transformation handler.
//!
//! One request makes three sequential model calls: the transformed recipe,
//! a cost estimate and a nutrition estimate.

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use service_core::error::AppError;
use std::time::Instant;
use tracing::instrument;

use crate::{
    dtos::{TransformForm, TransformRequest, TransformResponse},
    handlers::invalid_form,
    services::{
        metrics::{record_genai_request, record_provider_latency},
        prompts::TransformPrompts,
        TextProvider,
    },
    AppState,
};

#[instrument(skip_all)]
pub async fn transform_recipe(
    State(state): State<AppState>,
    form: Result<Form<TransformForm>, FormRejection>,
) -> Result<Json<TransformResponse>, AppError> {
    // Availability is checked before the body is looked at
    let provider = state.model.provider()?;

    let Form(form) = form.map_err(invalid_form)?;
    let request = TransformRequest::try_from(form)?;

    tracing::info!(
        recipe_name = %request.recipe_name,
        diet = %request.diet,
        place = %request.place,
        "Transforming recipe"
    );

    let prompts = TransformPrompts::build(&request);

    let transformed_recipe = generate(provider.as_ref(), "transform", &prompts.transform).await?;
    let costs_info = generate(provider.as_ref(), "costs", &prompts.costs).await?;
    let nutrition_info = generate(provider.as_ref(), "nutrition", &prompts.nutrition).await?;

    Ok(Json(TransformResponse {
        transformed_recipe,
        costs_info,
        nutrition_info,
        recipe_name: request.recipe_name,
        original_recipe: request.recipe_text,
        diet: request.diet,
        allergy: request.allergy,
        place: request.place,
        calories: request.calories,
    }))
}

async fn generate(
    provider: &dyn TextProvider,
    section: &'static str,
    prompt: &str,
) -> Result<String, AppError> {
    let start = Instant::now();
    let result = provider.generate(prompt).await;
    let elapsed = start.elapsed().as_secs_f64();

    record_provider_latency(provider.name(), provider.model(), elapsed);

    match result {
        Ok(text) => {
            record_genai_request(provider.model(), section, "ok");
            tracing::debug!(
                section,
                elapsed_secs = elapsed,
                response_len = text.len(),
                "Model call completed"
            );
            Ok(text)
        }
        Err(e) => {
            record_genai_request(provider.model(), section, "error");
            tracing::error!(section, error = %e, "Model call failed");
            Err(e.into())
        }
    }
}
