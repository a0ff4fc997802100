//! Request and response bodies for the HTTP handlers.
//!
//! Forms arrive with every field optional; `validate` rejects absent or empty
//! values before anything else happens.

use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

pub const MISSING_TRANSFORM_FIELDS: &str = "Missing required fields";
pub const MISSING_RECIPE_FIELDS: &str = "Both recipe name and text are required";

/// Form body of `POST /transform_recipe`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TransformForm {
    #[validate(required, length(min = 1))]
    pub recipe_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub recipe_text: Option<String>,
    #[validate(required, length(min = 1))]
    pub diet: Option<String>,
    #[serde(rename = "Allergy")]
    #[validate(required, length(min = 1))]
    pub allergy: Option<String>,
    #[serde(rename = "Place")]
    #[validate(required, length(min = 1))]
    pub place: Option<String>,
    #[serde(rename = "Calories")]
    #[validate(required, length(min = 1))]
    pub calories: Option<String>,
}

/// A transform request with every field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub recipe_name: String,
    pub recipe_text: String,
    pub diet: String,
    pub allergy: String,
    pub place: String,
    pub calories: String,
}

impl TryFrom<TransformForm> for TransformRequest {
    type Error = AppError;

    fn try_from(form: TransformForm) -> Result<Self, Self::Error> {
        if let Err(errors) = form.validate() {
            tracing::debug!(errors = %errors, "Transform form rejected");
            return Err(missing(MISSING_TRANSFORM_FIELDS));
        }

        let TransformForm {
            recipe_name: Some(recipe_name),
            recipe_text: Some(recipe_text),
            diet: Some(diet),
            allergy: Some(allergy),
            place: Some(place),
            calories: Some(calories),
        } = form
        else {
            return Err(missing(MISSING_TRANSFORM_FIELDS));
        };

        Ok(Self {
            recipe_name,
            recipe_text,
            diet,
            allergy,
            place,
            calories,
        })
    }
}

/// Form body of `POST /add_recipe`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddRecipeForm {
    #[validate(required, length(min = 1))]
    pub recipe_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub recipe_text: Option<String>,
}

/// A new recipe with both fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub recipe_name: String,
    pub recipe_text: String,
}

impl TryFrom<AddRecipeForm> for NewRecipe {
    type Error = AppError;

    fn try_from(form: AddRecipeForm) -> Result<Self, Self::Error> {
        if let Err(errors) = form.validate() {
            tracing::debug!(errors = %errors, "Add-recipe form rejected");
            return Err(missing(MISSING_RECIPE_FIELDS));
        }

        match (form.recipe_name, form.recipe_text) {
            (Some(recipe_name), Some(recipe_text)) => Ok(Self {
                recipe_name,
                recipe_text,
            }),
            _ => Err(missing(MISSING_RECIPE_FIELDS)),
        }
    }
}

fn missing(message: &str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("{}", message))
}

/// Response body of a successful transform.
#[derive(Debug, Serialize)]
pub struct TransformResponse {
    pub transformed_recipe: String,
    pub costs_info: String,
    pub nutrition_info: String,
    pub recipe_name: String,
    pub original_recipe: String,
    pub diet: String,
    pub allergy: String,
    pub place: String,
    pub calories: String,
}

/// Response body of a successful add-recipe.
#[derive(Debug, Serialize)]
pub struct AddRecipeResponse {
    pub message: String,
    pub recipe_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> TransformForm {
        TransformForm {
            recipe_name: Some("Pancakes".to_string()),
            recipe_text: Some("Flour, eggs, milk".to_string()),
            diet: Some("vegan".to_string()),
            allergy: Some("peanuts".to_string()),
            place: Some("Pune".to_string()),
            calories: Some("300".to_string()),
        }
    }

    #[test]
    fn complete_form_converts() {
        let request = TransformRequest::try_from(full_form()).unwrap();
        assert_eq!(request.allergy, "peanuts");
        assert_eq!(request.calories, "300");
    }

    #[test]
    fn each_missing_field_is_rejected() {
        let clears: [fn(&mut TransformForm); 6] = [
            |f| f.recipe_name = None,
            |f| f.recipe_text = None,
            |f| f.diet = None,
            |f| f.allergy = None,
            |f| f.place = None,
            |f| f.calories = None,
        ];

        for clear in clears {
            let mut form = full_form();
            clear(&mut form);
            let err = TransformRequest::try_from(form).unwrap_err();
            assert_eq!(err.client_message(), MISSING_TRANSFORM_FIELDS);
        }
    }

    #[test]
    fn empty_field_counts_as_missing() {
        let mut form = full_form();
        form.diet = Some(String::new());
        assert!(TransformRequest::try_from(form).is_err());
    }

    #[test]
    fn form_uses_capitalised_field_names() {
        let form: TransformForm = serde_json::from_value(serde_json::json!({
            "recipe_name": "Soup",
            "recipe_text": "Boil",
            "diet": "keto",
            "Allergy": "none",
            "Place": "Oslo",
            "Calories": "200"
        }))
        .unwrap();
        assert!(TransformRequest::try_from(form).is_ok());
    }

    #[test]
    fn add_recipe_requires_both_fields() {
        let err = NewRecipe::try_from(AddRecipeForm {
            recipe_name: Some("Soup".to_string()),
            recipe_text: None,
        })
        .unwrap_err();
        assert_eq!(err.client_message(), MISSING_RECIPE_FIELDS);

        let ok = NewRecipe::try_from(AddRecipeForm {
            recipe_name: Some("Soup".to_string()),
            recipe_text: Some("Boil water".to_string()),
        })
        .unwrap();
        assert_eq!(ok.recipe_text, "Boil water");
    }
}
