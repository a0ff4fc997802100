//! Prompt templates for recipe transformation.

use crate::dtos::TransformRequest;

/// The three prompts sent for one transform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformPrompts {
    pub transform: String,
    pub costs: String,
    pub nutrition: String,
}

impl TransformPrompts {
    pub fn build(request: &TransformRequest) -> Self {
        Self {
            transform: transform_prompt(request),
            costs: costs_prompt(request),
            nutrition: nutrition_prompt(request),
        }
    }
}

/// Ask for a version of the recipe that satisfies every constraint.
pub fn transform_prompt(request: &TransformRequest) -> String {
    format!(
        "Transform this recipe:\n\
         Name: {name}\n\
         Diet: {diet}\n\
         Recipe: {recipe}\n\
         Allergy: {allergy}\n\
         Place: {place}\n\
         Desired Calories: {calories}\n\
         \n\
         Please provide a modified version that follows the diet requirements while \
         maintaining the essence of the original recipe. It must use ingredients available \
         at the place, must not include the allergy contents, and must be within the range \
         of the desired calories. Also mention the calories and protein content of both the \
         input recipe and the generated recipe.",
        name = request.recipe_name,
        diet = request.diet,
        recipe = request.recipe_text,
        allergy = request.allergy,
        place = request.place,
        calories = request.calories,
    )
}

/// Ask for the current and a reduced cost of preparation.
pub fn costs_prompt(request: &TransformRequest) -> String {
    format!(
        "Calculate the initial cost of preparation and reduced cost of preparation for the \
         following recipe:\n\
         Name: {name}\n\
         Recipe: {recipe}\n\
         Diet: {diet}\n\
         Allergy: {allergy}\n\
         Place: {place}",
        name = request.recipe_name,
        recipe = request.recipe_text,
        diet = request.diet,
        allergy = request.allergy,
        place = request.place,
    )
}

/// Ask for the protein and calorie content of the original recipe.
pub fn nutrition_prompt(request: &TransformRequest) -> String {
    format!(
        "Provide the nutritional information (initial protein and calorie content) for the \
         following recipe:\n\
         Name: {name}\n\
         Recipe: {recipe}",
        name = request.recipe_name,
        recipe = request.recipe_text,
    )
}
