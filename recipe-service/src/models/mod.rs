//! Domain models for recipe-service.

pub mod recipe;

pub use recipe::{Recipe, RecipeSummary};
