pub mod database;
pub mod metrics;
pub mod prompts;
pub mod providers;

pub use database::RecipeDb;
pub use metrics::{get_metrics, init_metrics};
pub use providers::{ModelHandle, TextProvider};
