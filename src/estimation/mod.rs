pub mod dto;
pub mod services;

pub use dto::{ExerciseEstimate, FoodEstimate};
pub use services::{exercise_entry_from_estimate, food_entry_from_estimate, NutritionEstimator};
