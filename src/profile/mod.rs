pub mod dto;
pub mod services;
pub mod units;

pub use dto::{ActivityLevel, FitnessGoal, NutritionGoals, Sex, UserProfile};
pub use services::{apply_goals, body_mass_index, compute_goals};
