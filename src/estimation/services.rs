use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;

use super::dto::{ExerciseEstimate, FoodEstimate};
use crate::logs::{LogEntry, LogKind, Macros, MealCategory};

/// External nutrition estimation service. Any error means "no result".
#[async_trait]
pub trait NutritionEstimator: Send + Sync {
    async fn estimate_food_text(&self, description: &str) -> anyhow::Result<FoodEstimate>;
    async fn estimate_food_image(&self, jpeg: Bytes) -> anyhow::Result<FoodEstimate>;
    async fn estimate_exercise_text(&self, description: &str) -> anyhow::Result<ExerciseEstimate>;
}

pub fn food_entry_from_estimate(
    estimate: &FoodEstimate,
    timestamp: OffsetDateTime,
    category: MealCategory,
) -> LogEntry {
    LogEntry::new(LogKind::Food, estimate.food_name.clone(), estimate.calories, timestamp)
        .with_meal_category(category)
        .with_macros(Macros {
            protein_g: Some(estimate.protein.max(0.0)),
            carbs_g: Some(estimate.carbs.max(0.0)),
            fat_g: Some(estimate.fat.max(0.0)),
            duration_minutes: None,
        })
}

pub fn exercise_entry_from_estimate(estimate: &ExerciseEstimate, timestamp: OffsetDateTime) -> LogEntry {
    LogEntry::new(
        LogKind::Exercise,
        estimate.activity_name.clone(),
        estimate.calories_burned,
        timestamp,
    )
    .with_macros(Macros {
        duration_minutes: Some(estimate.duration_minutes.max(0.0)),
        ..Macros::default()
    })
}
