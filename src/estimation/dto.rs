use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Nutrition estimate for a described or photographed food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEstimate {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Advisory only (0..=1); never used in calculations.
    pub confidence: f64,
}

/// Energy estimate for a described exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEstimate {
    pub activity_name: String,
    pub calories_burned: f64,
    pub duration_minutes: f64,
}

impl FoodEstimate {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("parse food estimate")
    }
}

impl ExerciseEstimate {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("parse exercise estimate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_food_payload() {
        let raw = r#"{"foodName":"Scrambled Eggs","calories":210,"protein":14,"carbs":2,"fat":16,"confidence":0.8}"#;
        let est = FoodEstimate::from_json(raw).unwrap();
        assert_eq!(est.food_name, "Scrambled Eggs");
        assert_eq!(est.calories, 210.0);
        assert_eq!(est.confidence, 0.8);
    }

    #[test]
    fn parses_service_exercise_payload() {
        let raw = r#"{"activityName":"Running","caloriesBurned":320.5,"durationMinutes":30}"#;
        let est = ExerciseEstimate::from_json(raw).unwrap();
        assert_eq!(est.activity_name, "Running");
        assert_eq!(est.calories_burned, 320.5);
    }

    #[test]
    fn incomplete_payload_is_an_error() {
        let err = FoodEstimate::from_json(r#"{"foodName":"Toast"}"#).unwrap_err();
        assert!(err.to_string().contains("parse food estimate"));
        assert!(ExerciseEstimate::from_json("not json").is_err());
    }
}
