use serde::{Deserialize, Serialize};

/// Biological sex, as far as the BMR formula cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Unspecified => "Not specified",
        }
    }
}

impl From<&str> for Sex {
    fn from(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "male" => Sex::Male,
            "female" => Sex::Female,
            _ => Sex::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Light",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::VeryActive => "Very Active",
        }
    }

    /// TDEE multiplier applied to the BMR.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
        }
    }
}

impl From<&str> for ActivityLevel {
    fn from(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "veryactive" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FitnessGoal {
    LoseWeight,
    #[default]
    Maintain,
    GainMuscle,
}

impl FitnessGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "Lose Weight",
            FitnessGoal::Maintain => "Maintain",
            FitnessGoal::GainMuscle => "Gain Muscle",
        }
    }

    /// Daily calorie offset applied on top of the TDEE.
    pub fn calorie_offset(self) -> f64 {
        match self {
            FitnessGoal::LoseWeight => -500.0,
            FitnessGoal::Maintain => 0.0,
            FitnessGoal::GainMuscle => 300.0,
        }
    }
}

impl From<&str> for FitnessGoal {
    fn from(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "loseweight" => FitnessGoal::LoseWeight,
            "gainmuscle" => FitnessGoal::GainMuscle,
            _ => FitnessGoal::Maintain,
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(raw: String) -> Self {
                <$ty>::from(raw.as_str())
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(Sex, ActivityLevel, FitnessGoal);

// "Very Active", "very_active" and "VeryActive" all compare equal.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Daily targets derived from the biometric profile.
///
/// Stored flat inside the profile snapshot (`dailyCalorieGoal`, `proteinGoal`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionGoals {
    #[serde(rename = "dailyCalorieGoal")]
    pub daily_calorie_goal: u32,
    #[serde(rename = "proteinGoal")]
    pub protein_goal_g: u32,
    #[serde(rename = "carbsGoal")]
    pub carbs_goal_g: u32,
    #[serde(rename = "fatGoal")]
    pub fat_goal_g: u32,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            daily_calorie_goal: 2000,
            protein_goal_g: 150,
            carbs_goal_g: 200,
            fat_goal_g: 67,
        }
    }
}

/// User biometrics and preferences. A biometric of 0 means "unset".
///
/// Serialized in the web client's `cp_profile` shape, so snapshots it saved load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    #[serde(rename = "height")]
    pub height_cm: f64,
    #[serde(rename = "age")]
    pub age_years: f64,
    #[serde(rename = "gender")]
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
    #[serde(flatten)]
    pub goals: NutritionGoals,
    pub onboarding_complete: bool,
    pub connected_services: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Guest User".into(),
            email: "guest@example.com".into(),
            weight_kg: 0.0,
            height_cm: 0.0,
            age_years: 0.0,
            sex: Sex::Unspecified,
            activity_level: ActivityLevel::Moderate,
            fitness_goal: FitnessGoal::Maintain,
            goals: NutritionGoals::default(),
            onboarding_complete: false,
            connected_services: Vec::new(),
        }
    }
}

impl UserProfile {
    /// True when weight, height and age are all set to positive values.
    pub fn has_biometrics(&self) -> bool {
        [self.weight_kg, self.height_cm, self.age_years]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_labels_leniently() {
        assert_eq!(ActivityLevel::from("Very Active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from("VeryActive"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from("light"), ActivityLevel::Light);
        assert_eq!(ActivityLevel::from("Extreme"), ActivityLevel::Moderate);

        assert_eq!(Sex::from("Female"), Sex::Female);
        assert_eq!(Sex::from("Not specified"), Sex::Unspecified);
        assert_eq!(Sex::from(""), Sex::Unspecified);

        assert_eq!(FitnessGoal::from("Lose Weight"), FitnessGoal::LoseWeight);
        assert_eq!(FitnessGoal::from("gain_muscle"), FitnessGoal::GainMuscle);
        assert_eq!(FitnessGoal::from("Bulk"), FitnessGoal::Maintain);
    }

    #[test]
    fn web_client_snapshot_deserializes() {
        let json = r#"{
            "name": "Ana",
            "email": "ana@example.com",
            "weight": 60,
            "height": 165,
            "age": 30,
            "gender": "Female",
            "activityLevel": "Very Active",
            "fitnessGoal": "Lose Weight",
            "dailyCalorieGoal": 1800,
            "proteinGoal": 135,
            "carbsGoal": 180,
            "fatGoal": 60,
            "onboardingComplete": true,
            "connectedServices": ["garmin", "polar"]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.weight_kg, 60.0);
        assert_eq!(profile.height_cm, 165.0);
        assert_eq!(profile.age_years, 30.0);
        assert_eq!(profile.sex, Sex::Female);
        assert_eq!(profile.activity_level, ActivityLevel::VeryActive);
        assert_eq!(profile.fitness_goal, FitnessGoal::LoseWeight);
        assert_eq!(
            profile.goals,
            NutritionGoals {
                daily_calorie_goal: 1800,
                protein_goal_g: 135,
                carbs_goal_g: 180,
                fat_goal_g: 60,
            }
        );
        assert!(profile.onboarding_complete);
        assert_eq!(profile.connected_services, vec!["garmin", "polar"]);
    }

    #[test]
    fn partial_snapshot_falls_back_to_defaults() {
        let json = r#"{"name": "Ana", "gender": "Other", "activityLevel": "Couch", "proteinGoal": 90}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.sex, Sex::Unspecified);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert_eq!(profile.email, "guest@example.com");
        assert_eq!(profile.goals.protein_goal_g, 90);
        assert_eq!(profile.goals.daily_calorie_goal, 2000);
        assert!(!profile.has_biometrics());
    }

    #[test]
    fn serializes_in_web_client_shape() {
        let json = serde_json::to_value(UserProfile::default()).unwrap();
        assert_eq!(json["gender"], "Not specified");
        assert_eq!(json["activityLevel"], "Moderate");
        assert_eq!(json["dailyCalorieGoal"], 2000);
        assert_eq!(json["fatGoal"], 67);
        assert_eq!(json["onboardingComplete"], false);
        assert!(json.get("goals").is_none());

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, UserProfile::default());
    }

    #[test]
    fn enums_serialize_as_display_labels() {
        let json = serde_json::to_string(&ActivityLevel::VeryActive).unwrap();
        assert_eq!(json, "\"Very Active\"");
        assert_eq!(Sex::Unspecified.to_string(), "Not specified");
    }

    #[test]
    fn default_profile_has_no_biometrics() {
        let profile = UserProfile::default();
        assert!(!profile.has_biometrics());
        assert_eq!(profile.goals.daily_calorie_goal, 2000);
        assert_eq!(profile.goals.fat_goal_g, 67);
    }
}
