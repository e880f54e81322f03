use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::dto::{ActivityLevel, FitnessGoal, NutritionGoals, Sex, UserProfile};
use crate::error::CoreError;

/// No recommendation ever goes below this many kcal per day.
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

const PROTEIN_SHARE: f64 = 0.30;
const CARBS_SHARE: f64 = 0.40;
const FAT_SHARE: f64 = 0.30;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Mifflin-St Jeor basal metabolic rate. `Unspecified` uses the midpoint of the two sex offsets.
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age_years: f64, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    let sex_offset = match sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
        Sex::Unspecified => -78.0,
    };
    base + sex_offset
}

/// Body mass index rounded to one decimal, or `None` while weight or height is unset.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.0 && height_cm.is_finite() && height_cm > 0.0) {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

/// Computes daily calorie and macro targets.
///
/// Weight, height and age must be finite and strictly positive, otherwise
/// [`CoreError::InvalidInput`] is returned. The calorie target is rounded and
/// floored at [`MIN_DAILY_CALORIES`]; each macro is rounded independently, so
/// the grams do not necessarily add back up to the calorie target.
pub fn compute_goals(
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    sex: Sex,
    activity_level: ActivityLevel,
    fitness_goal: FitnessGoal,
) -> Result<NutritionGoals, CoreError> {
    ensure_positive("weight_kg", weight_kg)?;
    ensure_positive("height_cm", height_cm)?;
    ensure_positive("age_years", age_years)?;

    let bmr = basal_metabolic_rate(weight_kg, height_cm, age_years, sex);
    let tdee = bmr * activity_level.multiplier();
    let target = tdee + fitness_goal.calorie_offset();
    let calories = target.round().max(MIN_DAILY_CALORIES);
    if calories > f64::from(u32::MAX) {
        return Err(CoreError::InvalidInput {
            field: "daily_calorie_goal",
            value: calories,
        });
    }

    let goals = NutritionGoals {
        daily_calorie_goal: calories as u32,
        protein_goal_g: (calories * PROTEIN_SHARE / KCAL_PER_G_PROTEIN).round() as u32,
        carbs_goal_g: (calories * CARBS_SHARE / KCAL_PER_G_CARBS).round() as u32,
        fat_goal_g: (calories * FAT_SHARE / KCAL_PER_G_FAT).round() as u32,
    };
    debug!(bmr, tdee, calories = goals.daily_calorie_goal, "computed nutrition goals");
    Ok(goals)
}

/// Recomputes the profile's goals when its biometrics are complete.
///
/// Returns `false` and leaves the goals untouched while any biometric is unset.
pub fn apply_goals(profile: &mut UserProfile) -> Result<bool, CoreError> {
    if !profile.has_biometrics() {
        debug!("biometrics incomplete; goal computation deferred");
        return Ok(false);
    }
    profile.goals = compute_goals(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.sex,
        profile.activity_level,
        profile.fitness_goal,
    )?;
    Ok(true)
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidInput { field, value })
    }
}
