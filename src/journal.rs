use anyhow::Context;
use bytes::Bytes;
use rand::Rng;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, instrument, warn};

use crate::error::CoreError;
use crate::estimation::{
    exercise_entry_from_estimate, food_entry_from_estimate, NutritionEstimator,
};
use crate::logs::services::sync_source_label;
use crate::logs::{
    frequency_ranking, macro_percent, progress_percent, remaining_calories, DailyTotals, DayGroup,
    FoodFrequency, LogAggregator, LogEntry, MealCategory, RollupStats,
};
use crate::profile::services::is_valid_email;
use crate::profile::{apply_goals, compute_goals, NutritionGoals, UserProfile};
use crate::state::AppState;

pub const PROFILE_KEY: &str = "cp_profile";
pub const LOGS_KEY: &str = "cp_logs";

const SYNC_CALORIES_MIN: u32 = 150;
const SYNC_CALORIES_MAX: u32 = 350;

/// What the dashboard shows for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardView {
    pub date: Date,
    pub goals: NutritionGoals,
    pub totals: DailyTotals,
    pub remaining: f64,
    pub percent: f64,
    pub protein_percent: f64,
    pub carbs_percent: f64,
    pub fat_percent: f64,
}

/// What the history screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView<'a> {
    pub stats: RollupStats,
    pub top_foods: Vec<FoodFrequency>,
    pub streak: u32,
    pub days: Vec<DayGroup<'a>>,
}

/// The caller-owned profile and log collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journal {
    profile: UserProfile,
    entries: Vec<LogEntry>,
}

impl Journal {
    pub fn new(profile: UserProfile, entries: Vec<LogEntry>) -> Self {
        Self { profile, entries }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Restores the journal from the store; missing keys yield defaults.
    #[instrument(skip(state))]
    pub async fn load(state: &AppState) -> anyhow::Result<Self> {
        let profile = match state.storage.get(PROFILE_KEY).await? {
            Some(raw) => serde_json::from_slice(&raw).context("decode stored profile")?,
            None => UserProfile::default(),
        };
        let entries: Vec<LogEntry> = match state.storage.get(LOGS_KEY).await? {
            Some(raw) => serde_json::from_slice(&raw).context("decode stored logs")?,
            None => Vec::new(),
        };
        debug!(entries = entries.len(), "journal loaded");
        Ok(Self { profile, entries })
    }

    #[instrument(skip(self, state))]
    pub async fn save(&self, state: &AppState) -> anyhow::Result<()> {
        let profile = serde_json::to_vec(&self.profile).context("encode profile")?;
        let entries = serde_json::to_vec(&self.entries).context("encode logs")?;
        state.storage.put(PROFILE_KEY, Bytes::from(profile)).await?;
        state.storage.put(LOGS_KEY, Bytes::from(entries)).await?;
        debug!(entries = self.entries.len(), "journal saved");
        Ok(())
    }

    /// Forgets everything (sign out): deletes both snapshots and resets to defaults.
    #[instrument(skip(self, state))]
    pub async fn reset(&mut self, state: &AppState) -> anyhow::Result<()> {
        state.storage.delete(PROFILE_KEY).await?;
        state.storage.delete(LOGS_KEY).await?;
        *self = Self::default();
        info!("journal reset");
        Ok(())
    }

    /// Replaces the profile and recomputes goals when its biometrics are complete.
    ///
    /// Returns whether the goals were recomputed.
    pub fn update_profile(&mut self, mut profile: UserProfile) -> Result<bool, CoreError> {
        if !is_valid_email(&profile.email) {
            warn!(email = %profile.email, "invalid email");
            return Err(CoreError::InvalidEmail(profile.email));
        }
        let recomputed = apply_goals(&mut profile)?;
        self.profile = profile;
        Ok(recomputed)
    }

    /// Finishes onboarding. Unlike [`Journal::update_profile`], unset biometrics are an error.
    pub fn complete_onboarding(&mut self, mut profile: UserProfile) -> Result<(), CoreError> {
        if !is_valid_email(&profile.email) {
            return Err(CoreError::InvalidEmail(profile.email));
        }
        profile.goals = compute_goals(
            profile.weight_kg,
            profile.height_cm,
            profile.age_years,
            profile.sex,
            profile.activity_level,
            profile.fitness_goal,
        )?;
        profile.onboarding_complete = true;
        info!(calories = profile.goals.daily_calorie_goal, "onboarding complete");
        self.profile = profile;
        Ok(())
    }

    pub fn add_entry(&mut self, entry: LogEntry) -> Result<(), CoreError> {
        if self.position(&entry.id).is_some() {
            return Err(CoreError::DuplicateEntry(entry.id));
        }
        debug!(id = %entry.id, kind = ?entry.kind, calories = entry.calories, "entry added");
        self.entries.push(entry);
        Ok(())
    }

    /// Swaps in a corrected entry with the same id, keeping its position. Returns the old one.
    pub fn replace_entry(&mut self, entry: LogEntry) -> Result<LogEntry, CoreError> {
        let index = self
            .position(&entry.id)
            .ok_or_else(|| CoreError::UnknownEntry(entry.id.clone()))?;
        Ok(std::mem::replace(&mut self.entries[index], entry))
    }

    pub fn remove_entry(&mut self, id: &str) -> Result<LogEntry, CoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::UnknownEntry(id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    /// Adds today's synthetic entry for the connected services, at most once per day and service set.
    pub fn sync_connected_services<R: Rng>(
        &mut self,
        aggregator: &LogAggregator,
        today: Date,
        rng: &mut R,
    ) -> Option<&LogEntry> {
        let services = &self.profile.connected_services;
        if services.is_empty() {
            return None;
        }
        let label = sync_source_label(services);
        if aggregator.has_synced_for_date(&self.entries, today, &label) {
            debug!(%today, source = %label, "already synced");
            return None;
        }

        let calories = rng.gen_range(SYNC_CALORIES_MIN..=SYNC_CALORIES_MAX);
        let entry = aggregator.sync_entry(today, services, f64::from(calories));
        if let Err(e) = self.add_entry(entry) {
            warn!(error = %e, %today, "sync entry id already taken");
            return None;
        }
        info!(%today, source = %label, calories, "connected services synced");
        self.entries.last()
    }

    /// Estimates a described food and logs it. `None` when the service gives no result.
    #[instrument(skip(self, estimator, aggregator))]
    pub async fn log_food_text(
        &mut self,
        estimator: &dyn NutritionEstimator,
        aggregator: &LogAggregator,
        description: &str,
        now: OffsetDateTime,
    ) -> Option<&LogEntry> {
        if description.trim().is_empty() {
            return None;
        }
        let estimate = match estimator.estimate_food_text(description).await {
            Ok(est) => est,
            Err(e) => {
                warn!(error = %e, "food estimation failed");
                return None;
            }
        };
        let category = MealCategory::for_hour(now.to_offset(aggregator.offset()).hour());
        self.push_estimated(food_entry_from_estimate(&estimate, now, category))
    }

    #[instrument(skip(self, estimator, aggregator, jpeg))]
    pub async fn log_food_image(
        &mut self,
        estimator: &dyn NutritionEstimator,
        aggregator: &LogAggregator,
        jpeg: Bytes,
        now: OffsetDateTime,
    ) -> Option<&LogEntry> {
        let estimate = match estimator.estimate_food_image(jpeg).await {
            Ok(est) => est,
            Err(e) => {
                warn!(error = %e, "food image estimation failed");
                return None;
            }
        };
        let category = MealCategory::for_hour(now.to_offset(aggregator.offset()).hour());
        self.push_estimated(food_entry_from_estimate(&estimate, now, category))
    }

    #[instrument(skip(self, estimator))]
    pub async fn log_exercise_text(
        &mut self,
        estimator: &dyn NutritionEstimator,
        description: &str,
        now: OffsetDateTime,
    ) -> Option<&LogEntry> {
        if description.trim().is_empty() {
            return None;
        }
        let estimate = match estimator.estimate_exercise_text(description).await {
            Ok(est) => est,
            Err(e) => {
                warn!(error = %e, "exercise estimation failed");
                return None;
            }
        };
        self.push_estimated(exercise_entry_from_estimate(&estimate, now))
    }

    pub fn dashboard(&self, aggregator: &LogAggregator, today: Date) -> DashboardView {
        let goals = self.profile.goals;
        let goal = f64::from(goals.daily_calorie_goal);
        let totals = aggregator.daily_totals(&self.entries, today);
        DashboardView {
            date: today,
            goals,
            totals,
            remaining: remaining_calories(totals.net, goal),
            percent: progress_percent(totals.net, goal),
            protein_percent: macro_percent(totals.protein_g, f64::from(goals.protein_goal_g)),
            carbs_percent: macro_percent(totals.carbs_g, f64::from(goals.carbs_goal_g)),
            fat_percent: macro_percent(totals.fat_g, f64::from(goals.fat_goal_g)),
        }
    }

    pub fn history(&self, aggregator: &LogAggregator, today: Date, top_n: usize) -> HistoryView<'_> {
        HistoryView {
            stats: aggregator.rollup_stats(&self.entries),
            top_foods: frequency_ranking(&self.entries, top_n),
            streak: aggregator.tracking_streak(&self.entries, today),
            days: aggregator.group_by_calendar_day(&self.entries),
        }
    }

    fn push_estimated(&mut self, entry: LogEntry) -> Option<&LogEntry> {
        // estimated entries carry fresh v4 ids
        self.add_entry(entry).ok()?;
        self.entries.last()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}
