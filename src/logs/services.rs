use std::collections::{BTreeMap, BTreeSet, HashMap};

use time::{macros::time, Date, PrimitiveDateTime, UtcOffset};

use super::dto::{
    DailyTotals, DayGroup, DaySummary, FoodFrequency, LogEntry, LogKind, Macros, RollupStats,
    SYNC_MARKER,
};

/// Read-only views over a log collection, bucketed by the viewer's local calendar day.
///
/// The offset is the only state; every method takes the entries it works on and
/// leaves them untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogAggregator {
    offset: UtcOffset,
}

impl Default for LogAggregator {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl LogAggregator {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn entries_on<'a>(
        &self,
        entries: &'a [LogEntry],
        day: Date,
    ) -> impl Iterator<Item = &'a LogEntry> + 'a {
        let offset = self.offset;
        entries.iter().filter(move |e| e.local_date(offset) == day)
    }

    /// Calories in (food), out (exercise), net, and food macros for one day.
    pub fn daily_totals(&self, entries: &[LogEntry], day: Date) -> DailyTotals {
        let mut totals = DailyTotals::default();
        for entry in self.entries_on(entries, day) {
            match entry.kind {
                LogKind::Food => {
                    totals.calories_in += entry.calories;
                    totals.protein_g += entry.protein_g();
                    totals.carbs_g += entry.carbs_g();
                    totals.fat_g += entry.fat_g();
                }
                LogKind::Exercise => totals.calories_out += entry.calories,
            }
        }
        totals.net = totals.calories_in - totals.calories_out;
        totals
    }

    /// Groups entries by local day, most recent day first.
    pub fn group_by_calendar_day<'a>(&self, entries: &'a [LogEntry]) -> Vec<DayGroup<'a>> {
        let mut by_day: BTreeMap<Date, Vec<&'a LogEntry>> = BTreeMap::new();
        for entry in entries {
            by_day
                .entry(entry.local_date(self.offset))
                .or_default()
                .push(entry);
        }
        by_day
            .into_iter()
            .rev()
            .map(|(date, entries)| DayGroup {
                date,
                label: day_label(date),
                entries,
            })
            .collect()
    }

    /// One energy-balance row per day that has entries, most recent first.
    pub fn day_summaries(&self, entries: &[LogEntry]) -> Vec<DaySummary> {
        let mut by_day: BTreeMap<Date, (f64, f64)> = BTreeMap::new();
        for entry in entries {
            let (total_in, total_out) = by_day.entry(entry.local_date(self.offset)).or_default();
            match entry.kind {
                LogKind::Food => *total_in += entry.calories,
                LogKind::Exercise => *total_out += entry.calories,
            }
        }
        by_day
            .into_iter()
            .rev()
            .map(|(date, (total_in, total_out))| DaySummary {
                date,
                total_in,
                total_out,
                net: total_in - total_out,
            })
            .collect()
    }

    /// Food-only averages across the days that contain at least one food entry.
    pub fn rollup_stats(&self, entries: &[LogEntry]) -> RollupStats {
        let mut days = BTreeSet::new();
        let mut total_calories = 0.0;
        let mut total_protein = 0.0;
        let mut total_food_entries = 0;

        for entry in entries.iter().filter(|e| e.is_food()) {
            days.insert(entry.local_date(self.offset));
            total_calories += entry.calories;
            total_protein += entry.protein_g();
            total_food_entries += 1;
        }

        let divisor = days.len().max(1) as f64;
        RollupStats {
            avg_calories_per_day: (total_calories / divisor).round(),
            avg_protein_per_day: (total_protein / divisor).round(),
            total_food_entries,
            distinct_days_tracked: days.len(),
        }
    }

    /// Consecutive days with food logged, ending today (or yesterday while today is still empty).
    pub fn tracking_streak(&self, entries: &[LogEntry], today: Date) -> u32 {
        let days: BTreeSet<Date> = entries
            .iter()
            .filter(|e| e.is_food())
            .map(|e| e.local_date(self.offset))
            .collect();

        let mut cursor = if days.contains(&today) {
            Some(today)
        } else {
            today.previous_day()
        };
        let mut streak = 0;
        while let Some(day) = cursor.filter(|d| days.contains(d)) {
            streak += 1;
            cursor = day.previous_day();
        }
        streak
    }

    /// Whether the synthetic entry for `source_label` already exists on `day`.
    ///
    /// Entries carrying a `sync_source` are matched on that field. Older entries
    /// without it are matched on the marker text and the service list in
    /// parentheses, in any order.
    pub fn has_synced_for_date(&self, entries: &[LogEntry], day: Date, source_label: &str) -> bool {
        self.entries_on(entries, day)
            .filter(|e| e.is_exercise())
            .any(|e| match &e.sync_source {
                Some(source) => source == source_label,
                None => legacy_sync_label(&e.name).as_deref() == Some(source_label),
            })
    }

    /// Synthetic daily exercise entry for a set of connected services, timestamped at local noon.
    ///
    /// The id is derived from the day and the normalized label, so two service
    /// lists collide exactly when they are the same set.
    pub fn sync_entry(&self, day: Date, services: &[String], calories: f64) -> LogEntry {
        let source = sync_source_label(services);
        let noon = PrimitiveDateTime::new(day, time!(12:00)).assume_offset(self.offset);
        LogEntry::new(LogKind::Exercise, format!("{SYNC_MARKER} ({source})"), calories, noon)
            .with_id(format!("sync_{day}_{source}"))
            .with_macros(Macros {
                duration_minutes: Some(0.0),
                ..Macros::default()
            })
            .with_sync_source(source)
    }
}

/// Label identifying a connected-service set, e.g. `"garmin, polar"`. Sorted and deduplicated.
pub fn sync_source_label<S: AsRef<str>>(services: &[S]) -> String {
    let set: BTreeSet<&str> = services.iter().map(|s| s.as_ref()).collect();
    set.into_iter().collect::<Vec<_>>().join(", ")
}

// "Synced Daily Steps (polar, garmin)" -> "garmin, polar"
fn legacy_sync_label(name: &str) -> Option<String> {
    let rest = name.strip_prefix(SYNC_MARKER)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    let services: Vec<&str> = inner.split(',').map(str::trim).collect();
    Some(sync_source_label(&services))
}

/// Share of the daily goal consumed, clamped to 0..=100. A non-positive goal yields 0.
pub fn progress_percent(net: f64, daily_calorie_goal: f64) -> f64 {
    if daily_calorie_goal.is_nan() || daily_calorie_goal <= 0.0 {
        return 0.0;
    }
    let percent = (net / daily_calorie_goal * 100.0).clamp(0.0, 100.0);
    if percent.is_nan() {
        0.0
    } else {
        percent
    }
}

/// Whole-number share of a macro goal consumed. Not clamped, so overshoot reads above 100.
pub fn macro_percent(consumed_g: f64, goal_g: f64) -> f64 {
    if goal_g.is_nan() || goal_g <= 0.0 {
        return 0.0;
    }
    let percent = (consumed_g / goal_g * 100.0).round();
    if percent.is_nan() {
        0.0
    } else {
        percent
    }
}

pub fn remaining_calories(net: f64, daily_calorie_goal: f64) -> f64 {
    daily_calorie_goal - net
}

/// Most frequently logged food names, exact match, ties in first-seen order.
pub fn frequency_ranking(entries: &[LogEntry], top_n: usize) -> Vec<FoodFrequency> {
    let mut ranking: Vec<FoodFrequency> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| e.is_food()) {
        match index.get(entry.name.as_str()) {
            Some(&i) => ranking[i].count += 1,
            None => {
                index.insert(entry.name.as_str(), ranking.len());
                ranking.push(FoodFrequency {
                    name: entry.name.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so equal counts keep first-occurrence order
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking.truncate(top_n);
    ranking
}

/// e.g. "Monday, January 15, 2024"
pub fn day_label(date: Date) -> String {
    format!(
        "{}, {} {}, {}",
        date.weekday(),
        date.month(),
        date.day(),
        date.year()
    )
}
