use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// Marker embedded in the name of synthetic connected-service entries.
pub const SYNC_MARKER: &str = "Synced Daily Steps";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Food,
    Exercise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealCategory {
    /// Suggested category for a meal logged at the given local hour (0-23).
    pub fn for_hour(hour: u8) -> Self {
        match hour {
            0..=10 => MealCategory::Breakfast,
            11..=14 => MealCategory::Lunch,
            15..=17 => MealCategory::Snack,
            _ => MealCategory::Dinner,
        }
    }
}

/// Optional detail fields. Protein/carbs/fat apply to food, duration to exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Macros {
    #[serde(rename = "protein", skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(rename = "carbs", skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(rename = "fat", skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

/// One food or exercise event. Never mutated once created; corrections replace it.
///
/// Field names follow the web client's `cp_logs` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub name: String,
    /// Consumed for food, expended for exercise. Always a non-negative magnitude.
    pub calories: f64,
    #[serde(with = "timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(rename = "mealType", default, skip_serializing_if = "Option::is_none")]
    pub meal_category: Option<MealCategory>,
    #[serde(rename = "details", default, skip_serializing_if = "Option::is_none")]
    pub macros: Option<Macros>,
    /// Connected-service set that produced a synthetic entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_source: Option<String>,
}

/// RFC 3339 on write; on read also accepts the web client's Unix milliseconds.
mod timestamp {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
                .map_err(de::Error::custom),
            Raw::Text(text) => OffsetDateTime::parse(&text, &Rfc3339).map_err(de::Error::custom),
        }
    }
}

impl LogEntry {
    /// New entry with a random id. Negative or NaN calories are stored as 0.
    pub fn new(kind: LogKind, name: impl Into<String>, calories: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            name: name.into(),
            calories: calories.max(0.0),
            timestamp,
            meal_category: None,
            macros: None,
            sync_source: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_meal_category(mut self, category: MealCategory) -> Self {
        self.meal_category = Some(category);
        self
    }

    pub fn with_macros(mut self, macros: Macros) -> Self {
        self.macros = Some(macros);
        self
    }

    pub fn with_sync_source(mut self, source: impl Into<String>) -> Self {
        self.sync_source = Some(source.into());
        self
    }

    pub fn is_food(&self) -> bool {
        self.kind == LogKind::Food
    }

    pub fn is_exercise(&self) -> bool {
        self.kind == LogKind::Exercise
    }

    /// Calendar date of the event in the viewer's zone.
    pub fn local_date(&self, offset: UtcOffset) -> Date {
        self.timestamp.to_offset(offset).date()
    }

    pub fn protein_g(&self) -> f64 {
        self.macro_or_zero(|m| m.protein_g)
    }

    pub fn carbs_g(&self) -> f64 {
        self.macro_or_zero(|m| m.carbs_g)
    }

    pub fn fat_g(&self) -> f64 {
        self.macro_or_zero(|m| m.fat_g)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.macro_or_zero(|m| m.duration_minutes)
    }

    fn macro_or_zero(&self, field: impl Fn(&Macros) -> Option<f64>) -> f64 {
        self.macros.as_ref().and_then(field).unwrap_or(0.0)
    }
}

/// Energy and macro totals for one local day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub calories_in: f64,
    pub calories_out: f64,
    pub net: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Per-day energy balance, used by history charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: Date,
    pub total_in: f64,
    pub total_out: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RollupStats {
    pub avg_calories_per_day: f64,
    pub avg_protein_per_day: f64,
    pub total_food_entries: usize,
    pub distinct_days_tracked: usize,
}

/// Entries of a single local day, in their original relative order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    pub date: Date,
    pub label: String,
    pub entries: Vec<&'a LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodFrequency {
    pub name: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn missing_macros_default_to_zero() {
        let entry = LogEntry::new(LogKind::Food, "Toast", 120.0, datetime!(2024-03-01 08:00 UTC));
        assert_eq!(entry.protein_g(), 0.0);
        assert_eq!(entry.duration_minutes(), 0.0);

        let partial = entry.with_macros(Macros {
            protein_g: Some(4.0),
            ..Macros::default()
        });
        assert_eq!(partial.protein_g(), 4.0);
        assert_eq!(partial.fat_g(), 0.0);
    }

    #[test]
    fn negative_calories_are_stored_as_zero() {
        let entry = LogEntry::new(LogKind::Exercise, "Walk", -40.0, datetime!(2024-03-01 08:00 UTC));
        assert_eq!(entry.calories, 0.0);
        let nan = LogEntry::new(LogKind::Exercise, "Walk", f64::NAN, datetime!(2024-03-01 08:00 UTC));
        assert_eq!(nan.calories, 0.0);
    }

    #[test]
    fn local_date_uses_viewer_offset() {
        let entry = LogEntry::new(LogKind::Food, "Late snack", 200.0, datetime!(2024-03-02 03:30 UTC));
        assert_eq!(entry.local_date(offset!(UTC)), date!(2024-03-02));
        assert_eq!(entry.local_date(offset!(-5)), date!(2024-03-01));
    }

    #[test]
    fn meal_category_by_hour() {
        assert_eq!(MealCategory::for_hour(7), MealCategory::Breakfast);
        assert_eq!(MealCategory::for_hour(11), MealCategory::Lunch);
        assert_eq!(MealCategory::for_hour(16), MealCategory::Snack);
        assert_eq!(MealCategory::for_hour(18), MealCategory::Dinner);
        assert_eq!(MealCategory::for_hour(23), MealCategory::Dinner);
    }

    #[test]
    fn entry_json_shape() {
        let entry = LogEntry::new(LogKind::Food, "Eggs", 140.0, datetime!(2024-03-01 08:00 UTC))
            .with_id("e1")
            .with_meal_category(MealCategory::Breakfast);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "FOOD");
        assert_eq!(json["mealType"], "Breakfast");
        assert_eq!(json["timestamp"], "2024-03-01T08:00:00Z");
        assert!(json.get("details").is_none());
        assert!(json.get("syncSource").is_none());

        let back: LogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn web_client_entries_deserialize() {
        let json = r#"[
            {"id": "1715328000000", "type": "FOOD", "name": "Oatmeal", "calories": 320,
             "timestamp": 1715328000000, "mealType": "Breakfast",
             "details": {"protein": 12, "carbs": 54, "fat": 6}},
            {"id": "sync_2024-05-10", "type": "EXERCISE", "name": "Synced Daily Steps (garmin)",
             "calories": 212, "timestamp": 1715342400000, "details": {"durationMinutes": 0}}
        ]"#;
        let entries: Vec<LogEntry> = serde_json::from_str(json).unwrap();

        let oats = &entries[0];
        assert_eq!(oats.kind, LogKind::Food);
        assert_eq!(oats.timestamp, datetime!(2024-05-10 08:00 UTC));
        assert_eq!(oats.meal_category, Some(MealCategory::Breakfast));
        assert_eq!(oats.protein_g(), 12.0);
        assert_eq!(oats.carbs_g(), 54.0);
        assert_eq!(oats.duration_minutes(), 0.0);

        let sync = &entries[1];
        assert!(sync.is_exercise());
        assert_eq!(sync.timestamp, datetime!(2024-05-10 12:00 UTC));
        assert_eq!(sync.sync_source, None);
    }

    #[test]
    fn timestamp_rejects_other_types() {
        let json = r#"{"id": "x", "type": "FOOD", "name": "Tea", "calories": 0, "timestamp": true}"#;
        assert!(serde_json::from_str::<LogEntry>(json).is_err());
        let json = r#"{"id": "x", "type": "FOOD", "name": "Tea", "calories": 0, "timestamp": "yesterday"}"#;
        assert!(serde_json::from_str::<LogEntry>(json).is_err());
    }
}
