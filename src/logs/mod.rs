pub mod dto;
pub mod services;

pub use dto::{
    DailyTotals, DayGroup, DaySummary, FoodFrequency, LogEntry, LogKind, Macros, MealCategory,
    RollupStats,
};
pub use services::{
    frequency_ranking, macro_percent, progress_percent, remaining_calories, LogAggregator,
};
