use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub utc_offset: UtcOffset,
    pub top_foods: usize,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            utc_offset: UtcOffset::UTC,
            top_foods: 3,
            log_format: LogFormat::Plain,
            log_filter: "calorie_profile=debug".into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("CP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let utc_offset = match lookup("CP_UTC_OFFSET_MINUTES") {
            Some(raw) => parse_offset_minutes(&raw)?,
            None => defaults.utc_offset,
        };

        let top_foods = lookup("CP_TOP_FOODS")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.top_foods);

        let log_format = lookup("LOG_FORMAT")
            .map(|v| {
                if v == "json" {
                    LogFormat::Json
                } else {
                    LogFormat::Plain
                }
            })
            .unwrap_or(defaults.log_format);

        let log_filter = lookup("RUST_LOG").unwrap_or(defaults.log_filter);

        Ok(Self {
            data_dir,
            utc_offset,
            top_foods,
            log_format,
            log_filter,
        })
    }
}

fn parse_offset_minutes(raw: &str) -> anyhow::Result<UtcOffset> {
    let minutes: i32 = raw
        .trim()
        .parse()
        .with_context(|| format!("CP_UTC_OFFSET_MINUTES is not an integer: {raw}"))?;
    let seconds = minutes
        .checked_mul(60)
        .with_context(|| format!("CP_UTC_OFFSET_MINUTES out of range: {raw}"))?;
    UtcOffset::from_whole_seconds(seconds)
        .with_context(|| format!("CP_UTC_OFFSET_MINUTES out of range: {raw}"))
}
