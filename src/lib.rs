//! Daily nutrition goals and food/exercise log rollups.
//!
//! [`profile`] turns biometrics into calorie and macro targets, [`logs`] aggregates
//! a log collection into daily and historical views. Both are pure; [`journal`],
//! [`storage`] and [`estimation`] are the caller-side plumbing around them.

pub mod config;
pub mod error;
pub mod estimation;
pub mod journal;
pub mod logs;
pub mod profile;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use error::CoreError;
pub use journal::Journal;
pub use logs::LogAggregator;
pub use profile::compute_goals;
