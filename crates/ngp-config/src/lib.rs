//! Configuration and roster loading for the NodeGo pinger.

pub mod config;
pub mod roster;

pub use config::{ApiSection, AppConfig, FilesSection, ScheduleSection};
pub use roster::{load_roster, pair_roster, read_lines};
