/// Configuration for the schedule book and its views
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::time::{time_options, ClockTime};

/// Colors handed out to class codes in the timetable, in order.
pub const DEFAULT_PALETTE: [&str; 12] = [
    "#A6CEE3", "#1F78B4", "#B2DF8A", "#33A02C", "#FB9A99", "#E31A1C", "#FDBF6F", "#FF7F00",
    "#CAB2D6", "#6A3D9A", "#FFFF99", "#B15928",
];

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Timetable colors, assigned to codes by first appearance
    pub palette: Vec<String>,
    /// Range and step of the start/end time choices
    pub time_options: TimeOptionsConfig,
    /// How long a two-click confirmation stays armed
    pub confirm_timeout_secs: u64,
    /// Classes starting before this are flagged as early
    pub early_threshold: ClockTime,
    /// Classes ending after this are flagged as late
    pub late_threshold: ClockTime,
    /// Students created when the book starts
    pub initial_students: Vec<StudentSeed>,
}

/// Range of times offered for class start/end selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOptionsConfig {
    pub first: ClockTime,
    pub last: ClockTime,
    pub step_minutes: u16,
}

/// A student to create at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSeed {
    pub name: String,
    pub id: String,
}

impl ScheduleConfig {
    /// Loads a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON config file
    ///
    /// # Returns
    /// * `Ok(ScheduleConfig)` - Parsed configuration
    /// * `Err` - If the file can't be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config: ScheduleConfig = serde_json::from_str(content)?;
        if config.palette.is_empty() {
            config.palette = default_palette();
        }
        Ok(config)
    }

    /// The start/end time choices described by `time_options`
    pub fn time_choices(&self) -> Vec<ClockTime> {
        let opts = &self.time_options;
        time_options(opts.first, opts.last, opts.step_minutes)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

impl Default for TimeOptionsConfig {
    fn default() -> Self {
        Self {
            first: ClockTime::from_hm(3, 0).unwrap_or_default(),
            last: ClockTime::from_hm(23, 45).unwrap_or_default(),
            step_minutes: 15,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            time_options: TimeOptionsConfig::default(),
            confirm_timeout_secs: 5,
            early_threshold: ClockTime::from_hm(9, 0).unwrap_or_default(),
            late_threshold: ClockTime::from_hm(17, 0).unwrap_or_default(),
            initial_students: vec![StudentSeed {
                name: "Timmy".to_string(),
                id: "001".to_string(),
            }],
        }
    }
}
