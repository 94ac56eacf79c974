/// Types for students and their class sessions
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{ConflictError, ValidationError};
use super::time::ClockTime;

/// Day of the week a class meets on, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter label used for table headers (e.g. "Mon").
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_ascii_lowercase();
                wanted == name || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| ValidationError::UnknownDay {
                value: s.trim().to_string(),
            })
    }
}

/// A single scheduled class session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub code: String,
    pub day: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ClassEntry {
    pub fn new(code: impl Into<String>, day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self {
            code: code.into(),
            day,
            start,
            end,
        }
    }

    /// Length of the session in minutes (0 when the range is inverted).
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// True if both entries fall on the same day and their `[start, end)`
    /// ranges intersect.
    pub fn overlaps(&self, other: &ClassEntry) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// A student and the classes they are enrolled in, in insertion order.
///
/// Serialize only: classes go in through `add_class`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub name: String,
    pub id: String,
    enrolled_classes: Vec<ClassEntry>,
}

impl Student {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        let student = Self {
            name: name.into(),
            id: id.into(),
            enrolled_classes: Vec::new(),
        };
        info!(student = %student.id, name = %student.name, "Created student");
        student
    }

    pub fn enrolled_classes(&self) -> &[ClassEntry] {
        &self.enrolled_classes
    }

    /// Appends a class if its range is valid and it doesn't clash with any
    /// existing class on the same day. Nothing changes on rejection.
    pub fn add_class(&mut self, entry: ClassEntry) -> Result<(), ConflictError> {
        debug!(
            student = %self.id,
            code = %entry.code,
            day = %entry.day,
            start = %entry.start,
            end = %entry.end,
            "Attempting to add class"
        );

        if entry.end <= entry.start {
            return Err(ConflictError::InvalidRange { code: entry.code });
        }

        if let Some(existing) = self.enrolled_classes.iter().find(|c| c.overlaps(&entry)) {
            return Err(ConflictError::Overlap {
                code: existing.code.clone(),
                day: existing.day,
            });
        }

        info!(student = %self.id, code = %entry.code, day = %entry.day, "Added class");
        self.enrolled_classes.push(entry);
        Ok(())
    }

    /// Removes and returns the class at `index`, or `None` if out of bounds.
    pub fn remove_class(&mut self, index: usize) -> Option<ClassEntry> {
        if index >= self.enrolled_classes.len() {
            return None;
        }
        let removed = self.enrolled_classes.remove(index);
        info!(student = %self.id, code = %removed.code, day = %removed.day, "Removed class");
        Some(removed)
    }

    /// Replaces the class at `index` with `entry`.
    ///
    /// The replacement is checked against every other class; on failure the
    /// original is put back at `index` and the schedule is unchanged.
    /// Returns `Ok(None)` if `index` is out of bounds.
    pub fn update_class(
        &mut self,
        index: usize,
        entry: ClassEntry,
    ) -> Result<Option<ClassEntry>, ConflictError> {
        self.update_batch(index, vec![entry])
    }

    /// Adds every entry or none of them.
    pub fn add_batch(&mut self, entries: Vec<ClassEntry>) -> Result<(), ConflictError> {
        let checkpoint = self.enrolled_classes.len();
        for entry in entries {
            if let Err(e) = self.add_class(entry) {
                // Only appends happened since the checkpoint.
                self.enrolled_classes.truncate(checkpoint);
                info!(student = %self.id, error = %e, "Rolled back class batch");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Replaces the class at `index` with a batch of entries, atomically.
    ///
    /// On success the new entries are appended and the old entry is returned.
    /// On failure the old entry is restored at `index`. Returns `Ok(None)`
    /// without touching anything if `index` is out of bounds.
    pub fn update_batch(
        &mut self,
        index: usize,
        entries: Vec<ClassEntry>,
    ) -> Result<Option<ClassEntry>, ConflictError> {
        if index >= self.enrolled_classes.len() {
            return Ok(None);
        }

        let original = self.enrolled_classes.remove(index);
        match self.add_batch(entries) {
            Ok(()) => {
                info!(student = %self.id, code = %original.code, "Updated class");
                Ok(Some(original))
            }
            Err(e) => {
                self.enrolled_classes.insert(index, original);
                info!(student = %self.id, error = %e, "Update failed, restored original class");
                Err(e)
            }
        }
    }

    /// Drops every enrolled class and returns how many there were.
    pub fn reset_classes(&mut self) -> usize {
        let count = self.enrolled_classes.len();
        self.enrolled_classes.clear();
        info!(student = %self.id, count, "Reset all classes");
        count
    }
}
