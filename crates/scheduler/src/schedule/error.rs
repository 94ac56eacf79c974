//! Error types for the schedule model.

use thiserror::Error;

use super::types::Weekday;

/// Problems with user input, detected before any mutation happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The class code field was empty
    #[error("Class code is required.")]
    MissingCode,

    /// No day checkbox was selected
    #[error("Select at least one day.")]
    NoDaySelected,

    /// Start or end time was left empty
    #[error("Both start time and end time are required.")]
    MissingTime,

    /// A time string was not in `HH:MM` form
    #[error("Invalid time \"{value}\", expected HH:MM.")]
    MalformedTime { value: String },

    /// A day string did not name a weekday
    #[error("Unknown day \"{value}\".")]
    UnknownDay { value: String },

    /// The form's end time does not come after its start time
    #[error("End time must be after start time.")]
    EndNotAfterStart,

    /// The student name field was empty
    #[error("Student name is required.")]
    MissingStudentName,

    /// The student ID field was empty
    #[error("Student ID is required.")]
    MissingStudentId,

    /// Another student already uses this ID
    #[error("A student with ID {id} already exists.")]
    DuplicateStudentId { id: String },
}

/// Every validation problem found on a single form, in the order checked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }
}

/// A class entry that cannot be placed on a student's schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// The entry ends at or before the time it starts
    #[error("End time must be after start time for {code}.")]
    InvalidRange { code: String },

    /// The entry overlaps an existing entry on the same day
    #[error("Time conflict with {code} on {day}.")]
    Overlap { code: String, day: Weekday },
}

/// Errors returned by `ScheduleBook` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A single field or student check failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A submitted form had one or more problems
    #[error(transparent)]
    InvalidForm(#[from] ValidationErrors),

    /// The entry (or one entry of a batch) was rejected
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// No student has the given ID
    #[error("No student with ID {id}.")]
    StudentNotFound { id: String },

    /// An operation needed the current student but none is selected
    #[error("No student selected.")]
    NoStudentSelected,

    /// A class index did not point at an enrolled class
    #[error("Class index {index} is out of bounds ({len} classes enrolled).")]
    ClassIndexOutOfBounds { index: usize, len: usize },
}

impl ScheduleError {
    /// Returns true if this error came from user input checks.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScheduleError::Validation(_) | ScheduleError::InvalidForm(_)
        )
    }

    /// Returns true if this error is a time conflict or bad time range.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ScheduleError::Conflict(_))
    }
}
