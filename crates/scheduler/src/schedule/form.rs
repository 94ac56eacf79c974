//! Raw form input and its validation.
//!
//! Forms carry user-typed strings. `validate` reports every problem at once
//! so the caller can flag all offending fields together.

use super::error::{ValidationError, ValidationErrors};
use super::time::ClockTime;
use super::types::{ClassEntry, Weekday};

/// The add/edit class form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ClassForm {
    pub code: String,
    pub days: Vec<String>,
    pub start: String,
    pub end: String,
}

/// A class form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidClassForm {
    pub code: String,
    pub days: Vec<Weekday>,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ClassForm {
    pub fn new(
        code: impl Into<String>,
        days: impl IntoIterator<Item = impl Into<String>>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            days: days.into_iter().map(Into::into).collect(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Checks every field and collects all problems.
    ///
    /// Order: code, days, times (presence, format, then ordering).
    pub fn validate(&self) -> Result<ValidClassForm, ValidationErrors> {
        let mut errors = Vec::new();

        let code = self.code.trim();
        if code.is_empty() {
            errors.push(ValidationError::MissingCode);
        }

        let mut days: Vec<Weekday> = Vec::new();
        let mut any_day = false;
        for raw in self.days.iter().filter(|d| !d.trim().is_empty()) {
            any_day = true;
            match raw.parse::<Weekday>() {
                Ok(day) if !days.contains(&day) => days.push(day),
                Ok(_) => {}
                Err(e) => errors.push(e),
            }
        }
        if !any_day {
            errors.push(ValidationError::NoDaySelected);
        }

        let (start_raw, end_raw) = (self.start.trim(), self.end.trim());
        let mut times = None;
        if start_raw.is_empty() || end_raw.is_empty() {
            errors.push(ValidationError::MissingTime);
        } else {
            match (ClockTime::parse(start_raw), ClockTime::parse(end_raw)) {
                (Ok(start), Ok(end)) if end <= start => {
                    errors.push(ValidationError::EndNotAfterStart)
                }
                (Ok(start), Ok(end)) => times = Some((start, end)),
                (start, end) => {
                    errors.extend(start.err());
                    errors.extend(end.err());
                }
            }
        }

        match times {
            Some((start, end)) if errors.is_empty() => Ok(ValidClassForm {
                code: code.to_string(),
                days,
                start,
                end,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

impl ValidClassForm {
    /// One entry per selected day, all sharing code and times.
    pub fn entries(&self) -> Vec<ClassEntry> {
        self.days
            .iter()
            .map(|&day| ClassEntry::new(self.code.clone(), day, self.start, self.end))
            .collect()
    }
}

/// The add-student form.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub name: String,
    pub id: String,
}

impl StudentForm {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Returns the trimmed `(name, id)` pair.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let name = self.name.trim();
        let id = self.id.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingStudentName);
        }
        if id.is_empty() {
            return Err(ValidationError::MissingStudentId);
        }
        Ok((name.to_string(), id.to_string()))
    }
}
