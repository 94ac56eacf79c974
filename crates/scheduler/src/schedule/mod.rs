/// Schedule model: students, their classes, and the conflict rules
pub mod config;
pub mod error;
pub mod form;
pub mod query;
pub mod time;
pub mod timetable;
mod types;

pub use types::*;

use serde::Serialize;
use tracing::{info, warn};

use self::config::ScheduleConfig;
use self::error::{ScheduleError, ValidationError};
use self::form::{ClassForm, StudentForm};

/// What a class form submission does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Add one class per selected day
    Add,
    /// Replace the class at `index` with one class per selected day
    Update { index: usize },
}

/// All students plus the currently selected one.
///
/// This is the whole application state; callers own it and pass it to every
/// operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleBook {
    students: Vec<Student>,
    current: Option<String>,
}

impl ScheduleBook {
    /// Creates an empty book with no students.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a book holding the configured initial students, selecting the
    /// first one. Seeds with a blank or duplicate ID are skipped.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        let mut book = Self::new();
        for seed in &config.initial_students {
            if let Err(e) = book.add_student(&seed.name, &seed.id) {
                warn!(id = %seed.id, error = %e, "Skipping initial student");
            }
        }
        book.current = book.students.first().map(|s| s.id.clone());
        book
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    fn student_mut(&mut self, id: &str) -> Result<&mut Student, ScheduleError> {
        self.students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ScheduleError::StudentNotFound { id: id.to_string() })
    }

    pub fn current_student_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The selected student, or `None` when no student is selected.
    pub fn current_student(&self) -> Option<&Student> {
        self.current.as_deref().and_then(|id| self.student(id))
    }

    /// The selected student's ID, or `NoStudentSelected`.
    pub fn require_current(&self) -> Result<&str, ScheduleError> {
        self.current_student()
            .map(|s| s.id.as_str())
            .ok_or(ScheduleError::NoStudentSelected)
    }

    pub fn select_student(&mut self, id: &str) -> Result<(), ScheduleError> {
        if self.student(id).is_none() {
            return Err(ScheduleError::StudentNotFound { id: id.to_string() });
        }
        info!(student = %id, "Selected student");
        self.current = Some(id.to_string());
        Ok(())
    }

    /// Adds a student and selects them.
    ///
    /// Name and ID are trimmed; both are required and the ID must be unused.
    pub fn add_student(&mut self, name: &str, id: &str) -> Result<&Student, ScheduleError> {
        let (name, id) = StudentForm::new(name, id).validate()?;
        if self.student(&id).is_some() {
            warn!(student = %id, "Rejected duplicate student ID");
            return Err(ValidationError::DuplicateStudentId { id }.into());
        }

        self.current = Some(id.clone());
        self.students.push(Student::new(name, id));
        info!(count = self.students.len(), "Student added");
        Ok(&self.students[self.students.len() - 1])
    }

    /// Removes a student. If they were selected, the first remaining student
    /// becomes selected, or nobody when the book is empty.
    pub fn remove_student(&mut self, id: &str) -> Result<Student, ScheduleError> {
        let pos = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ScheduleError::StudentNotFound { id: id.to_string() })?;

        let removed = self.students.remove(pos);
        if self.current.as_deref() == Some(id) {
            self.current = self.students.first().map(|s| s.id.clone());
        }
        info!(
            student = %removed.id,
            remaining = self.students.len(),
            "Removed student"
        );
        Ok(removed)
    }

    pub fn add_class(&mut self, student_id: &str, entry: ClassEntry) -> Result<(), ScheduleError> {
        Ok(self.student_mut(student_id)?.add_class(entry)?)
    }

    /// Replaces the class at `index`; the schedule is unchanged on failure.
    pub fn update_class(
        &mut self,
        student_id: &str,
        index: usize,
        entry: ClassEntry,
    ) -> Result<ClassEntry, ScheduleError> {
        let student = self.student_mut(student_id)?;
        let len = student.enrolled_classes().len();
        student
            .update_class(index, entry)?
            .ok_or(ScheduleError::ClassIndexOutOfBounds { index, len })
    }

    /// Removes the class at `index`. An out-of-bounds index is an error and
    /// changes nothing.
    pub fn remove_class(&mut self, student_id: &str, index: usize) -> Result<ClassEntry, ScheduleError> {
        let student = self.student_mut(student_id)?;
        let len = student.enrolled_classes().len();
        student
            .remove_class(index)
            .ok_or(ScheduleError::ClassIndexOutOfBounds { index, len })
    }

    /// Clears a student's classes, returning how many were removed.
    pub fn reset_classes(&mut self, student_id: &str) -> Result<usize, ScheduleError> {
        Ok(self.student_mut(student_id)?.reset_classes())
    }

    /// Validates a class form and applies it as one atomic batch.
    ///
    /// Returns the number of classes written. On any error the student's
    /// schedule is exactly as it was before the call.
    pub fn submit(
        &mut self,
        student_id: &str,
        form: &ClassForm,
        mode: SubmitMode,
    ) -> Result<usize, ScheduleError> {
        let valid = form.validate()?;
        let entries = valid.entries();
        let count = entries.len();
        let student = self.student_mut(student_id)?;

        let result = match mode {
            SubmitMode::Add => student.add_batch(entries).map_err(ScheduleError::from),
            SubmitMode::Update { index } => {
                let len = student.enrolled_classes().len();
                match student.update_batch(index, entries) {
                    Ok(Some(_)) => Ok(()),
                    Ok(None) => Err(ScheduleError::ClassIndexOutOfBounds { index, len }),
                    Err(e) => Err(e.into()),
                }
            }
        };

        match result {
            Ok(()) => {
                info!(student = %student_id, code = %valid.code, count, "Submitted classes");
                Ok(count)
            }
            Err(e) => {
                warn!(student = %student_id, code = %valid.code, error = %e, "Submission rejected");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::error::ConflictError;
    use crate::schedule::time::ClockTime;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn book_with_timmy() -> ScheduleBook {
        ScheduleBook::from_config(&ScheduleConfig::default())
    }

    #[test]
    fn test_from_config_seeds_and_selects() {
        let book = book_with_timmy();
        assert_eq!(book.students().len(), 1);
        assert_eq!(book.current_student_id(), Some("001"));
        assert_eq!(book.current_student().map(|s| s.name.as_str()), Some("Timmy"));
    }

    #[test]
    fn test_add_student_rejects_duplicates_and_blanks() {
        let mut book = book_with_timmy();
        let err = book.add_student("Other", " 001 ").unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Validation(ValidationError::DuplicateStudentId {
                id: "001".to_string()
            })
        );
        assert!(book.add_student("", "002").is_err());
        assert!(book.add_student("Ana", "").is_err());
        assert_eq!(book.students().len(), 1);
        assert_eq!(book.current_student_id(), Some("001"));

        book.add_student("Ana", "002").unwrap();
        assert_eq!(book.current_student_id(), Some("002"));
    }

    #[test]
    fn test_removing_only_student_clears_selection() {
        let mut book = book_with_timmy();
        let removed = book.remove_student("001").unwrap();
        assert_eq!(removed.id, "001");
        assert!(book.students().is_empty());
        assert!(book.current_student().is_none());
        assert_eq!(book.require_current(), Err(ScheduleError::NoStudentSelected));
    }

    #[test]
    fn test_removing_selected_student_selects_first() {
        let mut book = book_with_timmy();
        book.add_student("Ana", "002").unwrap();
        book.add_student("Bo", "003").unwrap();
        assert_eq!(book.current_student_id(), Some("003"));

        book.remove_student("003").unwrap();
        assert_eq!(book.current_student_id(), Some("001"));

        // Removing someone else keeps the selection.
        book.select_student("002").unwrap();
        book.remove_student("001").unwrap();
        assert_eq!(book.current_student_id(), Some("002"));

        assert_eq!(
            book.remove_student("404"),
            Err(ScheduleError::StudentNotFound {
                id: "404".to_string()
            })
        );
    }

    #[test]
    fn test_class_operations_by_student_id() {
        let mut book = book_with_timmy();
        book.add_class("001", ClassEntry::new("CS101", Weekday::Monday, t("09:00"), t("10:15")))
            .unwrap();

        let err = book
            .add_class("001", ClassEntry::new("CS102", Weekday::Monday, t("10:00"), t("11:00")))
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "Time conflict with CS101 on Monday."
        );

        assert_eq!(
            book.remove_class("001", 3),
            Err(ScheduleError::ClassIndexOutOfBounds { index: 3, len: 1 })
        );
        assert_eq!(
            book.update_class(
                "001",
                1,
                ClassEntry::new("X", Weekday::Friday, t("09:00"), t("10:00"))
            ),
            Err(ScheduleError::ClassIndexOutOfBounds { index: 1, len: 1 })
        );

        let old = book
            .update_class("001", 0, ClassEntry::new("CS101", Weekday::Tuesday, t("09:00"), t("10:15")))
            .unwrap();
        assert_eq!(old.day, Weekday::Monday);

        assert_eq!(book.reset_classes("001"), Ok(1));
        assert!(book.add_class("nobody", ClassEntry::new("A", Weekday::Monday, t("09:00"), t("10:00"))).is_err());
    }

    #[test]
    fn test_submit_add_is_atomic() {
        let mut book = book_with_timmy();
        book.add_class("001", ClassEntry::new("BIO1", Weekday::Wednesday, t("09:30"), t("10:30")))
            .unwrap();
        let before = book.student("001").unwrap().enrolled_classes().to_vec();

        let form = ClassForm::new("CS101", ["Monday", "Wednesday", "Friday"], "09:00", "10:00");
        let err = book.submit("001", &form, SubmitMode::Add).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Conflict(ConflictError::Overlap {
                code: "BIO1".to_string(),
                day: Weekday::Wednesday
            })
        );
        assert_eq!(book.student("001").unwrap().enrolled_classes(), before.as_slice());

        let form = ClassForm::new("CS101", ["Monday", "Friday"], "09:00", "10:00");
        assert_eq!(book.submit("001", &form, SubmitMode::Add), Ok(2));
        assert_eq!(book.student("001").unwrap().enrolled_classes().len(), 3);
    }

    #[test]
    fn test_submit_invalid_form_changes_nothing() {
        let mut book = book_with_timmy();
        let form = ClassForm::new("", Vec::<String>::new(), "10:00", "09:00");
        let err = book.submit("001", &form, SubmitMode::Add).unwrap_err();
        assert!(err.is_validation());
        assert!(book.student("001").unwrap().enrolled_classes().is_empty());
    }

    #[test]
    fn test_submit_update_restores_on_conflict() {
        let mut book = book_with_timmy();
        let add = ClassForm::new("CS101", ["Mon"], "09:00", "10:00");
        book.submit("001", &add, SubmitMode::Add).unwrap();
        let add = ClassForm::new("MATH20", ["Tue"], "13:00", "14:00");
        book.submit("001", &add, SubmitMode::Add).unwrap();
        let before = book.student("001").unwrap().enrolled_classes().to_vec();

        let edit = ClassForm::new("CS101", ["Mon", "Tue"], "13:30", "14:30");
        let err = book
            .submit("001", &edit, SubmitMode::Update { index: 0 })
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(book.student("001").unwrap().enrolled_classes(), before.as_slice());

        let edit = ClassForm::new("CS101", ["Mon", "Wed"], "13:30", "14:30");
        assert_eq!(
            book.submit("001", &edit, SubmitMode::Update { index: 0 }),
            Ok(2)
        );
        let classes = book.student("001").unwrap().enrolled_classes();
        assert_eq!(classes.len(), 3);
        assert_eq!(classes[0].code, "MATH20");

        let err = book
            .submit("001", &edit, SubmitMode::Update { index: 9 })
            .unwrap_err();
        assert_eq!(err, ScheduleError::ClassIndexOutOfBounds { index: 9, len: 3 });
    }

    #[test]
    fn test_select_unknown_student() {
        let mut book = book_with_timmy();
        assert!(book.select_student("999").is_err());
        assert_eq!(book.current_student_id(), Some("001"));
    }
}
