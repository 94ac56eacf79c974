//! Class schedule manager.
//!
//! `schedule` holds the data model: students, their class sessions and the
//! rule that no two sessions of one student may overlap on the same day. It
//! also answers the read-only queries the views need (filtering, sorting,
//! grouping, summaries and the timetable grid).
//!
//! `presentation` is one consumer of that model: transient view state,
//! two-click confirmations and plain-text rendering.

pub mod presentation;
pub mod schedule;

pub use schedule::config::ScheduleConfig;
pub use schedule::error::{ConflictError, ScheduleError, ValidationError, ValidationErrors};
pub use schedule::{ClassEntry, ScheduleBook, Student, SubmitMode, Weekday};
