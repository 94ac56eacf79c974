//! Plain-text rendering of the schedule views.

use std::fmt::Write;

use crate::schedule::query::{EntryGroup, ScheduleSummary, SortMode};
use crate::schedule::time::ClockTime;
use crate::schedule::timetable::{Cell, Timetable};
use crate::schedule::{ClassEntry, ScheduleBook, Student};

const TIME_COLUMN_WIDTH: usize = 9;
const DAY_COLUMN_WIDTH: usize = 10;

fn time_range(entry: &ClassEntry) -> String {
    format!("{}–{}", entry.start.to_12h(), entry.end.to_12h())
}

fn plural<'a>(one: bool, singular: &'a str, plural: &'a str) -> &'a str {
    if one {
        singular
    } else {
        plural
    }
}

/// One-line description of everything a student is enrolled in.
pub fn describe_student(student: &Student) -> String {
    let classes = student.enrolled_classes();
    if classes.is_empty() {
        return format!("{} ({}) has no classes.", student.name, student.id);
    }

    let descriptions: Vec<String> = classes
        .iter()
        .map(|c| format!("{} on {} {}", c.code, c.day, time_range(c)))
        .collect();
    format!(
        "{} ({}) is enrolled in: {}.",
        student.name,
        student.id,
        descriptions.join("; ")
    )
}

/// Summary line for the (filtered) classes of the selected student.
pub fn render_summary(student: Option<&Student>, summary: &ScheduleSummary) -> String {
    let Some(student) = student else {
        return "No student selected.".to_string();
    };

    let info = format!("{} ({})", student.name, student.id);
    if summary.class_count == 0 {
        return format!("{info} has no classes.");
    }

    format!(
        "{info} has {} {} totaling {} {}.",
        summary.class_count,
        plural(summary.class_count == 1, "class", "classes"),
        summary.total_hours,
        plural(summary.total_minutes == 60, "hour", "hours"),
    )
}

/// Options affecting how list lines are decorated.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub mode: SortMode,
    /// Index of the class currently being edited
    pub editing: Option<usize>,
    /// Starts before this get a "before nine" flag
    pub early_threshold: ClockTime,
    /// Ends after this get an "after five" flag
    pub late_threshold: ClockTime,
}

/// Grouped list view.
pub fn render_list(groups: &[EntryGroup<'_>], options: &ListOptions) -> String {
    if groups.is_empty() {
        return "No classes enrolled.".to_string();
    }

    let by_code = matches!(options.mode, SortMode::Code(_));
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "== {} ==", group.label);
        for view in &group.entries {
            let label = if by_code {
                view.day.to_string()
            } else {
                view.code.clone()
            };
            let _ = write!(out, "  [{}] {} - {}", view.index, label, time_range(view));
            if options.editing == Some(view.index) {
                out.push_str(" (editing)");
            }
            if view.start < options.early_threshold {
                out.push_str(" [before nine]");
            }
            if view.end > options.late_threshold {
                out.push_str(" [after five]");
            }
            out.push('\n');
        }
    }
    out
}

fn fit(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}

/// Timetable grid with a color legend.
pub fn render_table(table: &Timetable<'_>) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", fit("", TIME_COLUMN_WIDTH));
    for day in &table.days {
        let _ = write!(out, "|{}", fit(day.short_name(), DAY_COLUMN_WIDTH));
    }
    out.push('\n');

    for row in &table.rows {
        let label = if row.shows_label() {
            row.slot.to_12h()
        } else {
            String::new()
        };
        let _ = write!(out, "{}", fit(&label, TIME_COLUMN_WIDTH));
        for cell in &row.cells {
            let text = match cell {
                Cell::Empty => String::new(),
                Cell::Covered => "  :".to_string(),
                Cell::Class { entry, .. } => entry.code.clone(),
            };
            let _ = write!(out, "|{}", fit(&text, DAY_COLUMN_WIDTH));
        }
        out.push('\n');
    }

    for (code, color) in table.colors.assignments() {
        let _ = writeln!(out, "{code}: {color}");
    }
    for view in &table.unplaced {
        let _ = writeln!(
            out,
            "not shown: [{}] {} on {} {}",
            view.index,
            view.code,
            view.day,
            time_range(view)
        );
    }
    out
}

/// Student picker: one line per student, the selected one marked with `*`.
pub fn render_students(book: &ScheduleBook) -> String {
    if book.students().is_empty() {
        return "No students available. Please add a student.".to_string();
    }

    let current = book.current_student_id();
    book.students()
        .iter()
        .map(|s| {
            let marker = if Some(s.id.as_str()) == current { '*' } else { ' ' };
            format!("{marker} {} ({})", s.name, s.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
