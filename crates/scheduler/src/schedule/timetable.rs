//! Timetable projection: a weekday × 15-minute grid derived from a list of
//! classes. Nothing here is stored; a new projection is built per render.
//!
//! Placement rules:
//! - Monday to Friday are always columns; Saturday and Sunday only when a
//!   class falls on them.
//! - Rows run from the earliest start to the latest end in 15-minute steps.
//! - A class is placed in the row whose slot contains its start time and spans
//!   `duration / 15` rows (floored, at least 1, never past the last row).
//! - A class that would start inside an occupied cell is reported in
//!   `Timetable::unplaced` instead of being drawn.

use serde::Serialize;
use tracing::debug;

use super::config::DEFAULT_PALETTE;
use super::query::EntryView;
use super::time::ClockTime;
use super::types::Weekday;

/// Height of one timetable row in minutes.
pub const SLOT_MINUTES: u16 = 15;

/// Hands out palette colors to class codes in order of first appearance.
///
/// Colors wrap around once the palette is exhausted.
#[derive(Debug, Clone, Serialize)]
pub struct ColorMap {
    palette: Vec<String>,
    assigned: Vec<(String, usize)>,
}

impl ColorMap {
    /// An empty `palette` falls back to the default colors.
    pub fn new(palette: &[String]) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            palette.to_vec()
        };
        Self {
            palette,
            assigned: Vec::new(),
        }
    }

    /// Returns the code's color, assigning the next one if it has none yet.
    pub fn color_for(&mut self, code: &str) -> &str {
        let slot = match self.assigned.iter().position(|(c, _)| c == code) {
            Some(pos) => self.assigned[pos].1,
            None => {
                let next = self.assigned.len() % self.palette.len();
                self.assigned.push((code.to_string(), next));
                next
            }
        };
        &self.palette[slot]
    }

    /// Color of an already-seen code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.assigned
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, slot)| self.palette[*slot].as_str())
    }

    /// `(code, color)` pairs in assignment order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assigned
            .iter()
            .map(|(code, slot)| (code.as_str(), self.palette[*slot].as_str()))
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell<'a> {
    /// No class in this slot
    Empty,
    /// A class starts in this slot and covers `row_span` rows
    Class {
        entry: EntryView<'a>,
        row_span: usize,
        color: String,
    },
    /// Occupied by a class that started in an earlier row
    Covered,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableRow<'a> {
    pub slot: ClockTime,
    /// One cell per entry of `Timetable::days`
    pub cells: Vec<Cell<'a>>,
}

impl TimetableRow<'_> {
    /// Time labels are only printed on the hour and half hour.
    pub fn shows_label(&self) -> bool {
        self.slot.minutes() % 30 == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Timetable<'a> {
    pub days: Vec<Weekday>,
    pub start: ClockTime,
    pub end: ClockTime,
    pub rows: Vec<TimetableRow<'a>>,
    pub colors: ColorMap,
    pub unplaced: Vec<EntryView<'a>>,
}

impl<'a> Timetable<'a> {
    /// Projects `entries` onto the grid. Returns `None` when there is nothing
    /// to show.
    pub fn project(entries: &[EntryView<'a>], palette: &[String]) -> Option<Self> {
        let start = entries.iter().map(|e| e.start).min()?;
        let end = entries.iter().map(|e| e.end).max()?;

        let mut days: Vec<Weekday> = Weekday::ALL.into_iter().filter(|d| !d.is_weekend()).collect();
        for weekend_day in [Weekday::Saturday, Weekday::Sunday] {
            if entries.iter().any(|e| e.day == weekend_day) {
                days.push(weekend_day);
            }
        }

        let mut colors = ColorMap::new(palette);
        for entry in entries {
            colors.color_for(&entry.code);
        }

        let mut slots = Vec::new();
        let mut slot = Some(start);
        while let Some(time) = slot.filter(|t| *t < end) {
            slots.push(time);
            slot = time.checked_add(SLOT_MINUTES);
        }

        let mut placed = vec![false; entries.len()];
        let mut covered = vec![0usize; days.len()];
        let mut rows = Vec::with_capacity(slots.len());

        for (row_idx, &slot) in slots.iter().enumerate() {
            let slot_end = slot.minutes() + SLOT_MINUTES;
            let rows_left = slots.len() - row_idx;

            let cells = days
                .iter()
                .enumerate()
                .map(|(col, &day)| {
                    if covered[col] > 0 {
                        covered[col] -= 1;
                        return Cell::Covered;
                    }

                    let found = entries.iter().enumerate().find(|(i, e)| {
                        !placed[*i]
                            && e.day == day
                            && e.start >= slot
                            && e.start.minutes() < slot_end
                    });

                    match found {
                        Some((i, entry)) => {
                            placed[i] = true;
                            let row_span = usize::from(entry.duration_minutes() / SLOT_MINUTES)
                                .clamp(1, rows_left);
                            covered[col] = row_span - 1;
                            Cell::Class {
                                entry: *entry,
                                row_span,
                                color: colors.get(&entry.code).unwrap_or_default().to_string(),
                            }
                        }
                        None => Cell::Empty,
                    }
                })
                .collect();

            rows.push(TimetableRow { slot, cells });
        }

        let unplaced: Vec<EntryView<'a>> = entries
            .iter()
            .zip(&placed)
            .filter(|(_, placed)| !**placed)
            .map(|(entry, _)| *entry)
            .collect();

        debug!(
            days = days.len(),
            rows = rows.len(),
            unplaced = unplaced.len(),
            "Projected timetable"
        );

        Some(Self {
            days,
            start,
            end,
            rows,
            colors,
            unplaced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::query::{filtered_entries, ClassFilter};
    use crate::schedule::types::{ClassEntry, Student};

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn student_with(entries: &[(&str, Weekday, &str, &str)]) -> Student {
        let mut student = Student::new("Timmy", "001");
        for &(code, day, start, end) in entries {
            student
                .add_class(ClassEntry::new(code, day, t(start), t(end)))
                .unwrap();
        }
        student
    }

    fn cell<'t, 'a>(table: &'t Timetable<'a>, row: usize, day: Weekday) -> Option<&'t Cell<'a>> {
        let col = table.days.iter().position(|d| *d == day)?;
        table.rows.get(row)?.cells.get(col)
    }

    fn palette() -> Vec<String> {
        DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_empty_projection() {
        assert!(Timetable::project(&[], &palette()).is_none());
    }

    #[test]
    fn test_weekdays_and_range() {
        let student = student_with(&[
            ("CS101", Weekday::Monday, "09:00", "10:00"),
            ("MATH20", Weekday::Wednesday, "10:00", "11:30"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();

        assert_eq!(table.days.len(), 5);
        assert_eq!(table.start, t("09:00"));
        assert_eq!(table.end, t("11:30"));
        assert_eq!(table.rows.len(), 10);
        assert!(table.rows[0].shows_label());
        assert!(!table.rows[1].shows_label());
        assert!(table.unplaced.is_empty());
    }

    #[test]
    fn test_weekend_columns_appear_only_when_used() {
        let student = student_with(&[("YOGA", Weekday::Sunday, "08:00", "09:00")]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();
        assert_eq!(table.days.last(), Some(&Weekday::Sunday));
        assert!(!table.days.contains(&Weekday::Saturday));
    }

    #[test]
    fn test_row_spans_and_covered_cells() {
        let student = student_with(&[
            ("CS101", Weekday::Monday, "09:00", "10:15"),
            ("CS101", Weekday::Monday, "10:15", "10:30"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();

        match cell(&table, 0, Weekday::Monday) {
            Some(Cell::Class { row_span, entry, .. }) => {
                assert_eq!(*row_span, 5);
                assert_eq!(entry.index, 0);
            }
            other => panic!("expected class cell, got {other:?}"),
        }
        for row in 1..5 {
            assert_eq!(cell(&table, row, Weekday::Monday), Some(&Cell::Covered));
        }
        assert!(matches!(
            cell(&table, 5, Weekday::Monday),
            Some(Cell::Class { row_span: 1, .. })
        ));
        assert_eq!(cell(&table, 0, Weekday::Tuesday), Some(&Cell::Empty));
    }

    #[test]
    fn test_uneven_durations_are_floored() {
        // 50 minutes -> 3 full slots, grid still runs to 09:50
        let student = student_with(&[("LAB", Weekday::Friday, "09:00", "09:50")]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();

        assert_eq!(table.rows.len(), 4);
        assert!(matches!(
            cell(&table, 0, Weekday::Friday),
            Some(Cell::Class { row_span: 3, .. })
        ));
        assert_eq!(cell(&table, 3, Weekday::Friday), Some(&Cell::Empty));
    }

    #[test]
    fn test_off_grid_start_uses_containing_slot() {
        let student = student_with(&[
            ("A", Weekday::Monday, "09:00", "09:30"),
            ("B", Weekday::Tuesday, "09:20", "10:00"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();

        // Slot 1 is 09:15-09:30 and contains B's 09:20 start.
        assert!(matches!(
            cell(&table, 1, Weekday::Tuesday),
            Some(Cell::Class { row_span: 2, .. })
        ));
    }

    #[test]
    fn test_two_starts_in_one_slot_reports_unplaced() {
        let student = student_with(&[
            ("A", Weekday::Monday, "09:00", "09:05"),
            ("B", Weekday::Monday, "09:05", "09:10"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.unplaced.len(), 1);
        assert_eq!(table.unplaced[0].code, "B");
    }

    #[test]
    fn test_colors_follow_first_appearance() {
        let student = student_with(&[
            ("MATH20", Weekday::Monday, "09:00", "10:00"),
            ("CS101", Weekday::Tuesday, "09:00", "10:00"),
            ("MATH20", Weekday::Wednesday, "09:00", "10:00"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let table = Timetable::project(&views, &palette()).unwrap();

        let assigned: Vec<(&str, &str)> = table.colors.assignments().collect();
        assert_eq!(assigned, vec![("MATH20", "#A6CEE3"), ("CS101", "#1F78B4")]);

        // A fresh projection starts over from the first color.
        let only_cs = &views[1..2];
        let table = Timetable::project(only_cs, &palette()).unwrap();
        assert_eq!(table.colors.get("CS101"), Some("#A6CEE3"));
    }

    #[test]
    fn test_palette_wraps() {
        let mut colors = ColorMap::new(&["red".to_string(), "blue".to_string()]);
        assert_eq!(colors.color_for("A"), "red");
        assert_eq!(colors.color_for("B"), "blue");
        assert_eq!(colors.color_for("C"), "red");
        assert_eq!(colors.color_for("A"), "red");
        assert!(ColorMap::new(&[]).color_for("X").starts_with('#'));
    }
}
