/// Filtering, sorting, grouping and summary queries over a student's classes
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use super::types::{ClassEntry, Student, Weekday};

/// A class together with its position in the student's enrolled list.
///
/// Edit/delete actions in the views refer back to the class by `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryView<'a> {
    pub index: usize,
    pub entry: &'a ClassEntry,
}

impl Deref for EntryView<'_> {
    type Target = ClassEntry;

    fn deref(&self) -> &ClassEntry {
        self.entry
    }
}

/// Which days to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn matches(self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => d == day,
        }
    }
}

/// Day filter plus code search, combined by intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFilter {
    pub day: DayFilter,
    /// Case-insensitive substring of the class code; blank matches all
    pub search: String,
}

impl ClassFilter {
    pub fn matches(&self, entry: &ClassEntry) -> bool {
        if !self.day.matches(entry.day) {
            return false;
        }
        let term = self.search.trim();
        term.is_empty() || entry.code.to_uppercase().contains(&term.to_uppercase())
    }
}

/// Returns the student's classes that pass `filter`, in enrollment order.
pub fn filtered_entries<'a>(student: &'a Student, filter: &ClassFilter) -> Vec<EntryView<'a>> {
    student
        .enrolled_classes()
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry))
        .map(|(index, entry)| EntryView { index, entry })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to a sort button label.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// How the list view orders and groups classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Chronological: weekday, then start time. Grouped by day.
    #[default]
    Day,
    /// By code in the given direction, then weekday and start time. Grouped by code.
    Code(SortDirection),
}

impl SortMode {
    /// Result of pressing the code sort button: flips the direction when
    /// already sorting by code, otherwise starts ascending.
    pub fn toggle_code(self) -> Self {
        match self {
            SortMode::Code(direction) => SortMode::Code(direction.toggle()),
            SortMode::Day => SortMode::Code(SortDirection::Ascending),
        }
    }
}

/// Heading of a group in the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLabel {
    Day(Weekday),
    Code(String),
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Day(day) => write!(f, "{day}"),
            GroupLabel::Code(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryGroup<'a> {
    pub label: GroupLabel,
    pub entries: Vec<EntryView<'a>>,
}

fn chronological(a: &ClassEntry, b: &ClassEntry) -> Ordering {
    a.day.cmp(&b.day).then(a.start.cmp(&b.start))
}

/// Stable sort of `entries` according to `mode`.
pub fn sorted<'a>(entries: &[EntryView<'a>], mode: SortMode) -> Vec<EntryView<'a>> {
    let mut sorted = entries.to_vec();
    match mode {
        SortMode::Day => sorted.sort_by(|a, b| chronological(a, b)),
        SortMode::Code(direction) => sorted.sort_by(|a, b| {
            let by_code = match direction {
                SortDirection::Ascending => a.code.cmp(&b.code),
                SortDirection::Descending => b.code.cmp(&a.code),
            };
            by_code.then_with(|| chronological(a, b))
        }),
    }
    sorted
}

/// Sorts and then groups `entries`. Empty groups are never produced.
pub fn sorted_and_grouped<'a>(entries: &[EntryView<'a>], mode: SortMode) -> Vec<EntryGroup<'a>> {
    let sorted = sorted(entries, mode);
    match mode {
        SortMode::Day => Weekday::ALL
            .into_iter()
            .map(|day| EntryGroup {
                label: GroupLabel::Day(day),
                entries: sorted.iter().copied().filter(|e| e.day == day).collect(),
            })
            .filter(|group| !group.entries.is_empty())
            .collect(),
        SortMode::Code(_) => {
            // Sorted by code, so equal codes are adjacent.
            let mut groups: Vec<EntryGroup<'a>> = Vec::new();
            for view in sorted {
                match groups.last_mut() {
                    Some(group) if matches!(&group.label, GroupLabel::Code(c) if *c == view.code) => {
                        group.entries.push(view)
                    }
                    _ => groups.push(EntryGroup {
                        label: GroupLabel::Code(view.code.clone()),
                        entries: vec![view],
                    }),
                }
            }
            groups
        }
    }
}

/// Count and total time of a set of classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub class_count: usize,
    pub total_minutes: u32,
    /// `total_minutes` in hours, rounded to two decimals
    pub total_hours: f64,
}

/// Summarizes any collection of classes.
pub fn summary<'a, I>(entries: I) -> ScheduleSummary
where
    I: IntoIterator<Item = &'a ClassEntry>,
{
    let (class_count, total_minutes) = entries
        .into_iter()
        .fold((0usize, 0u32), |(count, minutes), entry| {
            (count + 1, minutes + u32::from(entry.duration_minutes()))
        });

    let total_hours = (f64::from(total_minutes) / 60.0 * 100.0).round() / 100.0;

    ScheduleSummary {
        class_count,
        total_minutes,
        total_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::time::ClockTime;

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

    fn codes(views: &[EntryView<'_>]) -> Vec<String> {
        views
            .iter()
            .map(|v| format!("{}@{}", v.code, v.day.short_name()))
            .collect()
    }

    #[test]
    fn test_day_filter_without_matches_is_empty() {
        let student = student_with(&[
            ("CS101", Weekday::Monday, "09:00", "10:00"),
            ("MATH20", Weekday::Wednesday, "09:00", "10:00"),
        ]);
        let filter = ClassFilter {
            day: DayFilter::Only(Weekday::Tuesday),
            search: String::new(),
        };
        assert!(filtered_entries(&student, &filter).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_composes() {
        let student = student_with(&[
            ("CS101", Weekday::Monday, "09:00", "10:00"),
            ("cs202", Weekday::Wednesday, "09:00", "10:00"),
            ("MATH20", Weekday::Wednesday, "11:00", "12:00"),
        ]);

        let filter = ClassFilter {
            day: DayFilter::All,
            search: " Cs ".to_string(),
        };
        let found = filtered_entries(&student, &filter);
        assert_eq!(codes(&found), vec!["CS101@Mon", "cs202@Wed"]);
        assert_eq!(found[1].index, 1);

        let filter = ClassFilter {
            day: DayFilter::Only(Weekday::Wednesday),
            search: "cs".to_string(),
        };
        assert_eq!(codes(&filtered_entries(&student, &filter)), vec!["cs202@Wed"]);

        let filter = ClassFilter {
            day: DayFilter::All,
            search: "PHYS".to_string(),
        };
        assert!(filtered_entries(&student, &filter).is_empty());
    }

    #[test]
    fn test_day_sort_groups_chronologically() {
        let student = student_with(&[
            ("B", Weekday::Friday, "09:00", "10:00"),
            ("A", Weekday::Monday, "13:00", "14:00"),
            ("C", Weekday::Monday, "08:00", "09:00"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let groups = sorted_and_grouped(&views, SortMode::Day);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, GroupLabel::Day(Weekday::Monday));
        assert_eq!(codes(&groups[0].entries), vec!["C@Mon", "A@Mon"]);
        assert_eq!(groups[1].label.to_string(), "Friday");
    }

    #[test]
    fn test_code_sort_groups_and_tie_breaks() {
        let student = student_with(&[
            ("MATH20", Weekday::Friday, "09:00", "10:00"),
            ("CS101", Weekday::Wednesday, "09:00", "10:00"),
            ("CS101", Weekday::Monday, "09:00", "10:00"),
            ("BIO1", Weekday::Tuesday, "09:00", "10:00"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());

        let asc = sorted_and_grouped(&views, SortMode::Code(SortDirection::Ascending));
        let labels: Vec<String> = asc.iter().map(|g| g.label.to_string()).collect();
        assert_eq!(labels, vec!["BIO1", "CS101", "MATH20"]);
        assert_eq!(codes(&asc[1].entries), vec!["CS101@Mon", "CS101@Wed"]);

        let desc = sorted_and_grouped(&views, SortMode::Code(SortDirection::Descending));
        let labels: Vec<String> = desc.iter().map(|g| g.label.to_string()).collect();
        assert_eq!(labels, vec!["MATH20", "CS101", "BIO1"]);
        // Ties stay chronological even when descending.
        assert_eq!(codes(&desc[1].entries), vec!["CS101@Mon", "CS101@Wed"]);
    }

    #[test]
    fn test_code_sort_is_case_sensitive() {
        let student = student_with(&[
            ("abc", Weekday::Monday, "09:00", "10:00"),
            ("ABD", Weekday::Tuesday, "09:00", "10:00"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let asc = sorted(&views, SortMode::Code(SortDirection::Ascending));
        assert_eq!(codes(&asc), vec!["ABD@Tue", "abc@Mon"]);
    }

    #[test]
    fn test_toggling_twice_restores_order() {
        let student = student_with(&[
            ("D", Weekday::Monday, "09:00", "10:00"),
            ("A", Weekday::Tuesday, "09:00", "10:00"),
            ("C", Weekday::Friday, "09:00", "10:00"),
            ("B", Weekday::Sunday, "09:00", "10:00"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());

        let mode = SortMode::Day.toggle_code();
        assert_eq!(mode, SortMode::Code(SortDirection::Ascending));
        let first = sorted(&views, mode);
        let flipped = sorted(&views, mode.toggle_code());
        let back = sorted(&views, mode.toggle_code().toggle_code());

        assert_eq!(codes(&first), vec!["A@Tue", "B@Sun", "C@Fri", "D@Mon"]);
        assert_eq!(codes(&flipped), vec!["D@Mon", "C@Fri", "B@Sun", "A@Tue"]);
        assert_eq!(first, back);
    }

    #[test]
    fn test_summary_totals() {
        let student = student_with(&[
            ("A", Weekday::Monday, "09:00", "10:30"),
            ("B", Weekday::Thursday, "10:30", "12:00"),
        ]);
        let s = summary(student.enrolled_classes());
        assert_eq!(s.class_count, 2);
        assert_eq!(s.total_minutes, 180);
        assert_eq!(s.total_hours, 3.0);

        let student = student_with(&[
            ("A", Weekday::Monday, "09:00", "10:15"),
            ("B", Weekday::Monday, "10:30", "11:45"),
            ("C", Weekday::Monday, "13:00", "13:50"),
        ]);
        let views = filtered_entries(&student, &ClassFilter::default());
        let s = summary(views[..2].iter().map(|v| v.entry));
        assert_eq!(s.total_hours, 2.5);
        assert_eq!(s.class_count, 2);

        // 200 minutes = 3.333... hours
        assert_eq!(summary(student.enrolled_classes()).total_hours, 3.33);
    }

    #[test]
    fn test_summary_of_nothing() {
        let s = summary(std::iter::empty());
        assert_eq!(s.class_count, 0);
        assert_eq!(s.total_hours, 0.0);
    }
}
