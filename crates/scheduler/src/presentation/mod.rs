/// Presentation layer: transient view state and text rendering
pub mod confirm;
pub mod render;

use std::fmt::Debug;
use std::time::Instant;

use tracing::info;

use crate::schedule::config::ScheduleConfig;
use crate::schedule::query::{
    filtered_entries, sorted_and_grouped, summary, ClassFilter, DayFilter, SortMode,
};
use crate::schedule::timetable::Timetable;
use crate::schedule::ScheduleBook;

use self::confirm::{ConfirmGate, ConfirmOutcome};
use self::render::ListOptions;

/// List or timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Table,
}

/// Everything the UI remembers between renders that isn't schedule data.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub sort: SortMode,
    pub view: ViewMode,
    pub filter: ClassFilter,
    /// Class being edited; submissions update it instead of adding
    pub editing: Option<usize>,
    /// Armed with the ID of the student to delete
    pub delete_student: ConfirmGate<String>,
    /// Armed with the ID of the student whose classes get cleared
    pub reset_list: ConfirmGate<String>,
    /// Armed with the student ID and class index to delete
    pub delete_class: ConfirmGate<(String, usize)>,
    config: ScheduleConfig,
}

impl ViewState {
    pub fn new(config: ScheduleConfig) -> Self {
        let timeout = config.confirm_timeout();
        Self {
            sort: SortMode::default(),
            view: ViewMode::default(),
            filter: ClassFilter::default(),
            editing: None,
            delete_student: ConfirmGate::new(timeout),
            reset_list: ConfirmGate::new(timeout),
            delete_class: ConfirmGate::new(timeout),
            config,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Code sort button: flips direction, starting ascending.
    pub fn sort_by_code(&mut self) {
        self.sort = self.sort.toggle_code();
        info!(sort = ?self.sort, "Sorting by code");
    }

    /// Day sort button: always chronological.
    pub fn sort_by_day(&mut self) {
        self.sort = SortMode::Day;
        info!("Sorting by day");
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view = match self.view {
            ViewMode::List => ViewMode::Table,
            ViewMode::Table => ViewMode::List,
        };
        info!(view = ?self.view, "Switched view");
        self.view
    }

    pub fn set_day_filter(&mut self, day: DayFilter) {
        self.filter.day = day;
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.search = term.trim().to_string();
    }

    pub fn start_editing(&mut self, index: usize) {
        self.editing = Some(index);
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Presses a guarded button for `target`. Returns true when the action
    /// should run.
    pub fn confirm<T: PartialEq + Debug>(
        gate: &mut ConfirmGate<T>,
        target: T,
        now: Instant,
    ) -> bool {
        gate.press(target, now) == ConfirmOutcome::Confirmed
    }

    /// Disarms every pending confirmation. Call whenever the rendered list
    /// changes, since pending targets refer to what was on screen.
    pub fn cancel_confirmations(&mut self) {
        self.delete_student.cancel();
        self.reset_list.cancel();
        self.delete_class.cancel();
    }

    /// Renders the current view plus summary for the selected student.
    pub fn render(&self, book: &ScheduleBook) -> String {
        let Some(student) = book.current_student() else {
            return format!(
                "{}\n{}",
                render::render_students(book),
                render::render_summary(None, &summary(std::iter::empty()))
            );
        };

        let entries = filtered_entries(student, &self.filter);
        let body = match self.view {
            ViewMode::List => {
                let groups = sorted_and_grouped(&entries, self.sort);
                let options = ListOptions {
                    mode: self.sort,
                    editing: self.editing,
                    early_threshold: self.config.early_threshold,
                    late_threshold: self.config.late_threshold,
                };
                render::render_list(&groups, &options)
            }
            ViewMode::Table => match Timetable::project(&entries, &self.config.palette) {
                Some(table) => render::render_table(&table),
                None => "No classes enrolled.".to_string(),
            },
        };

        let totals = summary(entries.iter().map(|e| e.entry));
        format!(
            "{}\n{}",
            body.trim_end(),
            render::render_summary(Some(student), &totals)
        )
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}
