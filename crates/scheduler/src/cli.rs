//! Line commands for the terminal front end.

use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use class_scheduler::presentation::render::{describe_student, render_students};
use class_scheduler::presentation::ViewState;
use class_scheduler::schedule::form::ClassForm;
use class_scheduler::schedule::query::{DayFilter, SortMode};
use class_scheduler::{ScheduleBook, ScheduleError, SubmitMode, Weekday};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  students                         list students (* = selected)
  student add <id> <name...>       add a student and select them
  student use <id>                 select a student
  student rm                       delete the selected student (press twice)
  class <code> <days> <start> <end>
                                   add a class, or update the one being edited;
                                   days are comma separated (Mon,Wed), times HH:MM
  edit <index>                     start editing a class
  cancel                           stop editing
  rm <index>                       delete a class (press twice)
  reset                            delete all classes of the student (press twice)
  filter <day|all>                 show one day or all days
  search [term]                    filter by class code; empty clears
  sort code|day                    code sort toggles direction
  view                             toggle list / table
  show                             render the current view
  describe                         one-line description of the student
  times                            list selectable times
  export                           print all students as JSON
  help                             this text
  quit                             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Students,
    AddStudent { id: String, name: String },
    UseStudent { id: String },
    RemoveStudent,
    Class(ClassArgs),
    Edit { index: usize },
    Cancel,
    RemoveClass { index: usize },
    Reset,
    Filter(DayFilter),
    Search(String),
    SortByCode,
    SortByDay,
    ToggleView,
    Show,
    Describe,
    Times,
    Export,
    Help,
    Quit,
}

impl Command {
    /// Commands that re-render or reshuffle the list. Pending confirmations
    /// refer to what was shown before, so these disarm them.
    fn invalidates_confirmations(&self) -> bool {
        !matches!(
            self,
            Command::Students
                | Command::RemoveStudent
                | Command::RemoveClass { .. }
                | Command::Reset
                | Command::Show
                | Command::Describe
                | Command::Times
                | Command::Export
                | Command::Help
                | Command::Quit
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassArgs {
    pub code: String,
    pub days: Vec<String>,
    pub start: String,
    pub end: String,
}

fn parse_index(arg: Option<&str>) -> Result<usize> {
    let raw = arg.ok_or_else(|| anyhow!("missing class index"))?;
    raw.parse()
        .map_err(|_| anyhow!("\"{raw}\" is not a class index"))
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("students", []) => Command::Students,
        ("student", ["add", id, name @ ..]) if !name.is_empty() => Command::AddStudent {
            id: id.to_string(),
            name: name.join(" "),
        },
        ("student", ["use", id]) => Command::UseStudent { id: id.to_string() },
        ("student", ["rm"]) => Command::RemoveStudent,
        ("class", [code, days, start, end]) => Command::Class(ClassArgs {
            code: code.to_string(),
            days: days.split(',').map(str::to_string).collect(),
            start: start.to_string(),
            end: end.to_string(),
        }),
        ("edit", args) => Command::Edit {
            index: parse_index(args.first().copied())?,
        },
        ("cancel", []) => Command::Cancel,
        ("rm", args) => Command::RemoveClass {
            index: parse_index(args.first().copied())?,
        },
        ("reset", []) => Command::Reset,
        ("filter", [day]) if day.eq_ignore_ascii_case("all") => Command::Filter(DayFilter::All),
        ("filter", [day]) => Command::Filter(DayFilter::Only(day.parse::<Weekday>()?)),
        ("search", terms) => Command::Search(terms.join(" ")),
        ("sort", ["code"]) => Command::SortByCode,
        ("sort", ["day"]) => Command::SortByDay,
        ("view", []) => Command::ToggleView,
        ("show", []) => Command::Show,
        ("describe", []) => Command::Describe,
        ("times", []) => Command::Times,
        ("export", []) => Command::Export,
        ("help", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => bail!("unrecognised command, try `help`"),
    };
    debug!(?command, "Parsed command");
    Ok(Some(command))
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal session: the schedule book plus its view state.
pub struct App {
    pub book: ScheduleBook,
    pub view: ViewState,
}

impl App {
    pub fn new(book: ScheduleBook, view: ViewState) -> Self {
        Self { book, view }
    }

    /// Runs a command and returns what should be printed.
    pub fn execute(&mut self, command: Command, now: Instant) -> Result<(Flow, String)> {
        if command.invalidates_confirmations() {
            self.view.cancel_confirmations();
        }

        let output = match command {
            Command::Quit => return Ok((Flow::Quit, String::new())),
            Command::Help => HELP.to_string(),
            Command::Students => render_students(&self.book),
            Command::AddStudent { id, name } => {
                let student = self.book.add_student(&name, &id)?;
                let added = format!("Added {} ({}).", student.name, student.id);
                self.view.cancel_editing();
                added
            }
            Command::UseStudent { id } => {
                self.book.select_student(&id)?;
                self.view.cancel_editing();
                self.view.render(&self.book)
            }
            Command::RemoveStudent => {
                let id = self.book.require_current()?.to_string();
                if !ViewState::confirm(&mut self.view.delete_student, id.clone(), now) {
                    format!("Run `student rm` again to delete student {id}.")
                } else {
                    let removed = self.book.remove_student(&id)?;
                    self.view.cancel_editing();
                    self.view.cancel_confirmations();
                    format!(
                        "Deleted {} ({}).\n{}",
                        removed.name,
                        removed.id,
                        self.view.render(&self.book)
                    )
                }
            }
            Command::Class(args) => {
                let id = self.book.require_current()?.to_string();
                let form = ClassForm::new(args.code, args.days, args.start, args.end);
                let mode = match self.view.editing {
                    Some(index) => SubmitMode::Update { index },
                    None => SubmitMode::Add,
                };
                self.book.submit(&id, &form, mode).map_err(|e| match e {
                    ScheduleError::InvalidForm(errors) => anyhow!(errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")),
                    other => other.into(),
                })?;
                self.view.cancel_editing();
                self.view.render(&self.book)
            }
            Command::Edit { index } => {
                let student = self
                    .book
                    .current_student()
                    .ok_or(ScheduleError::NoStudentSelected)?;
                let entry = student.enrolled_classes().get(index).ok_or(
                    ScheduleError::ClassIndexOutOfBounds {
                        index,
                        len: student.enrolled_classes().len(),
                    },
                )?;
                let prompt = format!(
                    "Editing [{index}] {} on {} {}-{}. Submit with `class`, or `cancel`.",
                    entry.code, entry.day, entry.start, entry.end
                );
                self.view.start_editing(index);
                prompt
            }
            Command::Cancel => {
                self.view.cancel_editing();
                self.view.render(&self.book)
            }
            Command::RemoveClass { index } => {
                let student = self
                    .book
                    .current_student()
                    .ok_or(ScheduleError::NoStudentSelected)?;
                let len = student.enrolled_classes().len();
                if index >= len {
                    return Err(ScheduleError::ClassIndexOutOfBounds { index, len }.into());
                }
                let id = student.id.clone();
                if !ViewState::confirm(&mut self.view.delete_class, (id.clone(), index), now) {
                    format!("Run `rm {index}` again to delete class {index}.")
                } else {
                    self.book.remove_class(&id, index)?;
                    self.view.cancel_editing();
                    self.view.cancel_confirmations();
                    self.view.render(&self.book)
                }
            }
            Command::Reset => {
                let id = self.book.require_current()?.to_string();
                if !ViewState::confirm(&mut self.view.reset_list, id.clone(), now) {
                    "Run `reset` again to delete every class.".to_string()
                } else {
                    let count = self.book.reset_classes(&id)?;
                    self.view.cancel_editing();
                    self.view.cancel_confirmations();
                    format!("Removed {count} classes.\n{}", self.view.render(&self.book))
                }
            }
            Command::Filter(day) => {
                self.view.set_day_filter(day);
                self.view.render(&self.book)
            }
            Command::Search(term) => {
                self.view.set_search(&term);
                self.view.render(&self.book)
            }
            Command::SortByCode => {
                self.view.sort_by_code();
                match self.view.sort {
                    SortMode::Code(direction) => {
                        format!("Code {}\n{}", direction.arrow(), self.view.render(&self.book))
                    }
                    SortMode::Day => self.view.render(&self.book),
                }
            }
            Command::SortByDay => {
                self.view.sort_by_day();
                self.view.render(&self.book)
            }
            Command::ToggleView => {
                self.view.toggle_view();
                self.view.render(&self.book)
            }
            Command::Show => self.view.render(&self.book),
            Command::Describe => match self.book.current_student() {
                Some(student) => describe_student(student),
                None => "No student selected.".to_string(),
            },
            Command::Times => self
                .view
                .config()
                .time_choices()
                .iter()
                .map(|t| format!("{t}  {}", t.to_12h()))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Export => serde_json::to_string_pretty(&self.book)?,
        };
        Ok((Flow::Continue, output))
    }
}
