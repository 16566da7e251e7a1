//! The numbered console menu that drives a [`TaskStore`].
//!
//! Input and output are injected so the loop runs the same against a
//! terminal or an in-memory buffer.

use log::debug;
use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use todo_core::AppError;
use todo_core::task_store::TaskStore;

const MENU_RULE_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Add,
    View,
    Complete,
    Delete,
    ClearCompleted,
    Exit,
}

impl Choice {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::View),
            "3" => Some(Self::Complete),
            "4" => Some(Self::Delete),
            "5" => Some(Self::ClearCompleted),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskIdInput {
    Id(i64),
    /// A well-formed integer outside `i64`; no task can carry it.
    OutOfRange(String),
}

pub fn parse_task_id(raw: &str) -> Result<TaskIdInput, AppError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(id) => Ok(TaskIdInput::Id(id)),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(TaskIdInput::OutOfRange(canonical_integer(trimmed)))
        }
        Err(_) => Err(AppError::invalid_input("task id must be an integer")),
    }
}

// Drops a leading `+` and leading zeros: "+007" reads back as "7".
fn canonical_integer(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    format!("{sign}{}", digits.trim_start_matches('0'))
}

/// Only a lone `y` or `Y` confirms; the line ending is the only thing stripped.
pub fn is_confirmation(raw: &str) -> bool {
    raw.trim_end_matches(['\r', '\n']).eq_ignore_ascii_case("y")
}

enum Flow {
    Continue,
    Exit,
}

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, text: impl std::fmt::Display) -> Result<(), AppError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn show_menu(&mut self) -> Result<(), AppError> {
        let rule = "=".repeat(MENU_RULE_WIDTH);
        self.say("")?;
        self.say(&rule)?;
        self.say("TO-DO LIST MENU")?;
        self.say(&rule)?;
        self.say("1. Add task")?;
        self.say("2. View tasks")?;
        self.say("3. Complete task")?;
        self.say("4. Delete task")?;
        self.say("5. Clear completed tasks")?;
        self.say("6. Exit")?;
        self.say(&rule)
    }
}

/// Runs until the user picks exit or input ends. Only storage-write and
/// console I/O failures escape; everything else is reported and the loop goes on.
pub fn run_menu<R: BufRead, W: Write>(
    store: &mut TaskStore,
    input: R,
    output: W,
) -> Result<(), AppError> {
    let mut console = Console { input, output };
    console.say("Welcome to your To-Do List!")?;

    loop {
        console.show_menu()?;
        let Some(raw_choice) = console.prompt("Enter your choice (1-6): ")? else {
            debug!("input closed, leaving menu");
            return Ok(());
        };

        let Some(choice) = Choice::parse(&raw_choice) else {
            console.say("Invalid choice! Please enter a number between 1-6.")?;
            continue;
        };

        debug!("menu choice {choice:?}");
        match dispatch(choice, store, &mut console)? {
            Flow::Continue => {}
            Flow::Exit => return Ok(()),
        }
    }
}

fn dispatch<R: BufRead, W: Write>(
    choice: Choice,
    store: &mut TaskStore,
    console: &mut Console<R, W>,
) -> Result<Flow, AppError> {
    match choice {
        Choice::Add => {
            let Some(raw) = console.prompt("Enter task description: ")? else {
                return Ok(Flow::Exit);
            };
            let description = raw.trim();
            if description.is_empty() {
                console.say("Task description cannot be empty!")?;
                return Ok(Flow::Continue);
            }
            match store.add(description) {
                Ok(task) => console.say(format!("✓ Added task: '{}'", task.description))?,
                Err(err) => report(console, err)?,
            }
        }
        Choice::View => {
            write!(console.output, "{}", store.view())?;
        }
        Choice::Complete => {
            let Some(id) = prompt_task_id(console, "Enter task ID to complete: ")? else {
                return Ok(Flow::Exit);
            };
            match id {
                Some(TaskIdInput::Id(id)) => match store.complete(id) {
                    Ok(task) => console.say(format!("✓ Completed task: '{}'", task.description))?,
                    Err(err) => report(console, err)?,
                },
                Some(TaskIdInput::OutOfRange(text)) => report_missing(console, &text)?,
                None => {}
            }
        }
        Choice::Delete => {
            let Some(id) = prompt_task_id(console, "Enter task ID to delete: ")? else {
                return Ok(Flow::Exit);
            };
            match id {
                Some(TaskIdInput::Id(id)) => match store.delete(id) {
                    Ok(task) => console.say(format!("✗ Deleted task: '{}'", task.description))?,
                    Err(err) => report(console, err)?,
                },
                Some(TaskIdInput::OutOfRange(text)) => report_missing(console, &text)?,
                None => {}
            }
        }
        Choice::ClearCompleted => {
            let Some(answer) =
                console.prompt("Are you sure you want to clear all completed tasks? (y/n): ")?
            else {
                return Ok(Flow::Exit);
            };
            if is_confirmation(&answer) {
                let removed = store.clear_completed()?;
                console.say(format!("✗ Removed {removed} completed task(s)"))?;
            }
        }
        Choice::Exit => {
            console.say("Thanks for using the To-Do List! Goodbye!")?;
            return Ok(Flow::Exit);
        }
    }

    Ok(Flow::Continue)
}

// Outer `None`: input ended. Inner `None`: the id was rejected and reported.
fn prompt_task_id<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    text: &str,
) -> Result<Option<Option<TaskIdInput>>, AppError> {
    let Some(raw) = console.prompt(text)? else {
        return Ok(None);
    };
    match parse_task_id(&raw) {
        Ok(id) => Ok(Some(Some(id))),
        Err(_) => {
            console.say("Please enter a valid task ID number!")?;
            Ok(Some(None))
        }
    }
}

fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    err: AppError,
) -> Result<(), AppError> {
    match err {
        AppError::NotFound { id } => report_missing(console, &id.to_string()),
        AppError::AlreadyCompleted { description } => {
            console.say(format!("Task '{description}' is already completed!"))
        }
        AppError::InvalidInput(_) => console.say("Task description cannot be empty!"),
        fatal if fatal.is_fatal() => Err(fatal),
        other => console.say(format!("ERROR: {other}")),
    }
}

fn report_missing<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    id: &str,
) -> Result<(), AppError> {
    console.say(format!("Task with ID {id} not found!"))
}
