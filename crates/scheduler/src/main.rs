//! Terminal front end for the class scheduler.
//!
//! Reads one command per line from stdin and prints the resulting view.

mod cli;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use class_scheduler::presentation::ViewState;
use class_scheduler::{ScheduleBook, ScheduleConfig};

use crate::cli::{App, Flow};

#[derive(Parser)]
#[command(name = "scheduler")]
#[command(about = "Manage students and their weekly class schedules")]
struct Args {
    /// JSON configuration file (palette, time options, seed students)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ScheduleConfig::load_from_file(path)
            .map_err(|e| anyhow!("failed to load config {}: {e}", path.display()))?,
        None => ScheduleConfig::default(),
    };

    let book = ScheduleBook::from_config(&config);
    info!(students = book.students().len(), "Schedule ready");
    let mut app = App::new(book, ViewState::new(config));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", app.view.render(&app.book))?;
    writeln!(out, "Type `help` for commands.")?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match cli::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match app.execute(command, Instant::now()) {
            Ok((Flow::Quit, _)) => break,
            Ok((Flow::Continue, text)) => writeln!(out, "{text}")?,
            Err(e) => {
                warn!(error = %e, "Command failed");
                writeln!(out, "{e}")?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
