//! Command-line front end for the todo calendar.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and bootstrap logging.
//! - Drive one `TaskSession` pass per invocation and print the result.

mod render;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use todocal_core::{
    default_day, init_logging, month_days, parse_date, year_overview, AppConfig, ConfigOverrides,
    JsonFileStore, Priority, SystemClock, TaskCounts, TaskFilter, TaskSession, ViewScope,
};

type Session = TaskSession<JsonFileStore, SystemClock>;

#[derive(Parser)]
#[command(name = "todocal", version, about = "Calendar-grouped personal task list")]
struct Cli {
    /// Backing JSON file
    #[arg(long = "data", env = "TODOCAL_DATA", global = true)]
    data: Option<PathBuf>,
    /// Log level: trace, debug, info, warn, error
    #[arg(long = "log-level", env = "TODOCAL_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    /// Directory for rolling log files
    #[arg(long = "log-dir", env = "TODOCAL_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show tasks grouped by year, month or day (default: this year)
    List {
        #[arg(long, value_enum)]
        view: Option<View>,
        #[arg(short = 'y', long)]
        year: Option<i32>,
        #[arg(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Day YYYY-MM-DD
        #[arg(short = 'd', long, value_parser = parse_date_arg)]
        day: Option<NaiveDate>,
        /// Include completed tasks
        #[arg(short = 'a', long)]
        all: bool,
    },
    /// Add a task
    Add {
        /// Task title
        title: Vec<String>,
        /// Due date YYYY-MM-DD (default: today)
        #[arg(short = 'd', long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// P0 (most urgent) to P3
        #[arg(short = 'p', long, default_value = "P2")]
        priority: Priority,
        #[arg(short = 'n', long, default_value = "")]
        notes: String,
    },
    /// Mark a task done (id or unique id prefix)
    Done { id: String },
    /// Mark a task not done (id or unique id prefix)
    Undo { id: String },
    /// Delete a task (id or unique id prefix)
    Delete { id: String },
    /// List years that have tasks
    Years,
    /// Show task counts, optionally for one year
    Stats {
        #[arg(short = 'y', long)]
        year: Option<i32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Year,
    Month,
    Day,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::resolve(ConfigOverrides {
        data_path: cli.data,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    })?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut session = TaskSession::open(JsonFileStore::new(&config.data_path), SystemClock)?;
    if session.last_rollover() > 0 {
        println!(
            "Carried forward {} unfinished task(s) to {}",
            session.last_rollover(),
            session.today()
        );
    }

    let command = cli.command.unwrap_or(Command::List {
        view: None,
        year: None,
        month: None,
        day: None,
        all: false,
    });
    match command {
        Command::List {
            view,
            year,
            month,
            day,
            all,
        } => list(&mut session, view, year, month, day, all),
        Command::Add {
            title,
            date,
            priority,
            notes,
        } => {
            let date = date.unwrap_or_else(|| session.today());
            match session.add_task(&title.join(" "), date, priority, &notes)? {
                Some(id) => println!("Added {id}"),
                None => println!("Nothing added: title is empty."),
            }
            Ok(())
        }
        Command::Done { id } => set_done(&mut session, &id, true),
        Command::Undo { id } => set_done(&mut session, &id, false),
        Command::Delete { id } => {
            let id = session.resolve_id(&id)?;
            session.delete_task(&id)?;
            println!("Deleted {id}");
            Ok(())
        }
        Command::Years => {
            for year in session.years() {
                println!("{year}");
            }
            Ok(())
        }
        Command::Stats { year } => {
            session.refresh_day()?;
            let (label, counts) = match year {
                Some(year) => {
                    let in_year = session.tasks().iter().filter(|task| task.date.year() == year);
                    (year.to_string(), TaskCounts::from_tasks(in_year))
                }
                None => ("All years".to_string(), session.counts()),
            };
            print!("{}", render::stats(&label, &counts));
            Ok(())
        }
    }
}

fn list(
    session: &mut Session,
    view: Option<View>,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<NaiveDate>,
    include_done: bool,
) -> Result<(), Box<dyn Error>> {
    session.refresh_day()?;
    if session.tasks().is_empty() {
        println!("No entries yet.");
        print!("{}", render::footer(&session.counts()));
        return Ok(());
    }

    let today = session.today();
    let day = match (day, year) {
        (Some(day), Some(year)) => Some(day_in_year(day, year)?),
        (day, _) => day,
    };
    let year = year.unwrap_or(today.year());
    let view = view.unwrap_or(match (day, month) {
        (Some(_), _) => View::Day,
        (None, Some(_)) => View::Month,
        (None, None) => View::Year,
    });

    let text = match view {
        View::Year => render::year_view(&year_overview(session.tasks(), year, include_done)),
        View::Month => {
            let month = month.unwrap_or(today.month());
            render::month_view(&month_days(session.tasks(), year, month, include_done))
        }
        View::Day => {
            let day = day.unwrap_or_else(|| default_day(year, today));
            let filter = TaskFilter {
                scope: ViewScope::Day(day),
                include_done,
            };
            render::day_view(&session.visible_tasks(&filter)?)
        }
    };
    print!("{text}");
    print!("{}", render::footer(&session.counts()));
    Ok(())
}

fn set_done(session: &mut Session, id: &str, done: bool) -> Result<(), Box<dyn Error>> {
    let id = session.resolve_id(id)?;
    if !session.toggle_task(&id, done)? {
        warn!("event=cli_toggle module=cli status=skip reason=not_found task_id={id}");
    }
    println!("{} {id}", if done { "Done" } else { "Reopened" });
    Ok(())
}

/// Moves `day` into `year`, keeping month and day of month.
fn day_in_year(day: NaiveDate, year: i32) -> Result<NaiveDate, String> {
    day.with_year(year)
        .ok_or_else(|| format!("{day} has no counterpart in {year}"))
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("invalid date `{value}`; expected YYYY-MM-DD"))
}
