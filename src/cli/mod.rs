use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;

use crate::config::Settings;
use crate::error::DaylogError;
use crate::store::{DaylogRef, DaylogStore, Initialized, Listing};
use crate::tui::{DaylogSelector, InteractiveSelector, label_for};

#[derive(Parser, Debug)]
#[command(
    name = "daylog",
    author,
    version,
    about = "Daily task lists kept as YAML files",
    long_about = None
)]
pub struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add a new task to the active daylog
    Add {
        /// Task title (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Toggle tasks between pending and done
    Check {
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Delete tasks
    Delete {
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Show the tasks of the active daylog
    List,

    /// Change a task's title
    Rename {
        index: usize,

        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Choose the active daylog: "today", a file name, or nothing to pick interactively
    Select { identifier: Option<String> },

    /// Move a task to another daylog ("today", a file name, or pick interactively)
    Move {
        index: usize,
        destination: Option<String>,
    },

    /// Print the path of the active daylog
    Current,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose);
    tracing::debug!(command = ?cli.command, "starting");

    let settings = Settings::resolve()?;
    let today = Local::now().date_naive();

    let Initialized { mut store, created } = DaylogStore::ensure_initialized(&settings, today)
        .context("Failed to initialize daylog storage")?;

    if let Some(path) = created {
        println!("Daylog {} has been created", label_for(&path));
    }

    let mut selector = InteractiveSelector::new();
    let output = execute(&mut store, cli.command.unwrap_or(Commands::List), &mut selector)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Run one command against `store`, returning what should be printed
pub fn execute(
    store: &mut DaylogStore,
    command: Commands,
    selector: &mut dyn DaylogSelector,
) -> Result<String> {
    match command {
        Commands::Add { title } => {
            let title = title.join(" ");
            let index = store.add(&title)?;
            Ok(format!("Added task {}: {}", index, title))
        }
        Commands::Check { indices } => {
            store.toggle(&indices)?;
            Ok(String::new())
        }
        Commands::Delete { indices } => {
            let removed = store.remove(&indices)?;
            Ok(format!(
                "Deleted {} task{}",
                removed.len(),
                if removed.len() == 1 { "" } else { "s" }
            ))
        }
        Commands::List => {
            let listing = store.list()?;
            Ok(render_listing(&listing, use_color()))
        }
        Commands::Rename { index, title } => {
            store.rename(index, &title.join(" "))?;
            Ok(String::new())
        }
        Commands::Select { identifier } => {
            let target = DaylogRef::parse(identifier.as_deref());
            let resolved = store.select_daylog(&target, selector)?;

            let mut out = String::new();
            if resolved.created {
                out.push_str(&format!("Daylog {} has been created\n", label_for(&resolved.path)));
            }
            out.push_str(&format!(
                "Selected daylog changed to: {}",
                label_for(&resolved.path)
            ));
            Ok(out)
        }
        Commands::Move { index, destination } => {
            let target = DaylogRef::parse(destination.as_deref());
            let outcome = match store.move_task(index, &target, selector) {
                Ok(outcome) => outcome,
                Err(e @ DaylogError::IndexOutOfRange { .. }) => {
                    return Err(anyhow::Error::new(e)
                        .context("Task is out of scope, specify an existing task"));
                }
                Err(e) => return Err(e.into()),
            };

            let mut out = String::new();
            if outcome.destination.created {
                out.push_str(&format!(
                    "Daylog {} has been created\n",
                    label_for(&outcome.destination.path)
                ));
            }
            out.push_str(&format!(
                "Moved '{}' to {}",
                outcome.task.title,
                label_for(&outcome.destination.path)
            ));
            Ok(out)
        }
        Commands::Current => Ok(store.active_daylog().display().to_string()),
    }
}

fn use_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Frame the tasks in a box titled with the daylog date
pub fn render_listing(listing: &Listing, color: bool) -> String {
    let rows: Vec<(String, String)> = if listing.tasks.is_empty() {
        let plain = "no tasks".to_string();
        let styled = if color {
            plain.clone().dim().to_string()
        } else {
            plain.clone()
        };
        vec![(plain, styled)]
    } else {
        listing
            .tasks
            .iter()
            .map(|(index, task)| {
                let mark = if task.is_done() { "x" } else { "=" };
                let plain = format!("{}. ({}) {}", index, mark, task.title);
                let styled = if color {
                    let mark = if task.is_done() { mark.green() } else { mark.red() };
                    format!("{} {}", format!("{}. ({})", index, mark).bold(), task.title)
                } else {
                    plain.clone()
                };
                (plain, styled)
            })
            .collect()
    };

    const PAD: usize = 5;
    let title = format!(" {} ", listing.date);
    let content_width = rows.iter().map(|(p, _)| p.chars().count()).max().unwrap_or(0);
    let inner = (content_width + PAD * 2).max(title.chars().count() + 2);

    let styled_title = if color {
        title.clone().yellow().bold().to_string()
    } else {
        title.clone()
    };
    let mut out = String::new();
    out.push_str(&format!(
        "╭─{}{}╮\n",
        styled_title,
        "─".repeat(inner - 1 - title.chars().count())
    ));
    out.push_str(&format!("│{}│\n", " ".repeat(inner)));
    for (plain, styled) in &rows {
        let fill = inner - PAD - plain.chars().count();
        out.push_str(&format!("│{}{}{}│\n", " ".repeat(PAD), styled, " ".repeat(fill)));
    }
    out.push_str(&format!("│{}│\n", " ".repeat(inner)));
    out.push_str(&format!("╰{}╯", "─".repeat(inner)));
    out
}
