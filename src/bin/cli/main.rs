mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "subjectfocus-cli", about = "Study planning and flashcard CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage study sets and their flashcards
    #[command(subcommand)]
    Sets(SetsCommand),

    /// Drill a study set's flashcards and record the results
    Practice {
        /// Study set title (case-insensitive prefix match)
        set: String,
    },

    /// Manage upcoming exams
    #[command(subcommand)]
    Exams(ExamsCommand),

    /// Show a month of exams and study sessions
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Chat with the study planner to schedule sessions for your exams
    Plan,
}

#[derive(Subcommand)]
enum SetsCommand {
    /// List all study sets
    List,

    /// Show a set's cards, progress, and readiness
    Show {
        /// Study set title (case-insensitive prefix match)
        set: String,
    },

    /// Create a new study set
    New {
        /// Title of the set
        title: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },

    /// Add a flashcard to a set
    AddCard {
        /// Study set title (case-insensitive prefix match)
        set: String,
        /// Front of the card (the question)
        front: String,
        /// Back of the card (the answer)
        back: String,
    },

    /// Delete a study set and its cards
    Delete {
        /// Study set title (case-insensitive prefix match)
        set: String,
    },
}

#[derive(Subcommand)]
enum ExamsCommand {
    /// List upcoming exams
    List,

    /// Add an exam to the calendar
    Add {
        /// Exam title
        title: String,
        /// When the exam starts: "YYYY-MM-DD" or "YYYY-MM-DD HH:MM"
        when: String,
        /// Link a study set (case-insensitive prefix match)
        #[arg(long)]
        set: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Sets(subcmd) => match subcmd {
            SetsCommand::List => commands::sets::run_list(&app, &cli.format)?,
            SetsCommand::Show { set } => commands::sets::run_show(&app, &set, &cli.format)?,
            SetsCommand::New { title, description } => {
                commands::sets::run_new(&app, &title, description.as_deref())?
            }
            SetsCommand::AddCard { set, front, back } => {
                commands::sets::run_add_card(&app, &set, &front, &back)?
            }
            SetsCommand::Delete { set } => commands::sets::run_delete(&app, &set)?,
        },
        Command::Practice { set } => commands::practice::run(&app, &set)?,
        Command::Exams(subcmd) => match subcmd {
            ExamsCommand::List => commands::exams::run_list(&app, &cli.format)?,
            ExamsCommand::Add { title, when, set } => {
                commands::exams::run_add(&app, &title, &when, set.as_deref())?
            }
        },
        Command::Calendar { month } => {
            commands::calendar::run(&app, month.as_deref(), &cli.format)?
        }
        Command::Plan => commands::plan::run(&app)?,
    }

    Ok(())
}
