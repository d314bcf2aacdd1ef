//! quizstate CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizstate_core::PayloadValue;

mod commands;

use commands::StoreOptions;

#[derive(Parser)]
#[command(
    name = "quizstate",
    version,
    about = "Persist quiz answers and completion state"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding origin documents (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage origin (overrides config)
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save, load, or clear a quiz answer
    Answer {
        #[command(subcommand)]
        action: AnswerAction,
    },

    /// Save, load, or clear a quiz completion
    Completion {
        #[command(subcommand)]
        action: CompletionAction,
    },

    /// Show completion status for one quiz or all recorded quizzes
    Status {
        /// Quiz id (omit to list every quiz in the origin)
        quiz_id: Option<String>,
    },

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum AnswerAction {
    /// Record the selected answer
    Save {
        quiz_id: String,
        answer: String,

        /// Mark the answer as correct
        #[arg(long)]
        correct: bool,
    },
    /// Print the recorded answer as JSON
    Load { quiz_id: String },
    /// Remove the recorded answer
    Clear { quiz_id: String },
}

#[derive(Subcommand)]
enum CompletionAction {
    /// Mark the quiz completed
    Save {
        quiz_id: String,

        /// Extra field as key=value (repeatable); values parse as bool, number, or string
        #[arg(long = "field", value_parser = commands::completion::parse_field)]
        fields: Vec<(String, PayloadValue)>,
    },
    /// Print the completion record as JSON
    Load { quiz_id: String },
    /// Remove the completion record
    Clear { quiz_id: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizstate=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let opts = StoreOptions {
        config: cli.config,
        data_dir: cli.data_dir,
        origin: cli.origin,
    };

    let result = match cli.command {
        Commands::Answer { action } => match action {
            AnswerAction::Save {
                quiz_id,
                answer,
                correct,
            } => commands::answer::save(&opts, &quiz_id, &answer, correct),
            AnswerAction::Load { quiz_id } => commands::answer::load(&opts, &quiz_id),
            AnswerAction::Clear { quiz_id } => commands::answer::clear(&opts, &quiz_id),
        },
        Commands::Completion { action } => match action {
            CompletionAction::Save { quiz_id, fields } => {
                commands::completion::save(&opts, &quiz_id, fields)
            }
            CompletionAction::Load { quiz_id } => commands::completion::load(&opts, &quiz_id),
            CompletionAction::Clear { quiz_id } => commands::completion::clear(&opts, &quiz_id),
        },
        Commands::Status { quiz_id } => commands::status::execute(&opts, quiz_id),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
