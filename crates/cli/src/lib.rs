pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::review::DecisionArg;

#[derive(Debug, Parser)]
#[command(
    name = "promotrack",
    about = "Academic promotion workflow CLI",
    long_about = "Browse, submit and review academic promotion requests against the promotion API.",
    after_help = "Examples:\n  promotrack list --status SUBMITTED\n  promotrack review REQ-0007 --decision approve --comments \"Meets criteria\"\n  promotrack config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List promotion requests, optionally narrowed by filters")]
    List {
        #[arg(long, help = "Status selector; a status name or ALL")]
        status: Option<String>,
        #[arg(long, help = "Department id")]
        department: Option<String>,
        #[arg(long, help = "School id")]
        school: Option<String>,
        #[arg(long, help = "Case-insensitive match on applicant name or rank")]
        search: Option<String>,
        #[arg(long, help = "Scope the listing to what this user may see")]
        actor: Option<String>,
    },
    #[command(about = "Show one promotion request with documents and reviews")]
    Show {
        #[arg(help = "Request id")]
        id: String,
    },
    #[command(about = "Count requests per status in workflow order")]
    Summary,
    #[command(about = "Submit a draft request into the approval chain")]
    Submit {
        #[arg(help = "Request id")]
        id: String,
        #[arg(long, help = "Acting user id; defaults to PROMOTRACK_USER_ID")]
        actor: Option<String>,
    },
    #[command(about = "Record an approval or rejection for a request")]
    Review {
        #[arg(help = "Request id")]
        id: String,
        #[arg(long, value_enum, help = "Review decision")]
        decision: DecisionArg,
        #[arg(long, help = "Reviewer comments; required")]
        comments: String,
        #[arg(long, help = "Acting user id; defaults to PROMOTRACK_USER_ID")]
        actor: Option<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List { status, department, school, search, actor } => commands::list::run(
            commands::list::ListArgs { status, department, school, search, actor },
        ),
        Command::Show { id } => commands::show::run(id),
        Command::Summary => commands::summary::run(),
        Command::Submit { id, actor } => commands::submit::run(id, actor),
        Command::Review { id, decision, comments, actor } => {
            commands::review::run(id, decision, comments, actor)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
