//! Command-line front end for taskboard.
//!
//! # Responsibility
//! - Map subcommands onto `taskboard_api` operations.
//! - Print every response as pretty JSON on stdout.
//!
//! # Invariants
//! - Exit code is 0 only when the operation succeeded.

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_api::{init_logging, ApiResponse, TaskApi};
use taskboard_core::{core_version, default_log_level, extract_all};

#[derive(Parser)]
#[command(name = "taskboard-cli")]
#[command(about = "Manage tasks and inspect title-derived metadata")]
#[command(version = core_version())]
struct Cli {
    /// SQLite database file (defaults to TASKBOARD_DB_PATH or the temp dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error; only valid together with --log-dir
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks, newest first
    List {
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one task
    Get { id: String },

    /// Create a task
    Create(DraftArgs),

    /// Replace every editable field of a task
    Update {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Delete one task
    Delete { id: String },

    /// Delete several tasks; unknown ids are skipped
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print mentions, hashtags, emails and links found in TEXT
    Extract { text: String },
}

#[derive(Args)]
struct DraftArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, value_parser = ["open", "today"])]
    status: Option<String>,

    #[arg(long, value_parser = ["normal", "high"])]
    priority: Option<String>,

    #[arg(long)]
    public: bool,

    /// Due date as Unix epoch milliseconds
    #[arg(long)]
    due: Option<i64>,
}

impl DraftArgs {
    fn to_json(&self) -> Value {
        let mut draft = json!({
            "title": self.title,
            "is_public": self.public,
            "due_date": self.due,
        });
        if let Some(description) = &self.description {
            draft["description"] = json!(description);
        }
        if let Some(status) = &self.status {
            draft["status"] = json!(status);
        }
        if let Some(priority) = &self.priority {
            draft["priority"] = json!(priority);
        }
        draft
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let error = init_logging(level, log_dir);
        if !error.is_empty() {
            eprintln!("logging disabled: {error}");
        }
    }

    let response = match run(&cli) {
        Ok(response) => response,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    print_json(&response.body);
    if response.ok {
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", response.message);
        ExitCode::FAILURE
    }
}

fn run(cli: &Cli) -> Result<ApiResponse, String> {
    let open_api = || match cli.db.as_ref() {
        Some(path) => TaskApi::open(path),
        None => TaskApi::from_env(),
    };

    let response = match &cli.command {
        Commands::Extract { text } => ApiResponse {
            ok: true,
            status: 200,
            body: json!(extract_all(text)),
            message: String::new(),
        },
        Commands::List { status } => open_api()?.list_tasks(status.as_deref()),
        Commands::Get { id } => open_api()?.get_task(id),
        Commands::Create(draft) => open_api()?.create_task(&draft.to_json().to_string()),
        Commands::Update { id, draft } => {
            open_api()?.update_task(id, &draft.to_json().to_string())
        }
        Commands::Delete { id } => open_api()?.delete_task(id),
        Commands::BulkDelete { ids } => {
            open_api()?.bulk_delete(&json!({ "ids": ids }).to_string())
        }
    };
    Ok(response)
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render response: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_flags_build_a_draft() {
        let cli = Cli::try_parse_from([
            "taskboard-cli",
            "create",
            "--title",
            "ship @team",
            "--status",
            "today",
            "--public",
            "--due",
            "42",
        ])
        .unwrap();

        let Commands::Create(draft) = cli.command else {
            panic!("expected create command");
        };
        let json = draft.to_json();
        assert_eq!(json["title"], "ship @team");
        assert_eq!(json["status"], "today");
        assert_eq!(json["is_public"], true);
        assert_eq!(json["due_date"], 42);
        assert!(json.get("priority").is_none());
    }

    #[test]
    fn log_level_requires_log_dir() {
        for args in [
            ["taskboard-cli", "--log-level", "debug", "list"],
            ["taskboard-cli", "list", "--log-level", "debug"],
        ] {
            let err = Cli::try_parse_from(args).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }

        let cli = Cli::try_parse_from([
            "taskboard-cli",
            "--log-dir",
            "/tmp/taskboard-logs",
            "--log-level",
            "debug",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_status_is_rejected_by_parser() {
        let result =
            Cli::try_parse_from(["taskboard-cli", "create", "--title", "x", "--status", "done"]);
        assert!(result.is_err());
    }
}
