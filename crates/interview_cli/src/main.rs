//! `interview` command line entry point.
//!
//! # Responsibility
//! - Seed the problem catalog into the selected document store.
//! - Validate the catalog and read single problems back.
//!
//! # Invariants
//! - The store handle lives only for the duration of one command.
//! - `seed` exits successfully even when individual writes fail.

use clap::{Args, Parser, Subcommand, ValueEnum};
use interview_core::db::open_db;
use interview_core::{
    default_log_level, init_logging, AppClient, AppConfig, Catalog, DocumentStore,
    MemoryDocumentStore, ProblemService, SeedReport, SeedService, SqliteDocumentStore,
};
use log::error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "interview.db";

#[derive(Debug, Parser)]
#[command(name = "interview", author, version, about = "Interview problem catalog tools")]
struct Cli {
    /// JSON web-config file; falls back to FIREBASE_* environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files, in addition to stderr.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write every catalog problem into the store.
    Seed {
        #[command(flatten)]
        store: StoreArgs,

        /// Alternate catalog JSON instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Check the catalog for invalid records and duplicate ids.
    Validate {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print one stored problem as JSON.
    Show {
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Debug, Args)]
struct StoreArgs {
    #[arg(long, value_enum, default_value_t = Backend::Firestore)]
    backend: Backend,

    /// SQLite file used by the `sqlite` backend.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Firestore,
    Sqlite,
    Memory,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        Command::Seed { store, catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let report = with_store(cli, store, |store| SeedService::new(store).seed(&catalog))?;

            for line in report_lines(&catalog, &report) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Validate { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            println!("{} problems are valid", catalog.len());
            for category in catalog.categories() {
                let count = catalog
                    .iter()
                    .filter(|problem| problem.categories.iter().any(|tag| tag == category))
                    .count();
                println!("  {category}: {count}");
            }
            Ok(())
        }
        Command::Show { id, store } => {
            let problem = with_store(cli, store, |store| {
                ProblemService::new(store).get_problem(id)
            })?
            .map_err(|err| format!("failed to read `{id}`: {err}"))?
            .ok_or_else(|| format!("problem `{id}` not found"))?;

            let rendered = serde_json::to_string_pretty(&problem)
                .map_err(|err| format!("failed to render `{id}`: {err}"))?;
            println!("{rendered}");
            Ok(())
        }
    }
}

/// One line per catalog entry in authored order, then the run total.
fn report_lines(catalog: &Catalog, report: &SeedReport) -> Vec<String> {
    let mut lines: Vec<String> = catalog
        .iter()
        .filter_map(|problem| {
            if let Some(failure) = report.failures.iter().find(|f| f.id == problem.id) {
                Some(format!("✗ Error adding {}: {}", failure.title, failure.error))
            } else if report.written.contains(&problem.id) {
                Some(format!("✓ Added: {}", problem.title))
            } else {
                None
            }
        })
        .collect();
    lines.push(format!("\nDone! Seeded {} problems.", report.attempted));
    lines
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("failed to read catalog `{}`: {err}", path.display()))?;
            Catalog::from_json(&text).map_err(|err| err.to_string())
        }
        None => Catalog::builtin().map_err(|err| err.to_string()),
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, String> {
    match &cli.config {
        Some(path) => AppConfig::from_json_file(path),
        None => AppConfig::from_env(),
    }
    .map_err(|err| err.to_string())
}

/// Opens the selected backend, hands it to `run`, and releases it on return.
fn with_store<T>(
    cli: &Cli,
    args: &StoreArgs,
    run: impl FnOnce(&dyn DocumentStore) -> T,
) -> Result<T, String> {
    match args.backend {
        Backend::Memory => {
            let store = MemoryDocumentStore::new();
            Ok(run(&store))
        }
        Backend::Sqlite => {
            let conn = open_db(&args.db)
                .map_err(|err| format!("failed to open `{}`: {err}", args.db.display()))?;
            let output = run(&SqliteDocumentStore::new(&conn));
            conn.close()
                .map_err(|(_, err)| format!("failed to close `{}`: {err}", args.db.display()))?;
            Ok(output)
        }
        Backend::Firestore => {
            let config = load_config(cli)?;
            let client = AppClient::initialize(&config).map_err(|err| err.to_string())?;
            Ok(run(client.db()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{report_lines, Backend, Cli, Command};
    use clap::{CommandFactory, Parser};
    use interview_core::{Catalog, SeedService, SqliteDocumentStore};

    #[test]
    fn seed_output_confirms_each_entry_and_reports_failures() {
        let conn = interview_core::db::open_db_in_memory().unwrap();
        let store = SqliteDocumentStore::new(&conn);
        let catalog = Catalog::builtin().unwrap();
        let mut report = SeedService::new(&store).seed(&catalog);

        let lines = report_lines(&catalog, &report);
        assert_eq!(lines.len(), catalog.len() + 1);
        assert_eq!(lines[0], "✓ Added: Find Max Average");
        assert!(lines[..catalog.len()].iter().all(|line| line.starts_with("✓ Added: ")));
        assert_eq!(lines[catalog.len()], "\nDone! Seeded 24 problems.");

        let failed = report.written.remove(1);
        report.failures.push(interview_core::SeedFailure {
            id: failed.clone(),
            title: catalog.get(&failed).unwrap().title.clone(),
            error: "store responded with HTTP 403: denied".to_string(),
        });
        let lines = report_lines(&catalog, &report);
        assert!(lines[1].starts_with("✗ Error adding "));
        assert!(lines[1].ends_with(": store responded with HTTP 403: denied"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_defaults_to_firestore_backend() {
        let cli = Cli::parse_from(["interview", "seed"]);
        match cli.command {
            Command::Seed { store, catalog } => {
                assert_eq!(store.backend, Backend::Firestore);
                assert!(catalog.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_accepts_sqlite_backend_and_global_flags() {
        let cli = Cli::parse_from([
            "interview",
            "show",
            "running-sum",
            "--backend",
            "sqlite",
            "--db",
            "/tmp/catalog.db",
            "--log-level",
            "warn",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
        match cli.command {
            Command::Show { id, store } => {
                assert_eq!(id, "running-sum");
                assert_eq!(store.backend, Backend::Sqlite);
                assert_eq!(store.db.to_str(), Some("/tmp/catalog.db"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
