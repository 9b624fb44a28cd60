mod config;
mod console;
mod logging;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use config::AppConfig;
use shelf_adapters::{
    present_records_json, DirectorySaveTarget, SqliteObjectStore, SystemClock, TempFileResources,
};
use shelf_application::{ApplicationError, ConfirmationGate, GalleryController, ObjectStore};
use shelf_domain::{RecordId, SortMode};
use shell::{Flow, ShellCommand};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "shelf")]
#[command(about = "Keep files in a local shelf, then search, preview, download or remove them")]
#[command(version)]
struct Cli {
    /// SQLite file holding the shelf
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Directory for temporary preview files
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
    /// Directory downloads are saved into
    #[arg(long, global = true)]
    downloads_dir: Option<PathBuf>,
    /// Refuse writes once stored payloads would exceed this many bytes
    #[arg(long, global = true)]
    max_bytes: Option<u64>,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive session (default)
    Shell,
    /// Store files or whole directories
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Store the files named in a text/uri-list file
    Drop { uri_list: PathBuf },
    /// List stored files
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "newest", value_parser = parse_sort_mode)]
        sort: SortMode,
        #[arg(long)]
        json: bool,
    },
    /// Open a preview and keep it until Enter is pressed
    Preview {
        #[arg(value_parser = shell::parse_record_id)]
        id: RecordId,
    },
    /// Save a copy of a stored file
    Download {
        #[arg(value_parser = shell::parse_record_id)]
        id: RecordId,
        /// Target directory, overriding --downloads-dir
        #[arg(long)]
        to: Option<PathBuf>,
    },
    /// Delete a stored file
    Remove {
        #[arg(value_parser = shell::parse_record_id)]
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Usage errors are reported by clap itself, with exit code 2.
#[derive(Debug)]
enum CommandError {
    Runtime(String),
}

impl From<ApplicationError> for CommandError {
    fn from(error: ApplicationError) -> Self {
        Self::Runtime(error.to_string())
    }
}

fn parse_sort_mode(value: &str) -> Result<SortMode, String> {
    value.parse::<SortMode>().map_err(|error| error.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init_logging(&config.log_level);

    match run(cli.command.unwrap_or(Command::Shell), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Runtime(message)) => {
            error!("{message}");
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::default();
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    if let Some(downloads_dir) = &cli.downloads_dir {
        config.downloads_dir = downloads_dir.clone();
    }
    if let Some(max_bytes) = cli.max_bytes {
        config.max_total_bytes = Some(max_bytes);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(Command::Download { to: Some(to), .. }) = &cli.command {
        config.downloads_dir = to.clone();
    }
    config
}

async fn build_controller(
    config: &AppConfig,
    confirmation: Box<dyn ConfirmationGate>,
) -> Result<GalleryController, CommandError> {
    let clock = Arc::new(SystemClock);
    let store: Box<dyn ObjectStore> = match config.max_total_bytes {
        Some(limit) => Box::new(SqliteObjectStore::with_capacity(
            config.catalog_path.clone(),
            clock,
            limit,
        )),
        None => Box::new(SqliteObjectStore::new(config.catalog_path.clone(), clock)),
    };
    let resources = Arc::new(TempFileResources::new(config.resources_dir())?);

    let mut controller = GalleryController::new(
        store,
        resources,
        Box::new(DirectorySaveTarget::new(config.downloads_dir.clone())),
        confirmation,
    );
    controller
        .bootstrap()
        .await
        .map_err(|error| CommandError::Runtime(format!("failed to open shelf: {error}")))?;
    info!(
        catalog = %config.catalog_path.display(),
        records = controller.records().len(),
        "shelf ready"
    );
    Ok(controller)
}

async fn run(command: Command, config: AppConfig) -> Result<(), CommandError> {
    let confirmation: Box<dyn ConfirmationGate> = match &command {
        Command::Remove { yes: true, .. } => Box::new(console::AssumeYes),
        _ => Box::new(console::PromptConfirmation),
    };
    let mut controller = build_controller(&config, confirmation).await?;

    match command {
        Command::Shell => shell::run_session(&mut controller)
            .await
            .map_err(|error| CommandError::Runtime(format!("terminal error: {error}"))),
        Command::Ingest { paths } => run_once(&mut controller, ShellCommand::Add(paths)).await,
        Command::Drop { uri_list } => run_once(&mut controller, ShellCommand::Drop(uri_list)).await,
        Command::List { search, sort, json } => {
            controller.set_search_text(search.unwrap_or_default());
            controller.set_sort_mode(sort);
            if json {
                let rendered = present_records_json(&controller.derived_view())
                    .map_err(|error| CommandError::Runtime(error.to_string()))?;
                println!("{rendered}");
            } else {
                shell::print_view(&controller);
            }
            Ok(())
        }
        Command::Preview { id } => {
            run_once(&mut controller, ShellCommand::Preview(id)).await?;
            if controller.active_preview().is_some() {
                console::prompt("press Enter to close the preview ");
                console::read_line()
                    .await
                    .map_err(|error| CommandError::Runtime(error.to_string()))?;
                controller.close_preview();
            }
            Ok(())
        }
        Command::Download { id, .. } => {
            run_once(&mut controller, ShellCommand::Download(id)).await
        }
        Command::Remove { id, .. } => run_once(&mut controller, ShellCommand::Remove(id)).await,
    }
}

async fn run_once(
    controller: &mut GalleryController,
    command: ShellCommand,
) -> Result<(), CommandError> {
    match shell::execute(controller, command).await? {
        Flow::Continue | Flow::Quit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ingest_command() {
        let cli = Cli::try_parse_from(["shelf", "ingest", "a.txt", "clips"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Command::Ingest { ref paths }) if paths.len() == 2
        ));
    }

    #[test]
    fn ingest_requires_a_path() {
        assert!(Cli::try_parse_from(["shelf", "ingest"]).is_err());
    }

    #[test]
    fn list_parses_sort_mode() {
        let cli = Cli::try_parse_from(["shelf", "list", "--sort", "name-asc", "--search", "txt"])
            .expect("parse");
        match cli.command {
            Some(Command::List { search, sort, json }) => {
                assert_eq!(search.as_deref(), Some("txt"));
                assert_eq!(sort, SortMode::NameAscending);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["shelf", "list", "--sort", "size"]).is_err());
    }

    #[test]
    fn global_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "shelf",
            "download",
            "3",
            "--to",
            "out",
            "--catalog",
            "data/shelf.db",
            "--max-bytes",
            "2048",
        ])
        .expect("parse");
        let config = build_config(&cli);
        assert_eq!(config.catalog_path, PathBuf::from("data/shelf.db"));
        assert_eq!(config.downloads_dir, PathBuf::from("out"));
        assert_eq!(config.max_total_bytes, Some(2048));
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
    }

    #[test]
    fn record_ids_are_validated_while_parsing() {
        let cli = Cli::try_parse_from(["shelf", "remove", "7", "--yes"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Command::Remove { id, yes: true }) if id == RecordId::new(7).expect("id")
        ));
        assert!(Cli::try_parse_from(["shelf", "preview", "0"]).is_err());
        assert!(Cli::try_parse_from(["shelf", "download", "abc"]).is_err());
    }

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["shelf"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn one_shot_commands_share_the_catalog() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let source = dir.path().join("b.txt");
        std::fs::write(&source, b"bee").expect("write");

        let config = AppConfig {
            catalog_path: dir.path().join("shelf.sqlite3"),
            cache_dir: dir.path().join("cache"),
            downloads_dir: dir.path().join("downloads"),
            ..AppConfig::default()
        };

        run(Command::Ingest { paths: vec![source] }, config.clone())
            .await
            .expect("ingest");
        let id = RecordId::new(1).expect("id");
        run(Command::Download { id, to: None }, config.clone())
            .await
            .expect("download");
        assert_eq!(
            std::fs::read(dir.path().join("downloads").join("b.txt")).expect("read"),
            b"bee"
        );

        run(Command::Remove { id, yes: true }, config.clone())
            .await
            .expect("remove");
        let controller = build_controller(&config, Box::new(console::AssumeYes))
            .await
            .expect("controller");
        assert!(controller.records().is_empty());
    }
}
