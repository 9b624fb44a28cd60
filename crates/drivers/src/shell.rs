use std::path::PathBuf;

use shelf_adapters::{
    present_ingest_report, present_preview, present_record_row, read_dropped, select_files,
};
use shelf_application::{
    ApplicationError, DownloadCommand, DownloadOutcome, GalleryController, IngestCommand,
    OpenPreviewCommand, PreviewOutcome, RemoveCommand, RemoveOutcome,
};
use shelf_domain::{RecordId, SortMode};
use tracing::warn;

use crate::console;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Sort(SortMode),
    Add(Vec<PathBuf>),
    Drop(PathBuf),
    Preview(RecordId),
    Close,
    Download(RecordId),
    Remove(RecordId),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse_shell_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb {
        "list" | "ls" => ShellCommand::List,
        "search" => ShellCommand::Search(rest.to_string()),
        "sort" => ShellCommand::Sort(
            rest.parse::<SortMode>()
                .map_err(|error| error.to_string())?,
        ),
        "add" => {
            if rest.is_empty() {
                return Err("add needs at least one path".to_string());
            }
            ShellCommand::Add(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "drop" => {
            if rest.is_empty() {
                return Err("drop needs a uri-list file".to_string());
            }
            ShellCommand::Drop(PathBuf::from(rest))
        }
        "preview" | "open" => ShellCommand::Preview(parse_record_id(rest)?),
        "close" => ShellCommand::Close,
        "download" | "save" => ShellCommand::Download(parse_record_id(rest)?),
        "remove" | "rm" => ShellCommand::Remove(parse_record_id(rest)?),
        "refresh" => ShellCommand::Refresh,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

pub fn parse_record_id(text: &str) -> Result<RecordId, String> {
    let value = text
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid record id: {text:?}"))?;
    RecordId::new(value).map_err(|error| error.to_string())
}

pub async fn execute(
    controller: &mut GalleryController,
    command: ShellCommand,
) -> Result<Flow, ApplicationError> {
    match command {
        ShellCommand::List => print_view(controller),
        ShellCommand::Search(text) => {
            controller.set_search_text(text);
            print_view(controller);
        }
        ShellCommand::Sort(mode) => {
            controller.set_sort_mode(mode);
            print_view(controller);
        }
        ShellCommand::Add(paths) => {
            let files = select_files(&paths)?;
            let report = controller.ingest(IngestCommand { files }).await?;
            println!("{}", present_ingest_report(&report));
        }
        ShellCommand::Drop(list_path) => {
            let text = std::fs::read_to_string(&list_path).map_err(|error| {
                ApplicationError::InvalidInput(format!(
                    "cannot read {}: {error}",
                    list_path.display()
                ))
            })?;
            let files = read_dropped(&text)?;
            let report = controller.ingest(IngestCommand { files }).await?;
            println!("{}", present_ingest_report(&report));
        }
        ShellCommand::Preview(record_id) => {
            match controller
                .open_preview(OpenPreviewCommand { record_id })
                .await?
            {
                PreviewOutcome::Opened(info) => println!("{}", present_preview(&info)),
                PreviewOutcome::NotFound(id) => println!("record {id} not found"),
            }
        }
        ShellCommand::Close => {
            if !controller.close_preview() {
                println!("no preview open");
            }
        }
        ShellCommand::Download(record_id) => {
            match controller.download(DownloadCommand { record_id }).await? {
                DownloadOutcome::Saved { location } => println!("saved to {location}"),
                DownloadOutcome::NotFound(id) => println!("record {id} not found"),
            }
        }
        ShellCommand::Remove(record_id) => {
            match controller.remove(RemoveCommand { record_id }).await? {
                RemoveOutcome::Removed => println!("removed {record_id}"),
                RemoveOutcome::Declined => println!("kept {record_id}"),
            }
        }
        ShellCommand::Refresh => {
            controller.refresh().await?;
            print_view(controller);
        }
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Interactive loop over one controller, so the preview stays open between
/// commands. Failures are reported and the session goes on.
pub async fn run_session(controller: &mut GalleryController) -> std::io::Result<()> {
    println!("shelf: {} file(s). Type `help` for commands.", controller.records().len());
    loop {
        console::prompt("shelf> ");
        let Some(line) = console::read_line().await? else {
            println!();
            break;
        };
        let command = match parse_shell_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match execute(controller, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(error) => {
                warn!(retryable = error.is_retryable(), "{error}");
                eprintln!("error: {error}");
            }
        }
    }
    controller.close_preview();
    Ok(())
}

pub fn print_view(controller: &GalleryController) {
    let view = controller.derived_view();
    if view.is_empty() {
        if controller.search_text().is_empty() {
            println!("no files on the shelf");
        } else {
            println!("no files match {:?}", controller.search_text());
        }
        return;
    }
    for record in &view {
        println!("{}", present_record_row(record));
    }
}

fn print_help() {
    println!("commands:");
    println!("  list                      show files (current search and sort)");
    println!("  search <text>             filter by name, empty to clear");
    println!("  sort <newest|oldest|name-asc|name-desc>");
    println!("  add <path>...             store files or whole directories");
    println!("  drop <uri-list-file>      store files named in a dropped uri list");
    println!("  preview <id>              open a preview, closing any other");
    println!("  close                     close the preview");
    println!("  download <id>             save a copy into the downloads directory");
    println!("  remove <id>               delete after confirmation");
    println!("  refresh                   reload from the store");
    println!("  quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_commands() {
        assert_eq!(parse_shell_line("  "), Ok(None));
        assert_eq!(parse_shell_line("ls"), Ok(Some(ShellCommand::List)));
        assert_eq!(
            parse_shell_line("search My Clip"),
            Ok(Some(ShellCommand::Search("My Clip".to_string())))
        );
        assert_eq!(
            parse_shell_line("search"),
            Ok(Some(ShellCommand::Search(String::new())))
        );
        assert_eq!(
            parse_shell_line("sort name-asc"),
            Ok(Some(ShellCommand::Sort(SortMode::NameAscending)))
        );
        assert_eq!(
            parse_shell_line("add a.txt b.txt"),
            Ok(Some(ShellCommand::Add(vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt")
            ])))
        );
        assert_eq!(parse_shell_line("quit"), Ok(Some(ShellCommand::Quit)));
    }

    #[test]
    fn parse_record_commands() {
        let id = RecordId::new(7).expect("id");
        assert_eq!(
            parse_shell_line("preview 7"),
            Ok(Some(ShellCommand::Preview(id)))
        );
        assert_eq!(parse_shell_line("rm 7"), Ok(Some(ShellCommand::Remove(id))));
        assert!(parse_shell_line("download x").is_err());
        assert!(parse_shell_line("remove 0").is_err());
        assert!(parse_shell_line("preview").is_err());
    }

    #[test]
    fn parse_rejects_unknown_input() {
        assert!(parse_shell_line("sort size").is_err());
        assert!(parse_shell_line("add").is_err());
        assert!(parse_shell_line("frobnicate").is_err());
    }
}
