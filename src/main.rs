mod calc;
mod cmd;
mod data;
mod kiosk;
mod logging;
mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glimpses", about = "event photo carousel for kiosk displays")]
struct Cli {
    /// Path to the data directory containing config, events and assets (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config and event catalog
    Init,
    /// List the events in the catalog
    Events,
    /// Show card width and gap for a viewport width in px
    Layout {
        /// Viewport width in px (e.g. 1920)
        width: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so asset lookups do not depend on
    // the working directory.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let _log_guard = logging::init(&data_dir)?;

    match cli.command {
        None => cmd::root::run(&data_dir),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Events) => cmd::events::run(&data_dir),
        Some(Commands::Layout { width }) => cmd::layout::run(width),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does_not_exist");
        assert!(dir_needs_init(&missing));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("events.yaml"), "events: []").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_cli_parses_layout_width() {
        let cli = Cli::try_parse_from(["glimpses", "layout", "1920"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Layout { width }) if width == 1920.0));
        assert_eq!(cli.data_dir, PathBuf::from("./config"));
    }

    #[test]
    fn test_cli_defaults_to_kiosk() {
        let cli = Cli::try_parse_from(["glimpses", "--data-dir", "/srv/kiosk"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, PathBuf::from("/srv/kiosk"));
    }
}
