mod logging;
mod sync;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use sync::{Outcome, RunOptions, DEFAULT_CONFIG_PATH, DEFAULT_MODLIST_PATH, DEFAULT_STATE_PATH};

/// Import a modlist.json into a Modrinth collection.
#[derive(Parser, Debug)]
#[command(name = "modrinth-collection-sync", version)]
struct Cli {
    /// Path to config file (JSON, or TOML with a .toml extension)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to modlist JSON
    #[arg(short, long, default_value = DEFAULT_MODLIST_PATH)]
    modlist: PathBuf,

    /// Collection ID to use (skips the interactive collection picker)
    #[arg(long)]
    collection_id: Option<String>,

    /// Do everything except the final PATCH call
    #[arg(long)]
    dry_run: bool,

    /// Where the local snapshot of your collections is kept
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    state_file: PathBuf,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        RunOptions {
            config_path: cli.config,
            modlist_path: cli.modlist,
            state_path: cli.state_file,
            collection_id: cli.collection_id,
            dry_run: cli.dry_run,
        }
    }
}

fn main() -> ExitCode {
    let options = RunOptions::from(Cli::parse());
    let _guard = logging::init(Path::new("."));

    match sync::run(&options) {
        Ok(Outcome::Updated {
            collection_id,
            total,
            added,
        }) => {
            tracing::info!(%collection_id, total, added, "run finished");
            ExitCode::SUCCESS
        }
        Ok(Outcome::DryRun {
            collection_id,
            total,
            added,
        }) => {
            tracing::info!(%collection_id, total, added, "dry run finished");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Aborted) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            tracing::error!(error = %message, "run failed");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_usual_file_names() {
        let options = RunOptions::from(Cli::parse_from(["modrinth-collection-sync"]));
        assert_eq!(options.config_path, PathBuf::from("config.json"));
        assert_eq!(options.modlist_path, PathBuf::from("modlist.json"));
        assert_eq!(options.state_path, PathBuf::from("modrinth_state.json"));
        assert_eq!(options.collection_id, None);
        assert!(!options.dry_run);
    }

    #[test]
    fn flags_are_parsed() {
        let options = RunOptions::from(Cli::parse_from([
            "modrinth-collection-sync",
            "-c",
            "creds.toml",
            "--modlist",
            "pack.json",
            "--collection-id",
            "AbCd1234",
            "--dry-run",
        ]));
        assert_eq!(options.config_path, PathBuf::from("creds.toml"));
        assert_eq!(options.modlist_path, PathBuf::from("pack.json"));
        assert_eq!(options.collection_id.as_deref(), Some("AbCd1234"));
        assert!(options.dry_run);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
