use fs_err as fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::SyncError;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_MODLIST_PATH: &str = "modlist.json";
pub const DEFAULT_STATE_PATH: &str = "modrinth_state.json";

/// Credentials for the Modrinth API.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub user_agent: String,
    pub user_id: String,
}

/// Everything about a run that isn't a credential.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub modlist_path: PathBuf,
    pub state_path: PathBuf,
    pub collection_id: Option<String>,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            config_path: DEFAULT_CONFIG_PATH.into(),
            modlist_path: DEFAULT_MODLIST_PATH.into(),
            state_path: DEFAULT_STATE_PATH.into(),
            collection_id: None,
            dry_run: false,
        }
    }
}

#[derive(Deserialize, Default)]
struct RawConfig {
    token: Option<String>,
    user_agent: Option<String>,
    user_id: Option<String>,
}

const EXPECTED_SHAPE: &str =
    r#"{ "token": "mrp_...", "user_agent": "your-name/your-tool", "user_id": "UWlQXVVZ" }"#;

impl Config {
    /// Reads credentials from a `.toml` or JSON file, depending on the extension.
    pub fn load(path: &Path) -> Result<Config, SyncError> {
        if !path.is_file() {
            let shown = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            return Err(SyncError::Config(format!(
                "Config file not found: {}",
                shown.display()
            )));
        }

        let contents = fs::read_to_string(path).map_err(|e| SyncError::Config(e.to_string()))?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let raw: RawConfig = if is_toml {
            toml::from_str(&contents).map_err(|e| {
                SyncError::Config(format!("Failed to parse {}: {e}", path.display()))
            })?
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                SyncError::Config(format!("Failed to parse {}: {e}", path.display()))
            })?
        };

        Config::from_raw(raw, path)
    }

    fn from_raw(raw: RawConfig, path: &Path) -> Result<Config, SyncError> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }

        let token = present(raw.token);
        let user_agent = present(raw.user_agent);
        let user_id = present(raw.user_id);

        match (token, user_agent, user_id) {
            (Some(token), Some(user_agent), Some(user_id)) => Ok(Config {
                token,
                user_agent,
                user_id,
            }),
            (token, user_agent, user_id) => {
                let missing: Vec<&str> = [
                    ("token", token.is_none()),
                    ("user_agent", user_agent.is_none()),
                    ("user_id", user_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();

                Err(SyncError::Config(format!(
                    "{} is missing required field(s): {}\nExpected at least:\n{}",
                    path.display(),
                    missing.join(", "),
                    EXPECTED_SHAPE
                )))
            }
        }
    }
}
