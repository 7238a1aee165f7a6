mod config;
mod error;
mod merge;
mod modlist;
mod modrinth;
mod normalize;
mod pick;
mod prompt;
mod state;

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;

pub use config::{
    Config, RunOptions, DEFAULT_CONFIG_PATH, DEFAULT_MODLIST_PATH, DEFAULT_STATE_PATH,
};
pub use error::SyncError;

use merge::{existing_projects, merge};
use modlist::{collect_project_ids, load_modlist};
use modrinth::{CollectionApi, ModrinthClient, PatchCollection};
use pick::{choose_collection, confirm};
use prompt::{Prompt, TerminalPrompt};
use state::{FileStateStore, LocalState, StateStore};

/// How a run ended, when it didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated {
        collection_id: String,
        total: usize,
        added: usize,
    },
    /// Everything ran except the final PATCH.
    DryRun {
        collection_id: String,
        total: usize,
        added: usize,
    },
    Aborted,
}

pub fn run(options: &RunOptions) -> Result<Outcome> {
    tracing::info!("starting new run of modrinth-collection-sync");
    tracing::info!(
        config = %options.config_path.display(),
        modlist = %options.modlist_path.display(),
        state = %options.state_path.display(),
        collection_id = ?options.collection_id,
        dry_run = options.dry_run,
        "run options"
    );

    let config = Config::load(&options.config_path)?;
    let api = ModrinthClient::new(&config).context("invalid credentials for HTTP headers")?;
    let mut store = FileStateStore::new(&options.state_path);
    let mut prompt = TerminalPrompt::stdio();

    sync(&config, options, &api, &mut store, &mut prompt)
}

/// One full pass: fetch collections, pick one, resolve the modlist, merge,
/// confirm and write back.
pub fn sync(
    config: &Config,
    options: &RunOptions,
    api: &impl CollectionApi,
    store: &mut impl StateStore,
    prompt: &mut impl Prompt,
) -> Result<Outcome> {
    let collections = sync_collections(config, api, store, prompt)?;

    let Some(collection_id) =
        choose_collection(&collections, options.collection_id.as_deref(), prompt)?
    else {
        return Ok(aborted(prompt));
    };
    tracing::info!(%collection_id, "collection chosen");

    let entries = load_modlist(&options.modlist_path)?;
    prompt.say(&format!(
        "[info] Loaded {} entries from {}",
        entries.len(),
        options.modlist_path.display()
    ));

    let Some(collected) = collect_project_ids(&entries, prompt)? else {
        return Ok(aborted(prompt));
    };
    prompt.say(&format!(
        "[info] Collected {} unique Modrinth project(s) from modlist.",
        collected.project_ids.len()
    ));
    if collected.skipped > 0 {
        prompt.say(&format!(
            "[info] Skipped {} mod(s) (no Modrinth URL and you chose to skip).",
            collected.skipped
        ));
    }

    let detail = api.get_collection(&collection_id)?;
    let existing = existing_projects(&detail).unwrap_or_else(|| {
        tracing::warn!(%collection_id, "unexpected 'projects' field format; treating as empty");
        prompt.say("[warn] Unexpected 'projects' field format in collection; treating as empty.");
        BTreeSet::new()
    });
    let merged = merge(
        existing.iter().map(String::as_str),
        collected.project_ids.iter().map(String::as_str),
    );
    tracing::info!(
        existing = existing.len(),
        added = merged.added,
        skipped = collected.skipped,
        total = merged.projects.len(),
        "merged"
    );

    prompt.say("");
    prompt.say(&format!(
        "[summary] To add: {} new project(s). Skipped: {}. Final collection size will be {}.",
        merged.added,
        collected.skipped,
        merged.projects.len()
    ));

    if !confirm(prompt, "Proceed with updating the collection? [y/N]")? {
        prompt.say("Aborted by user.");
        tracing::info!("aborted at confirmation");
        return Ok(Outcome::Aborted);
    }

    prompt.say(&format!(
        "[info] Patching collection {} with {} total project(s)...",
        collection_id,
        merged.projects.len()
    ));
    let payload = serde_json::to_string(&PatchCollection {
        new_projects: &merged.projects,
    })
    .context("failed to serialize PATCH payload")?;
    prompt.say(&format!(
        "[info] PATCH payload for collection {}: {}",
        collection_id, payload
    ));
    tracing::info!(%collection_id, %payload, "PATCH payload");

    if options.dry_run {
        prompt.say("[dry-run] Skipping PATCH request.");
        return Ok(Outcome::DryRun {
            collection_id,
            total: merged.projects.len(),
            added: merged.added,
        });
    }

    api.update_collection_members(&collection_id, &merged.projects)?;
    prompt.say("[ok] Collection updated successfully.");
    tracing::info!(%collection_id, "collection updated");

    Ok(Outcome::Updated {
        collection_id,
        total: merged.projects.len(),
        added: merged.added,
    })
}

fn aborted(prompt: &mut impl Prompt) -> Outcome {
    prompt.say("Aborting by user request.");
    tracing::info!("aborted by operator");
    Outcome::Aborted
}

/// Fetches the owner's collections and snapshots them; falls back to the last
/// snapshot when the API can't be reached.
fn sync_collections(
    config: &Config,
    api: &impl CollectionApi,
    store: &mut impl StateStore,
    prompt: &mut impl Prompt,
) -> Result<Vec<Value>> {
    match api.list_collections(&config.user_id) {
        Ok(collections) => {
            let mut state = store
                .load()
                .unwrap_or_else(|| LocalState::new(&config.user_id, Vec::new()));
            state.user_id = config.user_id.clone();
            state.collections = collections.clone();
            state.synced_at = Utc::now();

            match store.save(&state) {
                Ok(()) => prompt.say(&format!(
                    "[info] Synced {} collection(s) into local state (user_id={}).",
                    collections.len(),
                    config.user_id
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to write local state");
                    prompt.say(&format!("[warn] Could not save local state: {e:#}"));
                }
            }
            Ok(collections)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to sync collections from API");
            prompt.say(&format!("[warn] Failed to sync collections from API: {}", e));

            let collections = store.load().map(|s| s.collections).unwrap_or_default();
            if collections.is_empty() {
                return Err(SyncError::NoCachedCollections.into());
            }
            prompt.say("[info] Falling back to collections from local state (snapshot may be outdated).");
            Ok(collections)
        }
    }
}
