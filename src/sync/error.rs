use thiserror::Error;

/// Fatal failures of a sync run. Operator aborts are not errors and never
/// show up here; see [`super::Outcome`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to load modlist: {0}")]
    Input(String),

    #[error("{what} failed (status {status}): {body}")]
    Fetch {
        what: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response format when {0}")]
    Format(String),

    #[error(
        "Collection ID {0} not found in your collections. Did you use the right account / user_id?"
    )]
    CollectionNotFound(String),

    #[error("You don't have any collections yet. Create one in the Modrinth UI, then run this again.")]
    NoCollections,

    #[error("no collections in local state either; cannot continue")]
    NoCachedCollections,

    #[error("Collection update failed: {status} {body}{}", auth_hint(.status))]
    UpdateFailed { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

fn auth_hint(status: &u16) -> &'static str {
    if matches!(*status, 401 | 403) {
        "\nIf you see 401 'unauthorized', double-check that you're using a personal \
         access token (PAT) starting with 'mrp_' and that it has the scopes required \
         for collections."
    } else {
        ""
    }
}
