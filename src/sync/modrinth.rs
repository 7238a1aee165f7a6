use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::error::SyncError;
use super::Config;

pub const API_BASE: &str = "https://api.modrinth.com/v3";

type Result<T> = std::result::Result<T, SyncError>;

/// The three calls a sync needs from the remote side.
pub trait CollectionApi {
    /// All collections owned by `user_id`, as raw records.
    fn list_collections(&self, user_id: &str) -> Result<Vec<Value>>;

    /// One collection with its authoritative `projects` list.
    fn get_collection(&self, collection_id: &str) -> Result<Value>;

    /// Replaces the collection's membership with `projects`. Always the full list.
    fn update_collection_members(&self, collection_id: &str, projects: &[String]) -> Result<()>;
}

/// Body of `PATCH /collection/{id}`, same shape the Modrinth frontend sends.
#[derive(Serialize, Debug)]
pub struct PatchCollection<'a> {
    pub new_projects: &'a [String],
}

pub struct ModrinthClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl ModrinthClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_base_url(config, API_BASE, Client::new())
    }

    pub fn with_base_url(
        config: &Config,
        base_url: &str,
        client: Client,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&config.token)?);
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(ModrinthClient {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            headers,
        })
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        Ok(self.client.get(&url).headers(self.headers.clone()).send()?)
    }
}

fn expect_status(resp: Response, expected: StatusCode, what: String) -> Result<Response> {
    if resp.status() == expected {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().unwrap_or_default();
    Err(SyncError::Fetch { what, status, body })
}

impl CollectionApi for ModrinthClient {
    fn list_collections(&self, user_id: &str) -> Result<Vec<Value>> {
        let resp = self.get(&format!("/user/{}/collections", user_id))?;
        let resp = expect_status(resp, StatusCode::OK, "Fetching collections".into())?;

        match resp.json::<Value>()? {
            Value::Array(collections) => Ok(collections),
            _ => Err(SyncError::Format("fetching collections".into())),
        }
    }

    fn get_collection(&self, collection_id: &str) -> Result<Value> {
        let resp = self.get(&format!("/collection/{}", collection_id))?;
        let resp = expect_status(
            resp,
            StatusCode::OK,
            format!("Fetching collection {}", collection_id),
        )?;
        Ok(resp.json::<Value>()?)
    }

    fn update_collection_members(&self, collection_id: &str, projects: &[String]) -> Result<()> {
        let url = format!("{}/collection/{}", self.base_url, collection_id);
        tracing::debug!(%url, count = projects.len(), "PATCH");

        let resp = self
            .client
            .patch(&url)
            .headers(self.headers.clone())
            .json(&PatchCollection {
                new_projects: projects,
            })
            .send()?;

        if resp.status() != StatusCode::NO_CONTENT {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(SyncError::UpdateFailed { status, body });
        }
        Ok(())
    }
}
