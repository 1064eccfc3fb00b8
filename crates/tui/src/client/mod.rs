use engine::{Entry, EntryDate, ResultEngine};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

const FINANCES_PATH: &str = "data/finances.json";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid remote url: {0}")]
    InvalidUrl(String),
    #[error("{0} not found on the remote")]
    NotFound(String),
    #[error("remote answered {status}: {body}")]
    Server { status: StatusCode, body: String },
    #[error("malformed ledger payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One record of the legacy `finances.json` feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyEntry {
    pub description: String,
    pub amount: f64,
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
}

impl LegacyEntry {
    /// Builds a ledger entry with a fresh id. Dates resolve to local midnight.
    pub fn into_entry(self) -> ResultEngine<Entry> {
        Entry::new(self.description, self.amount, EntryDate::Calendar(self.date))
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// `GET /data/finances.json`.
    pub async fn finances(&self) -> Result<Vec<LegacyEntry>, ClientError> {
        let endpoint = self
            .base_url
            .join(FINANCES_PATH)
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))?;

        tracing::info!(%endpoint, "fetching legacy ledger");
        let res = self.http.get(endpoint).send().await?;

        let status = res.status();
        let body = res.text().await?;
        finances_response(status, body)
    }
}

fn finances_response(status: StatusCode, body: String) -> Result<Vec<LegacyEntry>, ClientError> {
    if status.is_success() {
        return decode_finances(&body);
    }

    tracing::warn!(%status, "legacy ledger fetch failed");
    Err(match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(FINANCES_PATH.to_string()),
        _ => ClientError::Server { status, body },
    })
}

fn decode_finances(body: &str) -> Result<Vec<LegacyEntry>, ClientError> {
    Ok(serde_json::from_str(body)?)
}
