//! Remote collection loader.
//!
//! Fetches the upstream user list with a single `GET` and normalizes it into a
//! [`Collection`]. The loader never touches the store; callers commit the
//! result themselves.

use std::time::Duration;

use reqwest::{header, Client};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Collection, RawRecord, Record};

/// HTTP client bound to the configured collection endpoint.
#[derive(Debug, Clone)]
pub struct CollectionLoader {
    client: Client,
    endpoint: String,
}

impl CollectionLoader {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_endpoint(
            config.source_url.clone(),
            &config.user_agent,
            config.fetch_timeout,
        )
    }

    pub fn with_endpoint(
        endpoint: String,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and normalize the collection. No retries.
    pub async fn load(&self) -> Result<Collection, AppError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching collection");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;

        let raw: Vec<RawRecord> = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Malformed collection body: {:?}", e);
            AppError::Network(format!("Malformed collection body: {}", e))
        })?;

        let collection = normalize(raw)?;
        tracing::debug!(records = collection.len(), "Collection fetched");
        Ok(collection)
    }
}

/// Map upstream elements to records with `bookmarked = false`.
///
/// A payload that repeats an id is treated as malformed.
pub fn normalize(raw: Vec<RawRecord>) -> Result<Collection, AppError> {
    let records = raw.into_iter().map(Record::from).collect();
    Collection::from_records(records).map_err(|id| {
        AppError::Network(format!(
            "Malformed collection body: duplicate record id {}",
            id
        ))
    })
}
