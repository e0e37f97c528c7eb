//! # Storage
//!
//! Client for the hosted Supabase project, speaking PostgREST over HTTP.
//!
//! The server keeps no data of its own. Every route resolves to exactly one
//! of the operations below and relays whatever storage answers, so the
//! consistency story is entirely the backend's.
//!
//! Cardinality is enforced through PostgREST itself rather than local
//! checks:
//! - single-row reads and updates send `Accept: application/vnd.pgrst.object+json`,
//!   which makes the backend fail unless exactly one row matched
//! - deletes ask for `return=minimal` and succeed whether or not a row
//!   matched, which is what makes `DELETE` idempotent

use reqwest::{
    header::{HeaderMap, ACCEPT, AUTHORIZATION},
    Client, Response, StatusCode,
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::Config;

const PGRST_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Clone)]
pub struct Storage {
    base: String,
    client: Client,
}

impl Storage {
    pub fn new(config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", config.supabase_key.parse().unwrap());
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", config.supabase_key).parse().unwrap(),
        );

        let client = Client::builder().default_headers(headers).build().unwrap();

        Self {
            base: format!("{}/rest/v1", config.supabase_url.trim_end_matches('/')),
            client,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base, table)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn select_all(&self, table: &str) -> Result<Vec<Value>, StorageError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn select_one(&self, table: &str, id: &str) -> Result<Value, StorageError> {
        let filter = format!("eq.{id}");

        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("id", filter.as_str())])
            .header(ACCEPT, PGRST_OBJECT)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self, record), err)]
    pub async fn insert(
        &self,
        table: &str,
        record: &Map<String, Value>,
    ) -> Result<Value, StorageError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header(ACCEPT, PGRST_OBJECT)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self, record), err)]
    pub async fn update(
        &self,
        table: &str,
        id: &str,
        record: &Map<String, Value>,
    ) -> Result<Value, StorageError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", &format!("eq.{id}"))])
            .header(ACCEPT, PGRST_OBJECT)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, table: &str, id: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", &format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .send()
            .await?;

        check(response).await?;

        Ok(())
    }

    /// Single-row peek used by schema discovery. Errors are expected for
    /// tables that do not exist and are reported, not logged.
    pub async fn probe(&self, table: &str) -> Result<Vec<Value>, StorageError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("limit", "1")])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }
}

/// Pass successful responses through; turn everything else into an API error
/// carrying the backend's own message string.
async fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);

    Err(StorageError::Api { status, message })
}
