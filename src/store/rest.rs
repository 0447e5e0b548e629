//! A [TransactionStore] backed by a PostgREST endpoint, e.g. a hosted
//! Supabase project.

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;

use crate::{
    Error,
    store::{RemoteError, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionId},
};

/// The connection settings for the remote store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// The base URL of the project, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    /// The API key sent with every request.
    pub api_key: String,
    /// The name of the table that holds the transactions.
    pub table: String,
}

/// A client for one transaction table exposed through PostgREST.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    collection_url: Url,
}

impl RestStore {
    /// Create a client for the table described by `config`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidStoreUrl] if the URL cannot be parsed,
    /// - or [Error::InvalidStoreKey] if the key cannot be sent as a header,
    /// - or [Error::HttpClient] if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, Error> {
        let collection_url = format!(
            "{}/rest/v1/{}",
            config.url.trim_end_matches('/'),
            config.table
        );
        let collection_url = Url::parse(&collection_url)
            .map_err(|error| Error::InvalidStoreUrl(format!("{collection_url}: {error}")))?;

        let client = Client::builder()
            .default_headers(auth_headers(&config.api_key)?)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            client,
            collection_url,
        })
    }

    /// The URL of the table endpoint.
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, Error> {
    let mut api_key_value = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidStoreKey)?;
    api_key_value.set_sensitive(true);

    let mut bearer_value =
        HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| Error::InvalidStoreKey)?;
    bearer_value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", api_key_value);
    headers.insert(AUTHORIZATION, bearer_value);

    Ok(headers)
}

#[async_trait]
impl TransactionStore for RestStore {
    async fn list_all(&self) -> Result<Vec<Transaction>, RemoteError> {
        let request = self
            .client
            .get(self.collection_url.clone())
            .query(&[("select", "*"), ("order", "date.desc")]);

        let response = send(request).await?;

        response
            .json::<Vec<Transaction>>()
            .await
            .map_err(|error| RemoteError::new(format!("could not decode transactions: {error}")))
    }

    async fn insert_one(&self, transaction: &NewTransaction) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(self.collection_url.clone())
            .header("Prefer", "return=minimal")
            .json(&[transaction]);

        send(request).await.map(|_| ())
    }

    async fn delete_by_id(&self, id: &TransactionId) -> Result<(), RemoteError> {
        let request = self
            .client
            .delete(self.collection_url.clone())
            .query(&[("id", format!("eq.{id}"))]);

        send(request).await.map(|_| ())
    }
}

/// The error body PostgREST sends with non-success responses.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
    let response = request
        .send()
        .await
        .map_err(|error| RemoteError::new(error.to_string()))?;

    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<PostgrestError>(&body) {
        Ok(error) => error.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };

    Err(RemoteError::with_status(status.as_u16(), message))
}
