//! The client for the remote store that holds the transaction collection.
//!
//! The rest of the application only talks to the remote store through the
//! [TransactionStore] trait, so the concrete client is chosen once at start-up
//! and injected via [crate::AppState].

mod rest;

use async_trait::async_trait;

pub use rest::{RestStore, StoreConfig};

use crate::transaction::{NewTransaction, Transaction, TransactionId};

/// A failed call to the remote store.
///
/// Network, authentication and query failures are all reported as this one
/// error kind. The status and message are only meant for the developer log.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("remote store request failed{}: {message}", status_suffix(.status))]
pub struct RemoteError {
    /// The HTTP status code, if the store responded at all.
    pub status: Option<u16>,
    /// A description of what went wrong.
    pub message: String,
}

impl RemoteError {
    /// Create an error for a request that got no usable response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Create an error for a response with a non-success `status`.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {code}"),
        None => String::new(),
    }
}

/// The operations the ledger needs from the remote transaction collection.
///
/// Each call is a single attempt: implementations must not retry.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Fetch every transaction, ordered by date, newest first.
    async fn list_all(&self) -> Result<Vec<Transaction>, RemoteError>;

    /// Persist `transaction`. The store assigns its ID.
    async fn insert_one(&self, transaction: &NewTransaction) -> Result<(), RemoteError>;

    /// Remove the transaction with the ID `id`.
    async fn delete_by_id(&self, id: &TransactionId) -> Result<(), RemoteError>;
}
