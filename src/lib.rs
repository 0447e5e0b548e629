//! A single-page personal finance ledger.
//!
//! Transactions (expenses and income) are kept in a remote collection that is
//! accessed through a PostgREST-style REST API. The server renders the ledger
//! page with a running balance, the transaction history and a chart, and
//! updates it in place with htmx after every change.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod endpoints;
mod html;
mod internal_server_error;
mod ledger;
mod logging;
mod not_found;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use ledger::{ChartPoint, Ledger, RefreshOutcome, balance, chart_series};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use store::{RemoteError, RestStore, StoreConfig, TransactionStore};
pub use transaction::{
    FormController, FormError, FormFields, FormPhase, NewTransaction, Transaction, TransactionId,
    TransactionType,
};

use crate::internal_server_error::InternalServerError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The remote store URL could not be parsed or cannot hold a path.
    #[error("invalid remote store URL: {0}")]
    InvalidStoreUrl(String),

    /// The remote store API key cannot be sent as an HTTP header.
    #[error("the remote store API key contains characters that are not allowed in a header")]
    InvalidStoreKey,

    /// The HTTP client for the remote store could not be built.
    #[error("could not create the HTTP client: {0}")]
    HttpClient(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire a lock on shared state.
    #[error("could not acquire the lock")]
    LockError,

    /// A call to the remote store failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::LockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
