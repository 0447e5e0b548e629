use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::Response,
};

use crate::{
    AppState,
    ledger::{Ledger, ledger_fragment, refresh_ledger},
    store::TransactionStore,
    transaction::{FormController, TransactionId},
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The client for the remote transaction collection.
    pub store: Arc<dyn TransactionStore>,
    /// The local snapshot of the transaction collection.
    pub ledger: Arc<Ledger>,
    /// The state of the new transaction form, needed to re-render it.
    pub form: Arc<Mutex<FormController>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            ledger: state.ledger.clone(),
            form: state.form.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with the re-rendered
/// ledger section.
///
/// The ledger is only re-fetched if the remote store accepted the delete.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.store.delete_by_id(&transaction_id).await {
        Ok(()) => refresh_ledger(&state.ledger, state.store.as_ref()).await,
        Err(error) => {
            tracing::error!("Error deleting transaction {transaction_id}: {error}");
        }
    }

    ledger_fragment(&state.ledger, &state.form)
}
