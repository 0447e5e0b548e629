//! Defines the endpoint for adding a new transaction.
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::{HxReswap, SwapOption};

use crate::{
    AppState, Error,
    ledger::{Ledger, ledger_fragment, refresh_ledger},
    store::TransactionStore,
    timezone::today_in,
    transaction::{FormController, FormError, FormFields},
};

/// The state needed to add a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The client for the remote transaction collection.
    pub store: Arc<dyn TransactionStore>,
    /// The local snapshot of the transaction collection.
    pub ledger: Arc<Ledger>,
    /// The state of the new transaction form.
    pub form: Arc<Mutex<FormController>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            ledger: state.ledger.clone(),
            form: state.form.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn lock_form(form: &Mutex<FormController>) -> Result<MutexGuard<'_, FormController>, Error> {
    form.lock().map_err(|error| {
        tracing::error!("could not acquire the form lock: {error}");
        Error::LockError
    })
}

/// A submission that has been started on the form controller.
///
/// If the handler is dropped before the remote store answers, e.g. because
/// the client disconnected, the form goes back to editing so it does not stay
/// locked in the submitting phase.
struct PendingSubmission<'a> {
    form: &'a Mutex<FormController>,
    settled: bool,
}

impl<'a> PendingSubmission<'a> {
    fn new(form: &'a Mutex<FormController>) -> Self {
        Self {
            form,
            settled: false,
        }
    }

    /// Reset the form if the transaction was `saved`, otherwise keep its input.
    fn settle(mut self, saved: bool) -> Result<(), Error> {
        self.settled = true;
        let mut form = lock_form(self.form)?;

        if saved {
            form.succeed();
        } else {
            form.fail();
        }

        Ok(())
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        tracing::warn!("Transaction submission was abandoned before it finished");
        if let Ok(mut form) = self.form.lock() {
            form.fail();
        }
    }
}

/// A route handler for adding a transaction dated today, responds with the
/// re-rendered ledger section.
///
/// On success the form is reset and the ledger re-fetched. If the remote
/// store rejects the transaction, the error is logged and the form keeps the
/// user's input. A submission made while another is still in flight is
/// refused with `409 Conflict` and an empty body that htmx does not swap in.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(fields): Form<FormFields>,
) -> Response {
    let today = match today_in(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_response();
        }
    };

    let submission = match lock_form(&state.form) {
        Ok(mut form) => form.begin_submit(fields, today),
        Err(error) => return error.into_response(),
    };

    let new_transaction = match submission {
        Ok(new_transaction) => new_transaction,
        Err(FormError::SubmissionInProgress) => {
            tracing::warn!("Ignoring a new transaction while the previous one is being saved");
            return (StatusCode::CONFLICT, HxReswap(SwapOption::None), ()).into_response();
        }
        Err(error) => {
            tracing::error!("Error adding transaction: {error}");
            return ledger_fragment(&state.ledger, &state.form);
        }
    };

    let pending = PendingSubmission::new(&state.form);

    let saved = match state.store.insert_one(&new_transaction).await {
        Ok(()) => true,
        Err(error) => {
            tracing::error!("Error adding transaction: {error}");
            false
        }
    };

    if let Err(error) = pending.settle(saved) {
        return error.into_response();
    }

    if saved {
        refresh_ledger(&state.ledger, state.store.as_ref()).await;
    }

    ledger_fragment(&state.ledger, &state.form)
}
