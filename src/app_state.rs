//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use crate::{
    Error, ledger::Ledger, store::TransactionStore, timezone::get_local_offset,
    transaction::FormController,
};

/// The state of the web server.
///
/// Route handlers take the parts they need through [axum::extract::FromRef]
/// sub-states rather than the whole struct.
#[derive(Clone)]
pub struct AppState {
    /// The client for the remote transaction collection.
    pub store: Arc<dyn TransactionStore>,

    /// The local snapshot of the transaction collection.
    pub ledger: Arc<Ledger>,

    /// The state of the new transaction form.
    pub form: Arc<Mutex<FormController>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] with an empty ledger and a pristine form.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(store: Arc<dyn TransactionStore>, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            store,
            ledger: Arc::new(Ledger::new()),
            form: Arc::new(Mutex::new(FormController::new())),
            local_timezone: local_timezone.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{Error, test_utils::FakeStore, transaction::FormPhase};

    use super::AppState;

    #[test]
    fn new_state_is_empty_and_pristine() {
        let state = AppState::new(Arc::new(FakeStore::new()), "Pacific/Auckland").unwrap();

        assert!(state.ledger.snapshot().is_empty());
        assert_eq!(state.form.lock().unwrap().phase(), &FormPhase::Idle);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new(Arc::new(FakeStore::new()), "Middle/Earth");

        assert!(matches!(
            result,
            Err(Error::InvalidTimezoneError(timezone)) if timezone == "Middle/Earth"
        ));
    }
}
