use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::Date;

use crate::{
    store::{RemoteError, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionType},
};

/// Build a stored transaction, inferring its type from the sign of `amount`.
pub(crate) fn transaction(id: &str, description: &str, amount: f64, date: Date) -> Transaction {
    let transaction_type = if amount < 0.0 {
        TransactionType::Expense
    } else {
        TransactionType::Income
    };

    Transaction {
        id: TransactionId::new(id),
        description: description.to_owned(),
        amount,
        transaction_type: Some(transaction_type),
        date,
    }
}

#[derive(Default)]
struct FakeStoreState {
    transactions: Vec<Transaction>,
    next_id: u64,
    failure: Option<RemoteError>,
}

/// An in-memory [TransactionStore] that can be told to fail.
///
/// Clones share the same collection, so a test can keep a handle to the store
/// it injected into the app.
#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    state: Arc<Mutex<FakeStoreState>>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions
            .iter()
            .filter_map(|transaction| transaction.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            state: Arc::new(Mutex::new(FakeStoreState {
                transactions,
                next_id,
                failure: None,
            })),
        }
    }

    /// Make every following call fail with `error`.
    pub(crate) fn fail_with(&self, error: RemoteError) {
        self.state.lock().unwrap().failure = Some(error);
    }

    /// Undo [FakeStore::fail_with].
    pub(crate) fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    /// The stored transactions in insertion order.
    pub(crate) fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    fn check_failure(state: &FakeStoreState) -> Result<(), RemoteError> {
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TransactionStore for FakeStore {
    async fn list_all(&self) -> Result<Vec<Transaction>, RemoteError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state)?;

        let mut transactions = state.transactions.clone();
        // Stable, so same-day transactions keep their insertion order.
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(transactions)
    }

    async fn insert_one(&self, transaction: &NewTransaction) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;

        state.next_id += 1;
        let id = TransactionId::new(state.next_id.to_string());
        state.transactions.push(Transaction {
            id,
            description: transaction.description.clone(),
            amount: transaction.amount,
            transaction_type: Some(transaction.transaction_type),
            date: transaction.date,
        });

        Ok(())
    }

    async fn delete_by_id(&self, id: &TransactionId) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;

        // Deleting a missing row is not an error for a filtered delete.
        state.transactions.retain(|transaction| &transaction.id != id);

        Ok(())
    }
}
