//! The in-memory snapshot of the remote transaction collection.

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    store::{RemoteError, TransactionStore},
    transaction::Transaction,
};

/// Identifies one fetch of the transaction collection.
///
/// Tickets are issued in increasing order, so a later ticket always belongs
/// to a later fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct FetchTicket(u64);

/// What happened to the result of a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched transactions replaced the snapshot.
    Applied,
    /// A newer fetch had already been applied, so the result was discarded.
    Stale,
}

#[derive(Debug)]
struct Snapshot {
    ticket: FetchTicket,
    transactions: Arc<[Transaction]>,
}

/// The ordered collection of all transactions currently known to the app.
///
/// The snapshot is only ever replaced wholesale by the result of a successful
/// fetch. Local mutations never patch it.
#[derive(Debug)]
pub struct Ledger {
    last_issued: AtomicU64,
    snapshot: RwLock<Snapshot>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            last_issued: AtomicU64::new(0),
            snapshot: RwLock::new(Snapshot {
                ticket: FetchTicket(0),
                transactions: Arc::from(Vec::new()),
            }),
        }
    }

    /// The transactions from the most recent applied fetch, newest first.
    pub fn snapshot(&self) -> Arc<[Transaction]> {
        // The snapshot is swapped in a single assignment, so a poisoned lock
        // still guards a complete snapshot.
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .transactions
            .clone()
    }

    /// Re-fetch the whole collection from `store` and replace the snapshot.
    ///
    /// # Errors
    /// Returns the [RemoteError] from the store, in which case the snapshot is
    /// left unchanged.
    pub async fn refresh(
        &self,
        store: &dyn TransactionStore,
    ) -> Result<RefreshOutcome, RemoteError> {
        let ticket = self.issue_ticket();
        let transactions = store.list_all().await?;

        Ok(self.apply(ticket, transactions))
    }

    pub(crate) fn issue_ticket(&self) -> FetchTicket {
        FetchTicket(self.last_issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the snapshot with `transactions` unless a fetch issued after
    /// `ticket` has already been applied.
    pub(crate) fn apply(
        &self,
        ticket: FetchTicket,
        transactions: Vec<Transaction>,
    ) -> RefreshOutcome {
        let mut snapshot = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if ticket <= snapshot.ticket {
            tracing::debug!(
                "Discarding stale fetch {:?}, already showing fetch {:?}",
                ticket,
                snapshot.ticket
            );
            return RefreshOutcome::Stale;
        }

        *snapshot = Snapshot {
            ticket,
            transactions: Arc::from(transactions),
        };

        RefreshOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use time::macros::date;
    use tokio::sync::{mpsc, oneshot};

    use crate::{
        ledger::{Ledger, RefreshOutcome},
        store::{RemoteError, TransactionStore},
        test_utils::{FakeStore, transaction},
        transaction::{NewTransaction, Transaction, TransactionId, TransactionType},
    };

    /// A store whose `list_all` calls each wait for the test to release them.
    struct GatedStore {
        gates: Mutex<VecDeque<oneshot::Receiver<Vec<Transaction>>>>,
        entered: mpsc::UnboundedSender<()>,
    }

    #[async_trait]
    impl TransactionStore for GatedStore {
        async fn list_all(&self) -> Result<Vec<Transaction>, RemoteError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .pop_front()
                .expect("list_all called more often than expected");
            self.entered.send(()).unwrap();

            gate.await.map_err(|_| RemoteError::new("gate dropped"))
        }

        async fn insert_one(&self, _: &NewTransaction) -> Result<(), RemoteError> {
            unimplemented!()
        }

        async fn delete_by_id(&self, _: &TransactionId) -> Result<(), RemoteError> {
            unimplemented!()
        }
    }

    #[test]
    fn starts_empty() {
        let ledger = Ledger::new();

        assert!(ledger.snapshot().is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot() {
        let store = FakeStore::with_transactions(vec![
            transaction("1", "Coffee", -5.0, date!(2026 - 10 - 14)),
            transaction("2", "Salary", 1000.0, date!(2026 - 10 - 15)),
        ]);
        let ledger = Ledger::new();

        let outcome = ledger.refresh(&store).await;

        assert_eq!(outcome, Ok(RefreshOutcome::Applied));
        let snapshot = ledger.snapshot();
        let descriptions = snapshot
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect::<Vec<_>>();
        assert_eq!(descriptions, ["Salary", "Coffee"]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let store = FakeStore::with_transactions(vec![transaction(
            "1",
            "Coffee",
            -5.0,
            date!(2026 - 10 - 14),
        )]);
        let ledger = Ledger::new();
        ledger.refresh(&store).await.unwrap();
        let before = ledger.snapshot();

        store
            .insert_one(&NewTransaction::new(
                "Salary",
                1000.0,
                TransactionType::Income,
                date!(2026 - 10 - 15),
            ))
            .await
            .unwrap();
        store.fail_with(RemoteError::new("connection reset"));

        let outcome = ledger.refresh(&store).await;

        assert_eq!(outcome, Err(RemoteError::new("connection reset")));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn late_response_from_older_fetch_is_discarded() {
        let ledger = Ledger::new();
        let older = ledger.issue_ticket();
        let newer = ledger.issue_ticket();

        let newer_outcome = ledger.apply(
            newer,
            vec![transaction("2", "Salary", 1000.0, date!(2026 - 10 - 15))],
        );
        let older_outcome = ledger.apply(older, Vec::new());

        assert_eq!(newer_outcome, RefreshOutcome::Applied);
        assert_eq!(older_outcome, RefreshOutcome::Stale);
        assert_eq!(ledger.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn older_refresh_finishing_last_does_not_overwrite_newer() {
        let (older_gate, older_rx) = oneshot::channel();
        let (newer_gate, newer_rx) = oneshot::channel();
        let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
        let store = Arc::new(GatedStore {
            gates: Mutex::new(VecDeque::from([older_rx, newer_rx])),
            entered: entered_tx,
        });
        let ledger = Arc::new(Ledger::new());

        let older = tokio::spawn({
            let ledger = ledger.clone();
            let store = store.clone();
            async move { ledger.refresh(store.as_ref()).await }
        });
        entered_rx.recv().await.unwrap();

        newer_gate
            .send(vec![transaction(
                "2",
                "Salary",
                1000.0,
                date!(2026 - 10 - 15),
            )])
            .unwrap();
        let newer = ledger.refresh(store.as_ref()).await;
        older_gate.send(Vec::new()).unwrap();
        let older = older.await.unwrap();

        assert_eq!(newer, Ok(RefreshOutcome::Applied));
        assert_eq!(older, Ok(RefreshOutcome::Stale));
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].description, "Salary");
    }

    #[test]
    fn responses_in_issue_order_are_all_applied() {
        let ledger = Ledger::new();
        let first = ledger.issue_ticket();
        let second = ledger.issue_ticket();

        assert_eq!(ledger.apply(first, Vec::new()), RefreshOutcome::Applied);
        assert_eq!(
            ledger.apply(
                second,
                vec![transaction("1", "Coffee", -5.0, date!(2026 - 10 - 14))]
            ),
            RefreshOutcome::Applied
        );
        assert_eq!(ledger.snapshot().len(), 1);
    }
}
