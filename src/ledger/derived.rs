//! Values computed from the ledger snapshot on every render.

use serde::Serialize;

use crate::transaction::Transaction;

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// The transaction date formatted as `YYYY-MM-DD`.
    pub date: String,
    /// The signed amount of the transaction.
    pub amount: f64,
}

/// The running balance: the sum of the signed amounts of `transactions`.
pub fn balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum()
}

/// Project `transactions` to chart points.
///
/// The order of `transactions` is kept as is, so the series is newest first
/// when given a ledger snapshot.
pub fn chart_series(transactions: &[Transaction]) -> Vec<ChartPoint> {
    transactions
        .iter()
        .map(|transaction| ChartPoint {
            date: transaction.date.to_string(),
            amount: transaction.amount,
        })
        .collect()
}
