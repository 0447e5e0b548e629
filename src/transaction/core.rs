//! Defines the core data models for transactions.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// The identifier the remote store assigns to a transaction.
///
/// The remote store may use integer or UUID primary keys, so the ID is kept
/// as an opaque string. Deserializing accepts either a JSON number or a JSON
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create an ID from its string representation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = TransactionId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer or a string ID")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(TransactionId(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(TransactionId(value.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value.is_empty() {
                    return Err(E::invalid_value(de::Unexpected::Str(value), &self));
                }

                Ok(TransactionId(value.to_owned()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Whether money was spent or earned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money was spent, stored with a negative amount.
    #[default]
    Expense,
    /// Money was earned, stored with a positive amount.
    Income,
}

impl TransactionType {
    /// Apply the sign convention for this type to `magnitude`.
    ///
    /// Expenses are always negative and income is always positive, regardless
    /// of the sign of `magnitude`. A zero magnitude maps to `0.0`, never `-0.0`.
    pub fn signed_amount(self, magnitude: f64) -> f64 {
        let magnitude = magnitude.abs();

        if magnitude == 0.0 {
            return 0.0;
        }

        match self {
            TransactionType::Expense => -magnitude,
            TransactionType::Income => magnitude,
        }
    }

    /// The value used for this type in forms and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID the remote store assigned to the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The signed amount: negative for expenses, positive for income.
    pub amount: f64,
    /// Whether the transaction was recorded as an expense or income.
    ///
    /// Views derive the direction from the sign of `amount`, not this field.
    /// A missing, null or unknown `type` in a stored row decodes as the type
    /// implied by `amount`.
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub transaction_type: Option<TransactionType>,
    /// When the transaction was recorded.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Transaction {
    /// Whether the transaction is an expense or income.
    ///
    /// Rows without a recognised `type` fall back to the sign of `amount`.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type.unwrap_or(if self.amount < 0.0 {
            TransactionType::Expense
        } else {
            TransactionType::Income
        })
    }
}

fn lenient_type<'de, D>(deserializer: D) -> Result<Option<TransactionType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value.as_str() {
        Some("expense") => Some(TransactionType::Expense),
        Some("income") => Some(TransactionType::Income),
        _ => {
            tracing::warn!("Ignoring unknown transaction type {value}");
            None
        }
    }))
}

/// A transaction that has not been persisted yet and so has no ID.
///
/// This is the payload sent to the remote store on insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The signed amount: negative for expenses, positive for income.
    pub amount: f64,
    /// Whether the transaction is an expense or income.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was recorded.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl NewTransaction {
    /// Build a new transaction, applying the sign convention of
    /// `transaction_type` to `magnitude`.
    pub fn new(
        description: &str,
        magnitude: f64,
        transaction_type: TransactionType,
        date: Date,
    ) -> Self {
        Self {
            description: description.to_owned(),
            amount: transaction_type.signed_amount(magnitude),
            transaction_type,
            date,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
