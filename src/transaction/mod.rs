//! Transactions and the ways the user changes them.
//!
//! This module contains:
//! - The `Transaction` model and the `NewTransaction` insert payload
//! - The new transaction form, its state machine and its endpoint
//! - The transaction history list and the delete endpoint

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod form_view;
mod list;

pub use core::{NewTransaction, Transaction, TransactionId, TransactionType};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::{FormController, FormError, FormFields, FormPhase};
pub use form_view::new_transaction_form;
pub use list::transaction_history;
