//! HTML rendering for the transaction history.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CARD_HEADING_STYLE, CARD_STYLE, LIST_ROW_STYLE, amount_class,
        format_currency,
    },
    transaction::Transaction,
};

/// The max number of graphemes to display in the list rows before truncating
/// and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

fn truncate_description(description: &str) -> String {
    let graphemes = description.graphemes(true).collect::<Vec<_>>();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        return description.to_owned();
    }

    let mut truncated = graphemes[..MAX_DESCRIPTION_GRAPHEMES - 1].concat();
    truncated.push('…');
    truncated
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let delete_url = format_endpoint(endpoints::TRANSACTION, &transaction.id);

    html! {
        li class=(LIST_ROW_STYLE) data-transaction-id=(transaction.id.as_str())
        {
            span class="description" title=(transaction.description)
            {
                (truncate_description(&transaction.description))
            }

            span class={ "amount ml-auto " (amount_class(transaction.amount)) }
            {
                (format_currency(transaction.amount.abs()))
            }

            button
                type="button"
                hx-delete=(delete_url)
                hx-target="#ledger"
                hx-swap="outerHTML"
                aria-label="Delete transaction"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}

/// Renders `transactions` in the given order, each with a delete button.
pub fn transaction_history(transactions: &[Transaction]) -> Markup {
    html! {
        section id="history" class={ "mt-6 " (CARD_STYLE) }
        {
            h2 class=(CARD_HEADING_STYLE) { "Transaction History" }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions yet." }
            } @else {
                ul class="space-y-2"
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}
