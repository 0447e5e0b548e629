use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_HEADING_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::{FormFields, TransactionType},
};

/// Renders the card with the form for adding a transaction, pre-filled with
/// `fields`.
pub fn new_transaction_form(fields: &FormFields) -> Markup {
    let spinner = loading_spinner();
    let is_expense = matches!(fields.transaction_type, TransactionType::Expense);

    html! {
        div class=(CARD_STYLE)
        {
            h2 class=(CARD_HEADING_STYLE) { "New Transaction" }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target="#ledger"
                hx-swap="outerHTML"
                hx-disabled-elt="#submit-button"
                class="space-y-4"
            {
                div
                {
                    label
                        for="description"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Description"
                    }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        required
                        value=(fields.description)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="amount"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Amount"
                    }

                    // w-full needed to ensure input takes the full width when prefilled with a value
                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="0.01"
                            placeholder="0.00"
                            required
                            value=(fields.amount)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label
                        for="type"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Type"
                    }

                    select
                        name="type"
                        id="type"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value=(TransactionType::Expense.as_str()) selected[is_expense] { "Expense" }
                        option value=(TransactionType::Income.as_str()) selected[!is_expense] { "Income" }
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Add Transaction"
                }
            }
        }
    }
}
