//! The single page of the app: form, balance, history and chart.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    html::{
        CARD_HEADING_STYLE, CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, amount_class, base,
        currency_input_styles, format_currency,
    },
    ledger::{
        Ledger,
        chart::{ECHARTS_URL, chart_view, transactions_chart},
        derived::{balance, chart_series},
    },
    store::TransactionStore,
    transaction::{
        FormController, FormFields, Transaction, new_transaction_form, transaction_history,
    },
};

/// The state needed to render the ledger page.
#[derive(Clone)]
pub struct LedgerPageState {
    /// The client for the remote transaction collection.
    pub store: Arc<dyn TransactionStore>,
    /// The local snapshot of the transaction collection.
    pub ledger: Arc<Ledger>,
    /// The state of the new transaction form.
    pub form: Arc<Mutex<FormController>>,
}

impl FromRef<AppState> for LedgerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            ledger: state.ledger.clone(),
            form: state.form.clone(),
        }
    }
}

fn balance_card(balance: f64) -> Markup {
    html! {
        div id="balance" class=(CARD_STYLE)
        {
            h2 class=(CARD_HEADING_STYLE) { "Balance" }

            p class={ "text-4xl font-bold " (amount_class(balance)) }
            {
                (format_currency(balance))
            }
        }
    }
}

/// Renders the part of the page that changes when transactions are added or
/// deleted.
///
/// Mutating endpoints respond with this section so htmx can swap it in place.
pub fn ledger_section(transactions: &[Transaction], fields: &FormFields) -> Markup {
    let chart = transactions_chart(&chart_series(transactions));

    html! {
        section id="ledger"
        {
            div class="grid grid-cols-1 md:grid-cols-2 gap-6"
            {
                (new_transaction_form(fields))
                (balance_card(balance(transactions)))
            }

            (transaction_history(transactions))
            (chart_view(&chart))
        }
    }
}

fn ledger_page(transactions: &[Transaction], fields: &FormFields) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-6" { "Personal Finances" }

            (ledger_section(transactions, fields))
        }
    };

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        currency_input_styles(),
    ];

    base("Personal Finances", &head_elements, &content)
}

/// Read the form fields to render.
///
/// # Errors
/// Returns [Error::LockError] if the form lock is poisoned.
fn current_fields(form: &Mutex<FormController>) -> Result<FormFields, Error> {
    form.lock()
        .map(|controller| controller.fields())
        .map_err(|error| {
            tracing::error!("could not acquire the form lock: {error}");
            Error::LockError
        })
}

/// Respond with the ledger section for htmx to swap into the page.
pub(crate) fn ledger_fragment(ledger: &Ledger, form: &Mutex<FormController>) -> Response {
    match current_fields(form) {
        Ok(fields) => ledger_section(&ledger.snapshot(), &fields).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Re-fetch the ledger from `store`, keeping the current snapshot on failure.
///
/// Failures are only logged: the page is rendered with whatever the ledger
/// held before.
pub(crate) async fn refresh_ledger(ledger: &Ledger, store: &dyn TransactionStore) {
    if let Err(error) = ledger.refresh(store).await {
        tracing::error!("Error fetching transactions: {error}");
    }
}

/// Renders the ledger page after fetching the latest transactions.
pub async fn get_ledger_page(State(state): State<LedgerPageState>) -> Result<Response, Error> {
    refresh_ledger(&state.ledger, state.store.as_ref()).await;

    let fields = current_fields(&state.form)?;
    let transactions = state.ledger.snapshot();

    Ok(ledger_page(&transactions, &fields).into_response())
}
