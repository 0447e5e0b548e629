//! The local copy of the transaction collection and the views derived from it.

mod chart;
mod derived;
mod page;
mod state;

pub use derived::{ChartPoint, balance, chart_series};
pub use page::get_ledger_page;
pub use state::{Ledger, RefreshOutcome};

pub(crate) use page::{ledger_fragment, refresh_ledger};
