pub mod cache;
pub mod currency;
pub mod ledger;
pub mod store;

pub use cache::{DocumentCache, TtlCache};
pub use currency::{resolve_rate, RateQuote};
pub use ledger::{aggregate, DailyNet, LedgerView, LoanStats, MonthBucket};
pub use store::{JsonStore, PgStore, RecordStore};
