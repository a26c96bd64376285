//! Shared types: the persisted document, currency table, identities.

pub mod currency;
pub mod document;
pub mod ids;

pub use currency::{Currency, BASE_CURRENCY};
pub use document::{
    Capital, CapitalSource, DailyEntry, Expense, FinancialDocument, MonthlyEntry, Profile,
    Settings, SortOrder,
};
pub use ids::{GuestSession, Identity, UserId};
