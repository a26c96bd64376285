use serde::Deserialize;

use super::{apply, ensure_finite, entry_mut};
use crate::errors::{AppError, Result};
use crate::models::{DailyEntry, FinancialDocument, Identity, MonthlyEntry};
use crate::services::ledger::month_net_income;
use crate::utils::date::parse_month_key;
use crate::AppState;

/// `date` is stored as entered. Entries that are not "YYYY-MM-DD" are kept but never
/// counted in a month.
#[derive(Clone, Debug, Deserialize)]
pub struct DailyEntryRequest {
    pub date: String,
    pub hours_worked: f64,
    pub gross_income: f64,
}

impl DailyEntryRequest {
    fn into_entry(self) -> Result<DailyEntry> {
        let hours_worked = ensure_finite("hours_worked", self.hours_worked)?;
        let gross_income = ensure_finite("gross_income", self.gross_income)?;
        Ok(DailyEntry::new(self.date, hours_worked, gross_income))
    }
}

pub async fn add_daily_entry(
    state: &AppState,
    identity: &Identity,
    payload: DailyEntryRequest,
) -> Result<FinancialDocument> {
    let entry = payload.into_entry()?;
    apply(state, identity, |data| {
        data.daily_income_tracker.push(entry);
        Ok(())
    })
    .await
}

pub async fn edit_daily_entry(
    state: &AppState,
    identity: &Identity,
    index: usize,
    payload: DailyEntryRequest,
) -> Result<FinancialDocument> {
    let entry = payload.into_entry()?;
    apply(state, identity, |data| {
        let existing = entry_mut(&mut data.daily_income_tracker, "daily_income_tracker", index)?;
        existing.date = entry.date;
        existing.hours_worked = entry.hours_worked;
        existing.gross_income = entry.gross_income;
        Ok(())
    })
    .await
}

/// Move one month of tracked daily income into the monthly cash flow, using the
/// default loan repayment. Running it twice for a month adds a second entry.
pub async fn process_month(
    state: &AppState,
    identity: &Identity,
    month: &str,
) -> Result<FinancialDocument> {
    let month = parse_month_key(month)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {:?}", month)))?;

    apply(state, identity, |data| {
        let income = month_net_income(
            &data.daily_income_tracker,
            &month,
            data.settings.tax_rate_percent,
        );
        tracing::info!("Processing {} into monthly cash flow (net {:.2})", month, income);
        let loan_repayment = data.settings.default_loan_repayment;
        data.monthly_cash_flow.push(MonthlyEntry::new(month, income, loan_repayment));
        Ok(())
    })
    .await
}
