//! Mutation handlers: load the whole document, change one thing, save the whole document.
//! Every handler returns the updated document so guest callers can keep it in their session.

pub mod capital;
pub mod daily;
pub mod savings;
pub mod settings;
pub mod view;

use serde::Deserialize;
use std::str::FromStr;

use crate::errors::{AppError, Result};
use crate::models::{FinancialDocument, Identity};
use crate::AppState;

pub use capital::{
    add_capital_expense, add_capital_source, edit_capital_expense, set_loan_source,
    update_sources, AddCapitalSourceRequest, UpdateSourcesRequest,
};
pub use daily::{add_daily_entry, edit_daily_entry, process_month, DailyEntryRequest};
pub use savings::{
    add_lump_sum_month, add_monthly_entry, add_savings_expense, edit_monthly_entry,
    edit_savings_expense, EditMonthlyRequest, LumpSumRequest, MonthlyEntryRequest,
};
pub use settings::{
    apply_rate_quote, update_profile, update_settings, update_tax_rate, UpdateProfileRequest,
    UpdateSettingsRequest,
};
pub use view::get_financial_view;

/// Name and amount of a one-off expense, used for both capital and savings expenses.
#[derive(Clone, Debug, Deserialize)]
pub struct ExpenseRequest {
    pub name: String,
    pub amount: f64,
}

/// Lists `delete_item` can remove from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListName {
    CapitalExpenses,
    CapitalSources,
    MonthlyCashFlow,
    ExpensesFromSavings,
    DailyIncomeTracker,
}

impl ListName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::CapitalExpenses => "capital_expenses",
            ListName::CapitalSources => "capital_sources",
            ListName::MonthlyCashFlow => "monthly_cash_flow",
            ListName::ExpensesFromSavings => "expenses_from_savings",
            ListName::DailyIncomeTracker => "daily_income_tracker",
        }
    }

    fn len_in(&self, data: &FinancialDocument) -> usize {
        match self {
            ListName::CapitalExpenses => data.capital.expenses_from_capital.len(),
            ListName::CapitalSources => data.capital.sources.len(),
            ListName::MonthlyCashFlow => data.monthly_cash_flow.len(),
            ListName::ExpensesFromSavings => data.expenses_from_savings.len(),
            ListName::DailyIncomeTracker => data.daily_income_tracker.len(),
        }
    }

    fn remove_from(&self, data: &mut FinancialDocument, index: usize) {
        match self {
            ListName::CapitalExpenses => {
                data.capital.expenses_from_capital.remove(index);
            }
            ListName::CapitalSources => {
                data.capital.sources.remove(index);
            }
            ListName::MonthlyCashFlow => {
                data.monthly_cash_flow.remove(index);
            }
            ListName::ExpensesFromSavings => {
                data.expenses_from_savings.remove(index);
            }
            ListName::DailyIncomeTracker => {
                data.daily_income_tracker.remove(index);
            }
        }
    }
}

impl FromStr for ListName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "capital_expenses" => Ok(ListName::CapitalExpenses),
            "capital_sources" => Ok(ListName::CapitalSources),
            "monthly_cash_flow" => Ok(ListName::MonthlyCashFlow),
            "expenses_from_savings" => Ok(ListName::ExpensesFromSavings),
            "daily_income_tracker" => Ok(ListName::DailyIncomeTracker),
            other => Err(AppError::UnknownList(other.to_string())),
        }
    }
}

/// Remove one entry. An out-of-range index fails before anything is written.
pub async fn delete_item(
    state: &AppState,
    identity: &Identity,
    list: &str,
    index: usize,
) -> Result<FinancialDocument> {
    let list: ListName = list.parse()?;
    apply(state, identity, |data| {
        if index >= list.len_in(data) {
            return Err(AppError::NotFound {
                list: list.as_str().to_string(),
                index,
            });
        }
        list.remove_from(data, index);
        Ok(())
    })
    .await
}

/// Load, mutate, save. Nothing is saved when `mutate` fails.
pub(crate) async fn apply<F>(
    state: &AppState,
    identity: &Identity,
    mutate: F,
) -> Result<FinancialDocument>
where
    F: FnOnce(&mut FinancialDocument) -> Result<()>,
{
    let mut data = state
        .store
        .load(identity)
        .await
        .map_err(|source| AppError::LoadFailed {
            identity: identity.to_string(),
            source,
        })?;

    mutate(&mut data)?;

    state
        .store
        .save(identity, &data)
        .await
        .map_err(|source| AppError::SaveFailed {
            identity: identity.to_string(),
            source,
        })?;

    tracing::debug!("Saved financial data for {}", identity);
    Ok(data)
}

pub(crate) fn entry_mut<'a, T>(list: &'a mut [T], name: &str, index: usize) -> Result<&'a mut T> {
    list.get_mut(index).ok_or_else(|| AppError::NotFound {
        list: name.to_string(),
        index,
    })
}

/// NaN and infinities would be written as JSON null and break the next load.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::InvalidInput(format!("{} must be a finite number", field)))
    }
}
