use serde::Deserialize;

use super::{apply, ensure_finite, entry_mut, ExpenseRequest};
use crate::errors::{AppError, Result};
use crate::models::{Expense, FinancialDocument, Identity, MonthlyEntry};
use crate::services::ledger::calculate_net_income;
use crate::utils::date::parse_month_key;
use crate::AppState;

#[derive(Clone, Debug, Deserialize)]
pub struct MonthlyEntryRequest {
    pub month: String,
    /// Net income in the target currency.
    pub income: f64,
    pub loan_repayment: f64,
}

/// A month's gross income entered in one go; tax and the default repayment are applied.
#[derive(Clone, Debug, Deserialize)]
pub struct LumpSumRequest {
    pub year: i32,
    pub month: u32,
    pub gross_income: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EditMonthlyRequest {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub loan_repayment: f64,
}

fn month_from_parts(year: i32, month: u32) -> Result<String> {
    parse_month_key(&format!("{}-{}", year, month))
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {}-{}", year, month)))
}

/// Appends even if the month already has an entry; duplicates are summed.
pub async fn add_monthly_entry(
    state: &AppState,
    identity: &Identity,
    payload: MonthlyEntryRequest,
) -> Result<FinancialDocument> {
    let month = parse_month_key(&payload.month)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {:?}", payload.month)))?;
    let income = ensure_finite("income", payload.income)?;
    let loan_repayment = ensure_finite("loan_repayment", payload.loan_repayment)?;

    apply(state, identity, |data| {
        data.monthly_cash_flow.push(MonthlyEntry::new(month, income, loan_repayment));
        Ok(())
    })
    .await
}

pub async fn add_lump_sum_month(
    state: &AppState,
    identity: &Identity,
    payload: LumpSumRequest,
) -> Result<FinancialDocument> {
    let month = month_from_parts(payload.year, payload.month)?;
    let gross_income = ensure_finite("gross_income", payload.gross_income)?;

    apply(state, identity, |data| {
        let settings = &data.settings;
        let entry = MonthlyEntry::new(
            month,
            calculate_net_income(gross_income, settings.tax_rate_percent),
            settings.default_loan_repayment,
        );
        data.monthly_cash_flow.push(entry);
        Ok(())
    })
    .await
}

pub async fn edit_monthly_entry(
    state: &AppState,
    identity: &Identity,
    index: usize,
    payload: EditMonthlyRequest,
) -> Result<FinancialDocument> {
    let month = month_from_parts(payload.year, payload.month)?;
    let income = ensure_finite("income", payload.income)?;
    let loan_repayment = ensure_finite("loan_repayment", payload.loan_repayment)?;

    apply(state, identity, |data| {
        let entry = entry_mut(&mut data.monthly_cash_flow, "monthly_cash_flow", index)?;
        entry.month = month;
        entry.income = income;
        entry.loan_repayment = loan_repayment;
        Ok(())
    })
    .await
}

pub async fn add_savings_expense(
    state: &AppState,
    identity: &Identity,
    payload: ExpenseRequest,
) -> Result<FinancialDocument> {
    let amount = ensure_finite("amount", payload.amount)?;
    apply(state, identity, |data| {
        data.expenses_from_savings.push(Expense::new(payload.name, amount));
        Ok(())
    })
    .await
}

pub async fn edit_savings_expense(
    state: &AppState,
    identity: &Identity,
    index: usize,
    payload: ExpenseRequest,
) -> Result<FinancialDocument> {
    let amount = ensure_finite("amount", payload.amount)?;
    apply(state, identity, |data| {
        let expense = entry_mut(&mut data.expenses_from_savings, "expenses_from_savings", index)?;
        expense.name = payload.name;
        expense.amount = amount;
        Ok(())
    })
    .await
}
