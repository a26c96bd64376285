use serde::Deserialize;
use std::collections::BTreeMap;

use super::{apply, ensure_finite, entry_mut, ExpenseRequest};
use crate::errors::{AppError, Result};
use crate::models::{CapitalSource, Expense, FinancialDocument, Identity};
use crate::services::currency::resolve_rate;
use crate::AppState;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateSourcesRequest {
    /// Base-currency amount by source name. Names not present in the document are ignored.
    #[serde(default)]
    pub amounts: BTreeMap<String, f64>,
    /// Manual rate for the current target currency.
    pub rate: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AddCapitalSourceRequest {
    pub name: String,
    #[serde(default)]
    pub amount_bdt: f64,
    #[serde(default)]
    pub is_loan: bool,
}

pub async fn update_sources(
    state: &AppState,
    identity: &Identity,
    payload: UpdateSourcesRequest,
) -> Result<FinancialDocument> {
    for (name, amount) in &payload.amounts {
        ensure_finite(name, *amount)?;
    }
    if let Some(rate) = payload.rate {
        ensure_finite("rate", rate)?;
    }

    apply(state, identity, |data| {
        for source in data.capital.sources.iter_mut() {
            if let Some(amount) = payload.amounts.get(&source.name) {
                source.amount_bdt = *amount;
            }
        }
        if let Some(rate) = payload.rate {
            let (_, currency) = resolve_rate(&data.settings);
            data.settings.set_rate_override(currency, rate);
        }
        Ok(())
    })
    .await
}

pub async fn add_capital_source(
    state: &AppState,
    identity: &Identity,
    payload: AddCapitalSourceRequest,
) -> Result<FinancialDocument> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput("source name is required".to_string()));
    }
    let amount_bdt = ensure_finite("amount_bdt", payload.amount_bdt)?;

    apply(state, identity, |data| {
        if payload.is_loan {
            clear_loan_flags(&mut data.capital.sources);
        }
        data.capital.sources.push(CapitalSource {
            is_loan: payload.is_loan,
            ..CapitalSource::new(name, amount_bdt)
        });
        Ok(())
    })
    .await
}

/// Mark one source as the loan. At most one source carries the flag afterwards.
pub async fn set_loan_source(
    state: &AppState,
    identity: &Identity,
    index: usize,
) -> Result<FinancialDocument> {
    apply(state, identity, |data| {
        entry_mut(&mut data.capital.sources, "capital_sources", index)?;
        clear_loan_flags(&mut data.capital.sources);
        data.capital.sources[index].is_loan = true;
        Ok(())
    })
    .await
}

pub async fn add_capital_expense(
    state: &AppState,
    identity: &Identity,
    payload: ExpenseRequest,
) -> Result<FinancialDocument> {
    let amount = ensure_finite("amount", payload.amount)?;
    apply(state, identity, |data| {
        data.capital.expenses_from_capital.push(Expense::new(payload.name, amount));
        Ok(())
    })
    .await
}

pub async fn edit_capital_expense(
    state: &AppState,
    identity: &Identity,
    index: usize,
    payload: ExpenseRequest,
) -> Result<FinancialDocument> {
    let amount = ensure_finite("amount", payload.amount)?;
    apply(state, identity, |data| {
        let expense =
            entry_mut(&mut data.capital.expenses_from_capital, "capital_expenses", index)?;
        expense.name = payload.name;
        expense.amount = amount;
        Ok(())
    })
    .await
}

fn clear_loan_flags(sources: &mut [CapitalSource]) {
    for source in sources.iter_mut() {
        source.is_loan = false;
    }
}
