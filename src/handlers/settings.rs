use chrono::Utc;
use serde::Deserialize;

use super::{apply, ensure_finite};
use crate::errors::{AppError, Result};
use crate::models::document::{SORT_NEWEST_FIRST, SORT_OLDEST_FIRST};
use crate::models::{Currency, FinancialDocument, Identity};
use crate::services::currency::RateQuote;
use crate::AppState;

const DEFAULT_RATE_SOURCE: &str = "ExchangeRate-API";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub target_currency: Option<String>,
    pub default_loan_repayment: Option<f64>,
    pub loan_interest_rate: Option<f64>,
    pub loan_period_months: Option<u32>,
    pub table_sort_order: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub goal: Option<String>,
}

pub async fn update_tax_rate(
    state: &AppState,
    identity: &Identity,
    tax_rate_percent: f64,
) -> Result<FinancialDocument> {
    let tax_rate_percent = ensure_finite("tax_rate_percent", tax_rate_percent)?;
    apply(state, identity, |data| {
        data.settings.tax_rate_percent = tax_rate_percent;
        Ok(())
    })
    .await
}

/// New input is validated here; documents already holding an unknown currency code
/// still load and fall back at read time.
pub async fn update_settings(
    state: &AppState,
    identity: &Identity,
    payload: UpdateSettingsRequest,
) -> Result<FinancialDocument> {
    let target_currency = payload
        .target_currency
        .as_deref()
        .map(|code| {
            Currency::parse_code(code)
                .ok_or_else(|| AppError::InvalidInput(format!("unsupported currency {:?}", code)))
        })
        .transpose()?;
    if let Some(order) = payload.table_sort_order.as_deref() {
        if order != SORT_NEWEST_FIRST && order != SORT_OLDEST_FIRST {
            return Err(AppError::InvalidInput(format!("unknown sort order {:?}", order)));
        }
    }
    let default_loan_repayment = payload
        .default_loan_repayment
        .map(|v| ensure_finite("default_loan_repayment", v))
        .transpose()?;
    let loan_interest_rate = payload
        .loan_interest_rate
        .map(|v| ensure_finite("loan_interest_rate", v))
        .transpose()?;

    apply(state, identity, |data| {
        let settings = &mut data.settings;
        if let Some(currency) = target_currency {
            settings.target_currency = currency.as_str().to_string();
        }
        if let Some(value) = default_loan_repayment {
            settings.default_loan_repayment = value;
        }
        if let Some(value) = loan_interest_rate {
            settings.loan_interest_rate = value;
        }
        if let Some(value) = payload.loan_period_months {
            settings.loan_period_months = value;
        }
        if let Some(order) = payload.table_sort_order {
            settings.table_sort_order = order;
        }
        Ok(())
    })
    .await
}

/// Store a freshly fetched rate as the override for its currency. A failed quote is
/// reported back and nothing is written.
pub async fn apply_rate_quote(
    state: &AppState,
    identity: &Identity,
    quote: RateQuote,
) -> Result<FinancialDocument> {
    if !quote.success {
        let reason = quote.error.unwrap_or_else(|| "rate lookup failed".to_string());
        return Err(AppError::InvalidInput(reason));
    }
    let rate = quote
        .rate
        .ok_or_else(|| AppError::InvalidInput("rate quote has no rate".to_string()))?;
    let rate = ensure_finite("rate", rate)?;
    let quoted_currency = match quote.to_currency.as_deref() {
        Some(code) => Some(Currency::parse_code(code).ok_or_else(|| {
            AppError::InvalidInput(format!("unsupported currency {:?}", code))
        })?),
        None => None,
    };

    apply(state, identity, |data| {
        let currency = quoted_currency
            .or_else(|| Currency::parse_code(&data.settings.target_currency))
            .unwrap_or_default();
        let settings = &mut data.settings;
        settings.set_rate_override(currency, rate);
        settings.exchange_rate_updated_at =
            Some(quote.timestamp.unwrap_or_else(|| Utc::now().to_rfc3339()));
        settings.exchange_rate_source =
            Some(quote.source.unwrap_or_else(|| DEFAULT_RATE_SOURCE.to_string()));
        tracing::info!("Stored {} rate {} for {}", currency, rate, identity);
        Ok(())
    })
    .await
}

pub async fn update_profile(
    state: &AppState,
    identity: &Identity,
    payload: UpdateProfileRequest,
) -> Result<FinancialDocument> {
    apply(state, identity, |data| {
        if let Some(name) = payload.name {
            data.profile.name = name;
        }
        if let Some(goal) = payload.goal {
            data.profile.goal = goal;
        }
        Ok(())
    })
    .await
}
