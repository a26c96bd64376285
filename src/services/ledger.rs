//! Pure aggregation from a stored document to the figures every page renders.
//! Nothing computed here is persisted; it is rebuilt on each request.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    CapitalSource, Currency, DailyEntry, Expense, FinancialDocument, MonthlyEntry, SortOrder,
};
use crate::services::currency::resolve_rate;
use crate::utils::{date::month_key, round2};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConvertedSource {
    pub name: String,
    pub amount_bdt: f64,
    pub amount_converted: f64,
    pub is_loan: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlySavings {
    pub month: String,
    pub savings: f64,
}

/// A daily entry with its after-tax income.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyNet {
    #[serde(flatten)]
    pub entry: DailyEntry,
    pub net_income: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthBucket {
    pub month_key: String,
    pub entries: Vec<DailyNet>,
    pub total_net: f64,
}

/// Zeroed when the document has no loan source.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LoanStats {
    pub principal: f64,
    pub total_paid: f64,
    pub payment_count: usize,
    pub remaining_balance: f64,
    pub progress_percent: f64,
    pub months_remaining: u32,
}

/// Everything the presentation layer needs for one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LedgerView {
    pub currency: Currency,
    pub rate: f64,
    pub converted_sources: Vec<ConvertedSource>,
    pub total_capital: f64,
    pub total_capital_expenses: f64,
    pub remaining_capital: f64,
    pub monthly_savings: Vec<MonthlySavings>,
    pub total_savings: f64,
    pub total_expenses_from_savings: f64,
    pub net_savings: f64,
    pub total_net_daily_income: f64,
    pub daily_income_by_month: Vec<MonthBucket>,
    pub loan: LoanStats,
    pub processed_months: BTreeSet<String>,
}

pub fn calculate_net_income(gross_income: f64, tax_rate_percent: f64) -> f64 {
    let tax_amount = gross_income * tax_rate_percent / 100.0;
    gross_income - tax_amount
}

pub fn calculate_total_daily_net_income(entries: &[DailyEntry], tax_rate_percent: f64) -> f64 {
    entries
        .iter()
        .map(|e| calculate_net_income(e.gross_income, tax_rate_percent))
        .sum()
}

pub fn calculate_total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

pub fn calculate_remaining_capital(total_capital: f64, expenses: &[Expense]) -> f64 {
    total_capital - calculate_total_expenses(expenses)
}

pub fn calculate_monthly_savings(cash_flow: &[MonthlyEntry]) -> Vec<MonthlySavings> {
    cash_flow
        .iter()
        .map(|m| MonthlySavings {
            month: m.month.clone(),
            savings: round2(m.income - m.loan_repayment),
        })
        .collect()
}

/// Plain sum of the already-rounded monthly figures.
pub fn calculate_total_savings(monthly: &[MonthlySavings]) -> f64 {
    monthly.iter().map(|m| m.savings).sum()
}

pub fn convert_sources(sources: &[CapitalSource], rate: f64) -> Vec<ConvertedSource> {
    sources
        .iter()
        .map(|s| ConvertedSource {
            name: s.name.clone(),
            amount_bdt: s.amount_bdt,
            amount_converted: s.amount_bdt * rate,
            is_loan: s.is_loan,
        })
        .collect()
}

/// Index of the loan source: the first explicitly flagged source, otherwise the first
/// source named "loan" (any case).
pub fn find_loan_source(sources: &[CapitalSource]) -> Option<usize> {
    sources
        .iter()
        .position(|s| s.is_loan)
        .or_else(|| sources.iter().position(CapitalSource::is_named_loan))
}

pub fn calculate_loan_stats(
    principal: f64,
    cash_flow: &[MonthlyEntry],
    default_repayment: f64,
) -> LoanStats {
    let total_paid: f64 = cash_flow.iter().map(|m| m.loan_repayment).sum();
    let remaining_balance = (principal - total_paid).max(0.0);
    let progress_percent = if principal > 0.0 {
        total_paid / principal * 100.0
    } else {
        0.0
    };
    // One past exact division: 250 / 100 -> 3. Saturates at u32::MAX.
    let months_remaining = if default_repayment > 0.0 && remaining_balance > 0.0 {
        ((remaining_balance / default_repayment).floor() + 1.0).min(u32::MAX as f64) as u32
    } else {
        0
    };

    LoanStats {
        principal,
        total_paid,
        payment_count: cash_flow.len(),
        remaining_balance,
        progress_percent,
        months_remaining,
    }
}

/// Groups daily entries by "YYYY-MM". Entries whose date does not parse are left out.
pub fn group_daily_income_by_month(
    entries: &[DailyEntry],
    tax_rate_percent: f64,
    order: SortOrder,
) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<String, MonthBucket> = BTreeMap::new();
    for entry in entries {
        let Some(key) = month_key(&entry.date) else {
            continue;
        };
        let bucket = buckets.entry(key.clone()).or_insert_with(|| MonthBucket {
            month_key: key,
            entries: Vec::new(),
            total_net: 0.0,
        });
        let net_income = calculate_net_income(entry.gross_income, tax_rate_percent);
        bucket.entries.push(DailyNet {
            entry: entry.clone(),
            net_income,
        });
        bucket.total_net += net_income;
    }

    let mut sorted: Vec<MonthBucket> = buckets.into_values().collect();
    if order == SortOrder::NewestFirst {
        sorted.reverse();
    }
    sorted
}

/// Net income of one month's parseable daily entries.
pub fn month_net_income(entries: &[DailyEntry], month: &str, tax_rate_percent: f64) -> f64 {
    entries
        .iter()
        .filter(|e| month_key(&e.date).as_deref() == Some(month))
        .map(|e| calculate_net_income(e.gross_income, tax_rate_percent))
        .sum()
}

/// Build the view using the rate resolved from the document's own settings.
pub fn aggregate(doc: &FinancialDocument) -> LedgerView {
    let (rate, currency) = resolve_rate(&doc.settings);
    aggregate_with_rate(doc, rate, currency)
}

pub fn aggregate_with_rate(doc: &FinancialDocument, rate: f64, currency: Currency) -> LedgerView {
    let settings = &doc.settings;
    let tax_rate = settings.tax_rate_percent;

    let converted_sources = convert_sources(&doc.capital.sources, rate);
    let total_capital: f64 = converted_sources.iter().map(|s| s.amount_converted).sum();

    let loan = match find_loan_source(&doc.capital.sources) {
        Some(index) => calculate_loan_stats(
            converted_sources[index].amount_converted,
            &doc.monthly_cash_flow,
            settings.default_loan_repayment,
        ),
        None => LoanStats::default(),
    };

    let total_capital_expenses = calculate_total_expenses(&doc.capital.expenses_from_capital);
    let remaining_capital =
        calculate_remaining_capital(total_capital, &doc.capital.expenses_from_capital);

    let monthly_savings = calculate_monthly_savings(&doc.monthly_cash_flow);
    let total_savings = calculate_total_savings(&monthly_savings);
    let total_expenses_from_savings = calculate_total_expenses(&doc.expenses_from_savings);
    // Remaining capital is folded into net savings rather than tracked separately.
    let net_savings = (total_savings - total_expenses_from_savings) + remaining_capital;

    let total_net_daily_income =
        calculate_total_daily_net_income(&doc.daily_income_tracker, tax_rate);
    let daily_income_by_month =
        group_daily_income_by_month(&doc.daily_income_tracker, tax_rate, settings.sort_order());

    let processed_months = doc
        .monthly_cash_flow
        .iter()
        .map(|m| m.month.clone())
        .collect();

    LedgerView {
        currency,
        rate,
        converted_sources,
        total_capital,
        total_capital_expenses,
        remaining_capital,
        monthly_savings,
        total_savings,
        total_expenses_from_savings,
        net_savings,
        total_net_daily_income,
        daily_income_by_month,
        loan,
        processed_months,
    }
}
