// Tests for the ledger aggregation: capital conversion, savings, loan progress and
// daily income grouping, all computed from an in-memory document.

use pretty_assertions::assert_eq;
use savings_planner::models::document::SORT_OLDEST_FIRST;
use savings_planner::models::Currency;
use savings_planner::services::ledger::{aggregate, LoanStats};

mod test_helpers;
use test_helpers::*;

#[test]
fn empty_sources_give_zero_capital_and_negative_remaining() {
    let mut doc = document_with_rate(0.0127);
    doc.capital.expenses_from_capital = vec![expense("Visa", 120.0), expense("Flights", 80.5)];

    let view = aggregate(&doc);

    assert_eq!(view.total_capital, 0.0);
    assert_eq!(view.remaining_capital, -200.5);
    assert_eq!(view.loan, LoanStats::default());
}

#[test]
fn loan_scenario_from_parents_and_loan_sources() {
    let mut doc = document_with_rate(0.01);
    doc.capital.sources = vec![source("Parents", 0.0), source("Loan", 100000.0)];
    doc.monthly_cash_flow = vec![monthly("2024-01", 500.0, 200.0)];

    let view = aggregate(&doc);

    assert!(approx_eq(view.total_capital, 1000.0));
    assert!(approx_eq(view.loan.principal, 1000.0));
    assert!(approx_eq(view.loan.total_paid, 200.0));
    assert!(approx_eq(view.loan.remaining_balance, 800.0));
    assert!(approx_eq(view.loan.progress_percent, 20.0));
    assert_eq!(view.loan.payment_count, 1);
    assert_eq!(view.loan.months_remaining, 0);
    assert_eq!(view.monthly_savings[0].savings, 300.0);
    assert!(approx_eq(view.net_savings, 1300.0));
}

#[test]
fn months_remaining_uses_default_repayment() {
    let mut doc = document_with_rate(1.0);
    doc.capital.sources = vec![source("loan", 450.0)];
    doc.monthly_cash_flow = vec![monthly("2024-01", 0.0, 200.0)];
    doc.settings.default_loan_repayment = 100.0;

    let view = aggregate(&doc);

    assert_eq!(view.loan.remaining_balance, 250.0);
    assert_eq!(view.loan.months_remaining, 3);
}

#[test]
fn tiny_repayment_does_not_overflow_months_remaining() {
    let mut doc = document_with_rate(1.0);
    doc.capital.sources = vec![source("Loan", 1000.0)];
    doc.settings.default_loan_repayment = 0.0000001;

    let view = aggregate(&doc);

    assert_eq!(view.loan.remaining_balance, 1000.0);
    assert_eq!(view.loan.months_remaining, u32::MAX);
}

#[test]
fn no_loan_source_leaves_loan_figures_zeroed() {
    let mut doc = document_with_rate(1.0);
    doc.capital.sources = vec![source("Parents", 1000.0), source("Loans and grants", 50.0)];
    doc.monthly_cash_flow = vec![monthly("2024-01", 100.0, 40.0)];

    let view = aggregate(&doc);

    assert_eq!(view.loan, LoanStats::default());
    assert_eq!(view.total_capital, 1050.0);
}

#[test]
fn net_savings_folds_in_remaining_capital() {
    let mut doc = document_with_rate(0.5);
    doc.capital.sources = vec![source("Parents", 2000.0)];
    doc.capital.expenses_from_capital = vec![expense("Deposit", 100.0)];
    doc.monthly_cash_flow = vec![
        monthly("2024-01", 1000.0, 250.0),
        monthly("2024-02", 800.0, 250.0),
    ];
    doc.expenses_from_savings = vec![expense("Laptop", 300.0)];

    let view = aggregate(&doc);

    assert_eq!(view.remaining_capital, 900.0);
    assert_eq!(view.total_savings, 1300.0);
    assert_eq!(view.total_expenses_from_savings, 300.0);
    assert_eq!(view.net_savings, (1300.0 - 300.0) + 900.0);
}

#[test]
fn duplicate_months_are_all_summed() {
    let mut doc = document_with_rate(1.0);
    doc.monthly_cash_flow = vec![
        monthly("2024-03", 100.0, 0.0),
        monthly("2024-03", 50.0, 0.0),
    ];

    let view = aggregate(&doc);

    assert_eq!(view.monthly_savings.len(), 2);
    assert_eq!(view.total_savings, 150.0);
    assert_eq!(view.processed_months.len(), 1);
    assert!(view.processed_months.contains("2024-03"));
}

#[test]
fn invalid_dates_skip_grouping_but_count_in_total() {
    let mut doc = document_with_rate(1.0);
    doc.settings.tax_rate_percent = 10.0;
    doc.daily_income_tracker = vec![
        daily("2024-01-05", 4.0, 100.0),
        daily("2024-13-40", 4.0, 100.0),
        daily(" 2024-01-09", 4.0, 100.0),
        daily("2024-01-20", 4.0, 200.0),
    ];

    let view = aggregate(&doc);

    assert_eq!(view.daily_income_by_month.len(), 1);
    let january = &view.daily_income_by_month[0];
    assert_eq!(january.month_key, "2024-01");
    assert_eq!(january.entries.len(), 2);
    assert!(approx_eq(january.total_net, 270.0));
    let nets: Vec<f64> = january.entries.iter().map(|e| e.net_income).collect();
    assert_eq!(nets, vec![90.0, 180.0]);
    assert!(approx_eq(view.total_net_daily_income, 270.0 + 90.0 + 90.0));
}

#[test]
fn daily_months_follow_sort_preference() {
    let mut doc = document_with_rate(1.0);
    doc.daily_income_tracker = vec![
        daily("2024-02-01", 1.0, 10.0),
        daily("2023-12-31", 1.0, 10.0),
        daily("2024-01-15", 1.0, 10.0),
    ];

    let newest: Vec<String> = aggregate(&doc)
        .daily_income_by_month
        .into_iter()
        .map(|b| b.month_key)
        .collect();
    assert_eq!(newest, vec!["2024-02", "2024-01", "2023-12"]);

    doc.settings.table_sort_order = SORT_OLDEST_FIRST.to_string();
    let oldest: Vec<String> = aggregate(&doc)
        .daily_income_by_month
        .into_iter()
        .map(|b| b.month_key)
        .collect();
    assert_eq!(oldest, vec!["2023-12", "2024-01", "2024-02"]);
}

#[test]
fn unsupported_currency_converts_with_fallback_rate() {
    let mut doc = document_with_rate(0.5);
    doc.settings.target_currency = "ZZZ".to_string();
    doc.capital.sources = vec![source("Parents", 10000.0)];

    let view = aggregate(&doc);

    assert_eq!(view.currency, Currency::AUD);
    assert_eq!(view.rate, 0.0127);
    assert!(approx_eq(view.total_capital, 127.0));
}

#[test]
fn converted_sources_keep_base_amounts() {
    let mut doc = document_with_rate(0.01);
    doc.settings.target_currency = "USD".to_string();
    doc.settings.set_rate_override(Currency::USD, 0.02);
    doc.capital.sources = vec![source("Friend", 500.0)];

    let view = aggregate(&doc);

    assert_eq!(view.currency, Currency::USD);
    assert_eq!(view.converted_sources[0].amount_bdt, 500.0);
    assert!(approx_eq(view.converted_sources[0].amount_converted, 10.0));
}
