// Test helpers for building app state over a temporary data directory

#![allow(dead_code)]

use savings_planner::config::Config;
use savings_planner::models::{
    CapitalSource, DailyEntry, Expense, FinancialDocument, MonthlyEntry,
};
use savings_planner::AppState;
use tempfile::TempDir;

pub async fn setup_json_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state = AppState::from_config(Config::json(dir.path().join("data")))
        .await
        .expect("Failed to build app state");
    (state, dir)
}

pub fn source(name: &str, amount_bdt: f64) -> CapitalSource {
    CapitalSource::new(name, amount_bdt)
}

pub fn monthly(month: &str, income: f64, loan_repayment: f64) -> MonthlyEntry {
    MonthlyEntry::new(month, income, loan_repayment)
}

pub fn daily(date: &str, hours_worked: f64, gross_income: f64) -> DailyEntry {
    DailyEntry::new(date, hours_worked, gross_income)
}

pub fn expense(name: &str, amount: f64) -> Expense {
    Expense::new(name, amount)
}

/// Empty document converting at a fixed AUD rate.
pub fn document_with_rate(rate: f64) -> FinancialDocument {
    let mut doc = FinancialDocument::default();
    doc.settings.set_rate_override(savings_planner::models::Currency::AUD, rate);
    doc
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
