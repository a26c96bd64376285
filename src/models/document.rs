//! Persisted per-user financial document. Field names are the storage contract: existing
//! JSON files and JSONB rows must round-trip without renames.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::currency::Currency;

pub const SORT_NEWEST_FIRST: &str = "newest_first";
pub const SORT_OLDEST_FIRST: &str = "oldest_first";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialDocument {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub capital: Capital,
    #[serde(default)]
    pub monthly_cash_flow: Vec<MonthlyEntry>,
    #[serde(default)]
    pub expenses_from_savings: Vec<Expense>,
    #[serde(default)]
    pub daily_income_tracker: Vec<DailyEntry>,
    /// Top-level keys not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display-only attributes. Unknown keys are kept so nothing is lost on save.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub goal: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub target_currency: String,
    pub tax_rate_percent: f64,
    pub default_loan_repayment: f64,
    pub loan_interest_rate: f64,
    #[serde(deserialize_with = "deserialize_months")]
    pub loan_period_months: u32,
    pub table_sort_order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate_updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate_source: Option<String>,
    /// Live rate overrides (`bdt_to_<code>_rate`) and any other keys not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_currency: Currency::default().as_str().to_string(),
            tax_rate_percent: 0.0,
            default_loan_repayment: 0.0,
            loan_interest_rate: 0.0,
            loan_period_months: 0,
            table_sort_order: SORT_NEWEST_FIRST.to_string(),
            exchange_rate_updated_at: None,
            exchange_rate_source: None,
            extra: Map::new(),
        }
    }
}

/// Month counts written by other tools may be stored as floats (`60.0`).
fn deserialize_months<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!("invalid month count {}", value)));
    }
    Ok(value.trunc() as u32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl Settings {
    pub fn rate_override(&self, currency: Currency) -> Option<f64> {
        self.extra.get(&currency.rate_key()).and_then(Value::as_f64)
    }

    pub fn set_rate_override(&mut self, currency: Currency, rate: f64) {
        self.extra.insert(currency.rate_key(), Value::from(rate));
    }

    pub fn sort_order(&self) -> SortOrder {
        if self.table_sort_order == SORT_NEWEST_FIRST {
            SortOrder::NewestFirst
        } else {
            SortOrder::OldestFirst
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Capital {
    #[serde(default)]
    pub sources: Vec<CapitalSource>,
    #[serde(default)]
    pub expenses_from_capital: Vec<Expense>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalSource {
    #[serde(default)]
    pub name: String,
    /// Amount in the base currency.
    #[serde(default)]
    pub amount_bdt: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_loan: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CapitalSource {
    pub fn new(name: impl Into<String>, amount_bdt: f64) -> Self {
        Self {
            name: name.into(),
            amount_bdt,
            ..Self::default()
        }
    }

    /// Legacy convention from before sources carried an explicit flag.
    pub fn is_named_loan(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case("loan")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Expense {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            extra: Map::new(),
        }
    }
}

/// One month of cash flow. `income` is already net and in the target currency.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEntry {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub loan_repayment: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MonthlyEntry {
    pub fn new(month: impl Into<String>, income: f64, loan_repayment: f64) -> Self {
        Self {
            month: month.into(),
            income,
            loan_repayment,
            extra: Map::new(),
        }
    }
}

/// `date` stays a raw string: unparseable dates are stored as entered and only
/// skipped when grouping by month.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub hours_worked: f64,
    #[serde(default)]
    pub gross_income: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DailyEntry {
    pub fn new(date: impl Into<String>, hours_worked: f64, gross_income: f64) -> Self {
        Self {
            date: date.into(),
            hours_worked,
            gross_income,
            extra: Map::new(),
        }
    }
}

impl FinancialDocument {
    /// Shape every new user (and every fresh guest session) starts from.
    pub fn new_default() -> Self {
        let mut settings = Settings {
            loan_period_months: 60,
            ..Settings::default()
        };
        settings.set_rate_override(Currency::AUD, Currency::AUD.fallback_rate());
        settings.set_rate_override(Currency::USD, Currency::USD.fallback_rate());
        settings.set_rate_override(Currency::NZD, Currency::NZD.fallback_rate());

        Self {
            profile: Profile {
                name: "Your Name".to_string(),
                goal: "Financial Planning".to_string(),
                extra: Map::new(),
            },
            settings,
            capital: Capital {
                sources: vec![
                    CapitalSource::new("Parents", 0.0),
                    CapitalSource::new("Friend", 0.0),
                    CapitalSource {
                        is_loan: true,
                        ..CapitalSource::new("Loan", 0.0)
                    },
                ],
                expenses_from_capital: Vec::new(),
                extra: Map::new(),
            },
            monthly_cash_flow: Vec::new(),
            expenses_from_savings: Vec::new(),
            daily_income_tracker: Vec::new(),
            extra: Map::new(),
        }
    }
}
