//! Supported target currencies and their fallback conversion rates from the base currency.
//! Amounts on capital sources are always recorded in the base currency (BDT).

use serde::{Deserialize, Serialize};

/// Currency every capital source amount is recorded in.
pub const BASE_CURRENCY: &str = "BDT";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    AUD,
    USD,
    NZD,
    EUR,
    GBP,
    CAD,
    SGD,
    HKD,
    JPY,
    CNY,
    INR,
    MYR,
    CHF,
    AED,
    SAR,
    KRW,
    ZAR,
    BRL,
    MXN,
}

impl Currency {
    /// Listing order matters: the first entry is the fallback for unknown codes.
    pub const ALL: [Currency; 19] = [
        Currency::AUD,
        Currency::USD,
        Currency::NZD,
        Currency::EUR,
        Currency::GBP,
        Currency::CAD,
        Currency::SGD,
        Currency::HKD,
        Currency::JPY,
        Currency::CNY,
        Currency::INR,
        Currency::MYR,
        Currency::CHF,
        Currency::AED,
        Currency::SAR,
        Currency::KRW,
        Currency::ZAR,
        Currency::BRL,
        Currency::MXN,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::USD => "USD",
            Currency::NZD => "NZD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::SGD => "SGD",
            Currency::HKD => "HKD",
            Currency::JPY => "JPY",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::MYR => "MYR",
            Currency::CHF => "CHF",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
            Currency::KRW => "KRW",
            Currency::ZAR => "ZAR",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
        }
    }

    pub fn parse_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "AUD" => Some(Currency::AUD),
            "USD" => Some(Currency::USD),
            "NZD" => Some(Currency::NZD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "SGD" => Some(Currency::SGD),
            "HKD" => Some(Currency::HKD),
            "JPY" => Some(Currency::JPY),
            "CNY" => Some(Currency::CNY),
            "INR" => Some(Currency::INR),
            "MYR" => Some(Currency::MYR),
            "CHF" => Some(Currency::CHF),
            "AED" => Some(Currency::AED),
            "SAR" => Some(Currency::SAR),
            "KRW" => Some(Currency::KRW),
            "ZAR" => Some(Currency::ZAR),
            "BRL" => Some(Currency::BRL),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }

    /// Hardcoded BDT -> code rate used when settings carry no override.
    pub fn fallback_rate(&self) -> f64 {
        match self {
            Currency::AUD => 0.0127,
            Currency::USD => 0.0091,
            Currency::NZD => 0.0135,
            Currency::EUR => 0.0084,
            Currency::GBP => 0.0072,
            Currency::CAD => 0.0124,
            Currency::SGD => 0.0122,
            Currency::HKD => 0.0710,
            Currency::JPY => 1.36,
            Currency::CNY => 0.0655,
            Currency::INR => 0.76,
            Currency::MYR => 0.0425,
            Currency::CHF => 0.0080,
            Currency::AED => 0.0334,
            Currency::SAR => 0.0341,
            Currency::KRW => 12.30,
            Currency::ZAR => 0.165,
            Currency::BRL => 0.050,
            Currency::MXN => 0.165,
        }
    }

    /// Settings key holding a live override, e.g. `bdt_to_aud_rate`.
    pub fn rate_key(&self) -> String {
        format!(
            "{}_to_{}_rate",
            BASE_CURRENCY.to_lowercase(),
            self.as_str().to_lowercase()
        )
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
