//! Resolves the BDT -> target conversion rate from a settings document. No network access:
//! live rates arrive through `RateQuote`s that a fetcher outside this crate produces and
//! that are stored back into settings as overrides.

use serde::{Deserialize, Serialize};

use crate::models::{Currency, Settings};

/// Result of one exchange-rate lookup, as reported by the rate-fetch collaborator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RateQuote {
    pub fn ok(
        to: Currency,
        rate: f64,
        timestamp: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            rate: Some(rate),
            from_currency: Some(crate::models::BASE_CURRENCY.to_string()),
            to_currency: Some(to.as_str().to_string()),
            timestamp: Some(timestamp.into()),
            source: Some(source.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Rate and currency all derived figures are displayed in.
///
/// An unsupported `target_currency` falls back to the first listed currency and its
/// hardcoded rate instead of failing.
pub fn resolve_rate(settings: &Settings) -> (f64, Currency) {
    match Currency::parse_code(&settings.target_currency) {
        Some(currency) => {
            let rate = settings
                .rate_override(currency)
                .unwrap_or_else(|| currency.fallback_rate());
            (rate, currency)
        }
        None => {
            let fallback = Currency::ALL[0];
            tracing::warn!(
                "Unsupported target currency {:?}, falling back to {}",
                settings.target_currency,
                fallback
            );
            (fallback.fallback_rate(), fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(code: &str) -> Settings {
        Settings {
            target_currency: code.to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn fallback_constant_without_override() {
        assert_eq!(resolve_rate(&settings_for("USD")), (0.0091, Currency::USD));
        assert_eq!(resolve_rate(&settings_for("JPY")), (1.36, Currency::JPY));
    }

    #[test]
    fn override_wins_over_fallback() {
        let mut settings = settings_for("EUR");
        settings.set_rate_override(Currency::EUR, 0.0079);
        assert_eq!(resolve_rate(&settings), (0.0079, Currency::EUR));
    }

    #[test]
    fn override_for_other_currency_is_ignored() {
        let mut settings = settings_for("GBP");
        settings.set_rate_override(Currency::AUD, 0.5);
        assert_eq!(resolve_rate(&settings), (0.0072, Currency::GBP));
    }

    #[test]
    fn unsupported_code_falls_back_to_first_listed() {
        let mut settings = settings_for("XYZ");
        settings.set_rate_override(Currency::AUD, 0.02);
        assert_eq!(resolve_rate(&settings), (0.0127, Currency::AUD));
    }

    #[test]
    fn lowercase_target_code_resolves() {
        assert_eq!(resolve_rate(&settings_for("nzd")).1, Currency::NZD);
    }

    #[test]
    fn quote_wire_shape() {
        let failed = serde_json::to_value(RateQuote::failed("Request timed out")).unwrap();
        assert_eq!(failed, serde_json::json!({"success": false, "error": "Request timed out"}));

        let ok = RateQuote::ok(Currency::AUD, 0.013, "2024-05-01T10:00:00", "ExchangeRate-API");
        assert_eq!(ok.from_currency.as_deref(), Some("BDT"));
        assert_eq!(ok.to_currency.as_deref(), Some("AUD"));
    }
}
