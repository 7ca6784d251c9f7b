//! Display-time currency conversion.
//!
//! Stored prices are USD. Conversion into the display currency multiplies by the
//! active rate; values typed in the display currency are divided by it before storage.

use shared_types::{Currency, RateTable};

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    rates: RateTable,
    loaded: bool,
}

impl ExchangeRates {
    /// 1:1 table used before the startup fetch resolves
    pub fn pending() -> Self {
        Self {
            rates: identity_table(),
            loaded: false,
        }
    }

    /// Resolved 1:1 table, used when the rate source failed
    pub fn identity() -> Self {
        Self {
            rates: identity_table(),
            loaded: true,
        }
    }

    /// Resolved table. The reference currency is pinned to 1. Currencies that are missing
    /// or carry an unusable rate stay unresolved and cannot be selected.
    pub fn from_table(table: RateTable) -> Self {
        let mut rates = RateTable::from([(Currency::REFERENCE, 1.0)]);
        for (currency, rate) in table {
            if currency == Currency::REFERENCE {
                continue;
            }
            if rate.is_finite() && rate > 0.0 {
                rates.insert(currency, rate);
            } else {
                tracing::warn!(currency = %currency, rate, "Ignoring unusable exchange rate");
            }
        }
        Self {
            rates,
            loaded: true,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether prices can be shown in `currency` with a real rate
    pub fn is_available(&self, currency: Currency) -> bool {
        self.loaded && self.rates.contains_key(&currency)
    }

    /// Supported currencies the resolved table has no rate for
    pub fn unresolved(&self) -> Vec<Currency> {
        Currency::ALL
            .into_iter()
            .filter(|c| !self.rates.contains_key(c))
            .collect()
    }

    pub fn table(&self) -> &RateTable {
        &self.rates
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates.get(&currency).copied().unwrap_or(1.0)
    }

    /// USD amount expressed in `currency`
    pub fn to_display(&self, amount_usd: f64, currency: Currency) -> f64 {
        amount_usd * self.rate(currency)
    }

    /// Amount typed in `currency` converted back to USD
    pub fn to_reference(&self, amount: f64, currency: Currency) -> f64 {
        amount / self.rate(currency)
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::pending()
    }
}

fn identity_table() -> RateTable {
    Currency::ALL.into_iter().map(|c| (c, 1.0)).collect()
}

/// Formats `amount` en-US style: symbol prefix, thousands separators, two decimals.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    if !amount.is_finite() {
        return format!("{}0.00", currency.symbol());
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "{sign}{}{}.{fraction:02}",
        currency.symbol(),
        group_thousands(whole)
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
