use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Base-currency money is represented as integer cents so that sums are exact.
/// 1 CNY = 100 cents, so ¥92.00 = 9200 cents.
pub type Cents = i64;

/// Fixed HKD -> CNY conversion rate applied when an entry is recorded
/// (early-2026 reference rate). Never looked up live.
pub const FIXED_RATE: Decimal = dec!(0.92);

/// Largest amount a single entry may carry: ¥1,000,000,000.00.
/// Keeps every ledger total far away from `Cents::MAX`.
pub const MAX_ENTRY_CENTS: Cents = 100_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Renminbi, the base currency every stored amount is expressed in
    Cny,
    /// Hong Kong dollar, converted at `FIXED_RATE`
    Hkd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Cny => "CNY",
            Currency::Hkd => "HKD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CNY" | "RMB" => Some(Currency::Cny),
            "HKD" => Some(Currency::Hkd),
            _ => None,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Currency::Cny)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convert an amount in `currency` to base-currency cents.
///
/// Rounds to 2 decimal places half-up (midpoint away from zero).
/// Returns `None` if the result exceeds `MAX_ENTRY_CENTS` in magnitude.
pub fn normalize(amount: Decimal, currency: Currency) -> Option<Cents> {
    let base = match currency {
        Currency::Cny => amount,
        Currency::Hkd => amount.checked_mul(FIXED_RATE)?,
    };
    to_cents(base).filter(|cents| cents.unsigned_abs() <= MAX_ENTRY_CENTS.unsigned_abs())
}

/// Round a decimal amount half-up to whole cents.
pub fn to_cents(amount: Decimal) -> Option<Cents> {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(dec!(100))?
        .to_i64()
}

/// Format cents as a human-readable currency string.
/// Example: 9200 -> "92.00", 5 -> "0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal amount as typed by the user ("100", "12.5", "0.125").
pub fn parse_amount(input: &str) -> Option<Decimal> {
    input.trim().parse::<Decimal>().ok()
}
