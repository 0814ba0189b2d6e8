use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{normalize, parse_amount, Cents, Currency};

/// Date format used for entry input, storage and export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where an expense happened. `InTransit` covers everything on the road between cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum City {
    Hangzhou,
    Shenzhen,
    HongKong,
    InTransit,
}

impl City {
    pub const ALL: [City; 4] = [
        City::Hangzhou,
        City::Shenzhen,
        City::HongKong,
        City::InTransit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            City::Hangzhou => "hangzhou",
            City::Shenzhen => "shenzhen",
            City::HongKong => "hong-kong",
            City::InTransit => "in-transit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            City::Hangzhou => "Hangzhou",
            City::Shenzhen => "Shenzhen",
            City::HongKong => "Hong Kong",
            City::InTransit => "In Transit",
        }
    }

    /// Label used by the original spreadsheet files.
    pub fn local_label(&self) -> &'static str {
        match self {
            City::Hangzhou => "杭州",
            City::Shenzhen => "深圳",
            City::HongKong => "香港",
            City::InTransit => "途中/高速",
        }
    }

    /// Accepts the slug, the display name (case-insensitive) or the local label.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|city| {
            s.eq_ignore_ascii_case(city.as_str())
                || s.eq_ignore_ascii_case(city.display_name())
                || s == city.local_label()
        })
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Dining,
    Lodging,
    Sightseeing,
    /// Charging or refuelling the car
    VehicleEnergy,
    TollParking,
    Shopping,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Dining,
        Category::Lodging,
        Category::Sightseeing,
        Category::VehicleEnergy,
        Category::TollParking,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dining => "dining",
            Category::Lodging => "lodging",
            Category::Sightseeing => "sightseeing",
            Category::VehicleEnergy => "vehicle-energy",
            Category::TollParking => "toll-parking",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Dining => "Dining",
            Category::Lodging => "Lodging",
            Category::Sightseeing => "Sightseeing",
            Category::VehicleEnergy => "Vehicle Energy",
            Category::TollParking => "Toll/Parking",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    pub fn local_label(&self) -> &'static str {
        match self {
            Category::Dining => "餐饮",
            Category::Lodging => "住宿",
            Category::Sightseeing => "景点",
            Category::VehicleEnergy => "自驾补能",
            Category::TollParking => "高速/停车",
            Category::Shopping => "购物",
            Category::Other => "其他",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|category| {
            s.eq_ignore_ascii_case(category.as_str())
                || s.eq_ignore_ascii_case(category.display_name())
                || s == category.local_label()
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// An entry exactly as it was typed, before validation and currency normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub date: String,
    pub city: String,
    pub category: String,
    pub currency: String,
    pub amount: String,
    pub description: String,
    pub note: String,
}

impl RawEntry {
    pub fn new(
        date: impl Into<String>,
        city: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            city: city.into(),
            category: category.into(),
            currency: currency.into(),
            amount: amount.into(),
            description: String::new(),
            note: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// One immutable expense in the ledger. The amount is always in base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub city: City,
    pub category: Category,
    pub description: String,
    /// Amount in base-currency cents, never negative
    pub amount_base: Cents,
    pub note: String,
}

impl ExpenseRecord {
    /// Validate a raw entry and normalize its amount into base currency.
    pub fn from_raw(raw: &RawEntry) -> Result<Self, EntryError> {
        let date = NaiveDate::parse_from_str(raw.date.trim(), DATE_FORMAT)
            .map_err(|_| EntryError::InvalidDate(raw.date.clone()))?;
        let city = City::from_str(&raw.city).ok_or_else(|| EntryError::InvalidCity(raw.city.clone()))?;
        let category = Category::from_str(&raw.category)
            .ok_or_else(|| EntryError::InvalidCategory(raw.category.clone()))?;
        let currency = Currency::from_str(&raw.currency)
            .ok_or_else(|| EntryError::InvalidCurrency(raw.currency.clone()))?;

        let amount =
            parse_amount(&raw.amount).ok_or_else(|| EntryError::InvalidAmount(raw.amount.clone()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(EntryError::InvalidAmount(raw.amount.clone()));
        }
        let amount_base =
            normalize(amount, currency).ok_or_else(|| EntryError::InvalidAmount(raw.amount.clone()))?;

        Ok(Self {
            date,
            city,
            category,
            description: raw.description.clone(),
            amount_base,
            note: raw.note.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    InvalidDate(String),
    InvalidCity(String),
    InvalidCategory(String),
    InvalidCurrency(String),
    InvalidAmount(String),
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::InvalidDate(s) => write!(f, "invalid date '{}', expected YYYY-MM-DD", s),
            EntryError::InvalidCity(s) => write!(f, "unknown city '{}'", s),
            EntryError::InvalidCategory(s) => write!(f, "unknown category '{}'", s),
            EntryError::InvalidCurrency(s) => write!(f, "unsupported currency '{}'", s),
            EntryError::InvalidAmount(s) => {
                write!(f, "invalid amount '{}', expected a non-negative number", s)
            }
        }
    }
}

impl std::error::Error for EntryError {}
