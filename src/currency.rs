//! Currency catalogue offered for selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Popular currencies offered by the converter (ISO 4217 codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
    /// Swiss Franc
    CHF,
    /// Chinese Yuan
    CNY,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
    /// Argentine Peso
    ARS,
    /// Paraguayan Guarani
    PYG,
}

impl Currency {
    /// Get ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
            Currency::ARS => "ARS",
            Currency::PYG => "PYG",
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::JPY => "Japanese Yen",
            Currency::AUD => "Australian Dollar",
            Currency::CAD => "Canadian Dollar",
            Currency::CHF => "Swiss Franc",
            Currency::CNY => "Chinese Yuan",
            Currency::BRL => "Brazilian Real",
            Currency::MXN => "Mexican Peso",
            Currency::ARS => "Argentine Peso",
            Currency::PYG => "Paraguayan Guarani",
        }
    }

    /// Get currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
            Currency::CHF => "Fr",
            Currency::CNY => "¥",
            Currency::BRL => "R$",
            Currency::MXN => "$",
            Currency::ARS => "$",
            Currency::PYG => "₲",
        }
    }

    /// Parse from ISO code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Get all catalogued currencies, in menu order
    pub fn all() -> Vec<Currency> {
        vec![
            Currency::USD,
            Currency::EUR,
            Currency::GBP,
            Currency::JPY,
            Currency::AUD,
            Currency::CAD,
            Currency::CHF,
            Currency::CNY,
            Currency::BRL,
            Currency::MXN,
            Currency::ARS,
            Currency::PYG,
        ]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Symbol for any code; codes outside the catalogue display as themselves
pub fn symbol_for(code: &str) -> String {
    Currency::from_code(code)
        .map(|c| c.symbol().to_string())
        .unwrap_or_else(|| code.to_uppercase())
}
