//! Currencies recognized in the transaction sheet

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Currency {
    #[default]
    #[serde(rename = "PEN")]
    Pen,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Pen, Currency::Usd];

    /// Resolves a free-form currency label. Matching is by substring, so the
    /// first hit in the order `USD`, `PEN`, `SOL` wins; anything else is PEN.
    pub fn parse(raw: &str) -> Currency {
        let label = raw.trim().to_uppercase();
        match label.as_str() {
            l if l.contains("USD") => Currency::Usd,
            l if l.contains("PEN") || l.contains("SOL") => Currency::Pen,
            _ => Currency::Pen,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Pen => "PEN",
            Currency::Usd => "USD",
        }
    }

    /// Symbol used when printing amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Pen => "S/",
            Currency::Usd => "$",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One value per recognized currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerCurrency<T> {
    #[serde(rename = "PEN")]
    pub pen: T,
    #[serde(rename = "USD")]
    pub usd: T,
}

impl<T> PerCurrency<T> {
    pub fn get(&self, currency: Currency) -> &T {
        match currency {
            Currency::Pen => &self.pen,
            Currency::Usd => &self.usd,
        }
    }

    pub fn get_mut(&mut self, currency: Currency) -> &mut T {
        match currency {
            Currency::Pen => &mut self.pen,
            Currency::Usd => &mut self.usd,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, &T)> {
        Currency::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}
