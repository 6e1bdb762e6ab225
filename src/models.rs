use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Branch {
    A,
    B,
    C,
}

pub const ALL_BRANCHES: &[Branch] = &[Branch::A, Branch::B, Branch::C];

impl Branch {
    pub fn key(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        ALL_BRANCHES
            .iter()
            .find(|b| b.key().eq_ignore_ascii_case(raw))
            .copied()
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ProductLine {
    #[serde(rename = "Electronic accessories")]
    ElectronicAccessories,
    #[serde(rename = "Fashion accessories")]
    FashionAccessories,
    #[serde(rename = "Food and beverages")]
    FoodAndBeverages,
    #[serde(rename = "Health and beauty")]
    HealthAndBeauty,
    #[serde(rename = "Home and lifestyle")]
    HomeAndLifestyle,
    #[serde(rename = "Sports and travel")]
    SportsAndTravel,
}

pub const ALL_PRODUCT_LINES: &[ProductLine] = &[
    ProductLine::ElectronicAccessories,
    ProductLine::FashionAccessories,
    ProductLine::FoodAndBeverages,
    ProductLine::HealthAndBeauty,
    ProductLine::HomeAndLifestyle,
    ProductLine::SportsAndTravel,
];

impl ProductLine {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ElectronicAccessories => "Electronic accessories",
            Self::FashionAccessories => "Fashion accessories",
            Self::FoodAndBeverages => "Food and beverages",
            Self::HealthAndBeauty => "Health and beauty",
            Self::HomeAndLifestyle => "Home and lifestyle",
            Self::SportsAndTravel => "Sports and travel",
        }
    }

    /// Short form accepted on the command line, e.g. `food` or `sports`.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ElectronicAccessories => "electronic",
            Self::FashionAccessories => "fashion",
            Self::FoodAndBeverages => "food",
            Self::HealthAndBeauty => "health",
            Self::HomeAndLifestyle => "home",
            Self::SportsAndTravel => "sports",
        }
    }

    /// Matches the full name case-insensitively, or the slug.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        ALL_PRODUCT_LINES
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(raw) || p.slug().eq_ignore_ascii_case(raw))
            .copied()
    }
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CustomerType {
    Member,
    Normal,
}

impl CustomerType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Normal => "Normal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "member" => Some(Self::Member),
            "normal" => Some(Self::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit card")]
    CreditCard,
    Ewallet,
}

impl PaymentMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit card",
            Self::Ewallet => "Ewallet",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "credit card" => Some(Self::CreditCard),
            "ewallet" | "e-wallet" => Some(Self::Ewallet),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One point-of-sale record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub invoice_id: Option<String>,
    pub branch: Branch,
    pub city: Option<String>,
    pub customer_type: CustomerType,
    pub gender: Option<String>,
    pub product_line: ProductLine,
    pub unit_price: f64,
    pub quantity: u32,
    pub tax: f64,
    /// Tax-inclusive.
    pub total: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub payment: PaymentMethod,
    pub cogs: f64,
    pub gross_margin_pct: f64,
    pub gross_income: f64,
    pub rating: f64,
}

impl Transaction {
    /// Describes the first broken row invariant, if any.
    pub fn invariant_violation(&self) -> Option<&'static str> {
        if self.cogs < 0.0 {
            Some("cogs is negative")
        } else if self.total < self.cogs {
            Some("total is less than cogs")
        } else if !(0.0..=10.0).contains(&self.rating) {
            Some("rating outside 0-10")
        } else {
            None
        }
    }
}
