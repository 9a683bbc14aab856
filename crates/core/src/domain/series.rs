use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ItemCategory;
use crate::errors::DomainError;

/// Quality tier of a quotation. Multipliers are strictly increasing and
/// never below 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesTier {
    #[default]
    Standard,
    Premium,
    Luxury,
}

impl SeriesTier {
    pub const ALL: [SeriesTier; 3] = [SeriesTier::Standard, SeriesTier::Premium, SeriesTier::Luxury];

    pub fn multiplier(self) -> Decimal {
        match self {
            Self::Standard => Decimal::ONE,
            Self::Premium => Decimal::new(125, 2),
            Self::Luxury => Decimal::new(15, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Luxury => "luxury",
        }
    }
}

impl std::str::FromStr for SeriesTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            "luxury" => Ok(Self::Luxury),
            other => Err(format!("unknown series tier `{other}`")),
        }
    }
}

/// Width and height of a fabricated piece in millimeters. Both sides must
/// be strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width_mm: Decimal,
    height_mm: Decimal,
}

impl Dimensions {
    pub fn new(width_mm: Decimal, height_mm: Decimal) -> Result<Self, DomainError> {
        if width_mm <= Decimal::ZERO || height_mm <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "dimensions must be positive, got {width_mm}mm x {height_mm}mm"
            )));
        }
        Ok(Self { width_mm, height_mm })
    }

    pub fn width_mm(&self) -> Decimal {
        self.width_mm
    }

    pub fn height_mm(&self) -> Decimal {
        self.height_mm
    }

    pub fn area_mm2(&self) -> Decimal {
        self.width_mm * self.height_mm
    }
}

/// Rates for area-priced categories, expressed as currency per 1000 mm².
/// Every area-priced category must carry a rate for every tier; the
/// constructor enforces that, so lookups during repricing cannot miss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaRateTable {
    rates: HashMap<ItemCategory, HashMap<SeriesTier, Decimal>>,
}

impl AreaRateTable {
    pub fn new(
        entries: impl IntoIterator<Item = (ItemCategory, SeriesTier, Decimal)>,
    ) -> Result<Self, DomainError> {
        let mut rates: HashMap<ItemCategory, HashMap<SeriesTier, Decimal>> = HashMap::new();
        for (category, tier, rate) in entries {
            if !category.is_area_priced() {
                return Err(DomainError::validation(format!(
                    "category `{}` is not area-priced and cannot carry an area rate",
                    category.as_str()
                )));
            }
            if rate < Decimal::ZERO {
                return Err(DomainError::validation(format!(
                    "area rate for {}/{} must be non-negative",
                    category.as_str(),
                    tier.as_str()
                )));
            }
            rates.entry(category).or_default().insert(tier, rate);
        }

        for category in ItemCategory::AREA_PRICED {
            for tier in SeriesTier::ALL {
                if rates.get(&category).and_then(|by_tier| by_tier.get(&tier)).is_none() {
                    return Err(DomainError::validation(format!(
                        "missing area rate for {}/{}",
                        category.as_str(),
                        tier.as_str()
                    )));
                }
            }
        }

        Ok(Self { rates })
    }

    pub fn rate(&self, category: ItemCategory, tier: SeriesTier) -> Option<Decimal> {
        self.rates.get(&category).and_then(|by_tier| by_tier.get(&tier)).copied()
    }
}

impl Default for AreaRateTable {
    /// Reference rates. Deployments construct their own table via `new`.
    fn default() -> Self {
        let entries = [
            (ItemCategory::Shutter, SeriesTier::Standard, Decimal::from(18)),
            (ItemCategory::Shutter, SeriesTier::Premium, Decimal::from(24)),
            (ItemCategory::Shutter, SeriesTier::Luxury, Decimal::from(32)),
            (ItemCategory::OuterFrame, SeriesTier::Standard, Decimal::from(12)),
            (ItemCategory::OuterFrame, SeriesTier::Premium, Decimal::from(16)),
            (ItemCategory::OuterFrame, SeriesTier::Luxury, Decimal::from(22)),
            (ItemCategory::Glass, SeriesTier::Standard, Decimal::from(15)),
            (ItemCategory::Glass, SeriesTier::Premium, Decimal::from(21)),
            (ItemCategory::Glass, SeriesTier::Luxury, Decimal::from(27)),
        ];
        Self::new(entries).expect("reference rate table covers every category and tier")
    }
}
