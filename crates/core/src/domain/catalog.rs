use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogItemId(pub String);

/// Fixed set of fabrication categories. Shutters, outer frames, and glass
/// panes are priced from physical area; everything else carries a flat
/// per-unit price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Shutter,
    OuterFrame,
    Glass,
    Accessory,
    Hardware,
    Other,
}

impl ItemCategory {
    pub const AREA_PRICED: [ItemCategory; 3] =
        [ItemCategory::Shutter, ItemCategory::OuterFrame, ItemCategory::Glass];

    pub fn is_area_priced(self) -> bool {
        Self::AREA_PRICED.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shutter => "shutter",
            Self::OuterFrame => "outer_frame",
            Self::Glass => "glass",
            Self::Accessory => "accessory",
            Self::Hardware => "hardware",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shutter" => Ok(Self::Shutter),
            "outer_frame" => Ok(Self::OuterFrame),
            "glass" => Ok(Self::Glass),
            "accessory" => Ok(Self::Accessory),
            "hardware" => Ok(Self::Hardware),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown item category `{other}`")),
        }
    }
}

/// Category-specific descriptive payload. Informational only: nothing here
/// participates in pricing math.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryAttributes {
    Shutter { material: String, thickness_mm: Option<Decimal> },
    OuterFrame { material: String, thickness_mm: Option<Decimal> },
    Glass { thickness_mm: Decimal, tint: Option<String> },
    Accessory { color: Option<String> },
    Hardware { description: Option<String> },
    Other { description: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: String,
    pub category: ItemCategory,
    /// Currency-agnostic base unit price. Catalog data is trusted as-is;
    /// zero or negative values are not rejected here.
    pub base_price: Decimal,
    pub attributes: Option<CategoryAttributes>,
}

/// Read-only catalog query interface. The pricing engine depends on this
/// trait, never on a concrete item collection, so any persistence backend
/// can stand behind it.
pub trait CatalogSource {
    fn get(&self, id: &CatalogItemId) -> Option<CatalogItem>;
    fn list(&self) -> Vec<CatalogItem>;
}

/// In-memory catalog, the default `CatalogSource` for sessions that load
/// the item set up front.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

impl CatalogSource for Catalog {
    fn get(&self, id: &CatalogItemId) -> Option<CatalogItem> {
        self.items.iter().find(|item| &item.id == id).cloned()
    }

    fn list(&self) -> Vec<CatalogItem> {
        self.items.clone()
    }
}
