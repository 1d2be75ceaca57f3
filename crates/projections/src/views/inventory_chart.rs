//! Stock per inventory item.

use std::collections::HashMap;

use common::{CategoryId, InventoryId, WeightId};
use domain::{Category, InventoryItem, Page, Weight};
use remote::{CategoryResource, InventoryResource, WeightResource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryChartQuery {
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub weight_id: Option<WeightId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryBar {
    pub inventory_id: InventoryId,
    pub name: String,
    pub quantity: Decimal,
    pub category: String,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryChart {
    /// Sorted by quantity, largest first.
    pub bars: Vec<InventoryBar>,
}

impl InventoryChart {
    /// Filters items and resolves their category and weight names.
    ///
    /// Names come from the lookup lists first, then from the record's own
    /// enrichment, and fall back to `"Unknown"`.
    pub fn build(
        items: &[InventoryItem],
        categories: &[Category],
        weights: &[Weight],
        query: &InventoryChartQuery,
    ) -> Self {
        let category_names: HashMap<CategoryId, &str> =
            categories.iter().map(|c| (c.id, c.name.as_str())).collect();
        let weight_names: HashMap<WeightId, &str> =
            weights.iter().map(|w| (w.id, w.name.as_str())).collect();

        let mut bars: Vec<InventoryBar> = items
            .iter()
            .filter(|item| query.category_id.is_none_or(|id| item.category_id == id))
            .filter(|item| query.weight_id.is_none_or(|id| item.weight_id == id))
            .map(|item| InventoryBar {
                inventory_id: item.id,
                name: item.name.clone(),
                quantity: item.quantity,
                category: resolve(
                    category_names.get(&item.category_id).copied(),
                    item.category_name.as_deref(),
                ),
                weight: resolve(
                    weight_names.get(&item.weight_id).copied(),
                    item.weight_name.as_deref(),
                ),
            })
            .collect();

        // Stable sort keeps listing order among equal quantities.
        bars.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        Self { bars }
    }

    #[tracing::instrument(skip(remote))]
    pub async fn load<R>(remote: &R, query: &InventoryChartQuery) -> Result<Self>
    where
        R: InventoryResource + CategoryResource + WeightResource,
    {
        let items = remote.list_inventory(Page::all()).await?;
        let categories = remote.list_categories(Page::all()).await?;
        let weights = remote.list_weights(Page::all()).await?;
        Ok(Self::build(&items, &categories, &weights, query))
    }
}

fn resolve(lookup: Option<&str>, enriched: Option<&str>) -> String {
    lookup.or(enriched).unwrap_or(UNKNOWN).to_string()
}
