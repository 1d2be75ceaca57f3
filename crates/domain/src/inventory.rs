//! Inventory items.

use common::{CategoryId, InventoryId, WeightId, lenient};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// A stocked item and its authoritative on-hand quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryId,
    pub name: String,
    pub category_id: CategoryId,
    pub weight_id: WeightId,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub quantity: Decimal,
    /// Category name, when the server enriches the record.
    #[serde(default, alias = "categoryName", skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Weight name, when the server enriches the record.
    #[serde(default, alias = "weightName", skip_serializing_if = "Option::is_none")]
    pub weight_name: Option<String>,
}

impl InventoryItem {
    /// Builds the full-replace record that keeps every field but the quantity.
    ///
    /// The remote update contract is not guaranteed to support partial
    /// patches, so stock writes always resend name, category and weight.
    pub fn with_quantity(&self, quantity: Decimal) -> InventoryUpdate {
        InventoryUpdate {
            name: self.name.clone(),
            quantity,
            category_id: self.category_id,
            weight_id: self.weight_id,
        }
    }
}

/// Payload for creating an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryCreate {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub quantity: Decimal,
    pub category_id: CategoryId,
    pub weight_id: WeightId,
}

impl InventoryCreate {
    /// Checks the name and the non-negative stock invariant.
    pub fn validate(&self) -> Result<()> {
        validate_record(&self.name, self.quantity)
    }
}

/// Full-replace update record for an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub quantity: Decimal,
    pub category_id: CategoryId,
    pub weight_id: WeightId,
}

impl InventoryUpdate {
    /// Checks the name and the non-negative stock invariant.
    pub fn validate(&self) -> Result<()> {
        validate_record(&self.name, self.quantity)
    }

    /// Applies this record to an existing item, keeping its id.
    pub fn apply_to(&self, id: InventoryId) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name.clone(),
            category_id: self.category_id,
            weight_id: self.weight_id,
            quantity: self.quantity,
            category_name: None,
            weight_name: None,
        }
    }
}

fn validate_record(name: &str, quantity: Decimal) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "name" });
    }
    if quantity < Decimal::ZERO {
        return Err(DomainError::Negative {
            field: "quantity",
            value: quantity.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> InventoryItem {
        serde_json::from_str(
            r#"{"id": 1, "name": "LPG 11kg", "category_id": 2, "weight_id": 3, "quantity": "100"}"#,
        )
        .unwrap()
    }

    #[test]
    fn decodes_string_quantity() {
        assert_eq!(item().quantity, Decimal::from(100));
    }

    #[test]
    fn decodes_camel_case_enrichment() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"id": 1, "name": "Beer", "category_id": 5, "weight_id": 6,
                "quantity": 12, "categoryName": "Beer", "weight_name": "355ml (12oz)"}"#,
        )
        .unwrap();
        assert_eq!(item.category_name.as_deref(), Some("Beer"));
        assert_eq!(item.weight_name.as_deref(), Some("355ml (12oz)"));
    }

    #[test]
    fn missing_quantity_is_zero() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"id": 1, "name": "Butane", "category_id": 2, "weight_id": 3}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, Decimal::ZERO);
    }

    #[test]
    fn with_quantity_keeps_every_other_field() {
        let update = item().with_quantity(Decimal::from(90));
        assert_eq!(update.name, "LPG 11kg");
        assert_eq!(update.category_id, CategoryId::new(2));
        assert_eq!(update.weight_id, WeightId::new(3));
        assert_eq!(update.quantity, Decimal::from(90));
    }

    #[test]
    fn validation_rejects_negative_stock_and_blank_names() {
        let mut create = InventoryCreate {
            name: "Pepsi".to_string(),
            quantity: Decimal::from(-1),
            category_id: CategoryId::new(1),
            weight_id: WeightId::new(1),
        };
        assert!(matches!(
            create.validate(),
            Err(DomainError::Negative { field: "quantity", .. })
        ));

        create.quantity = Decimal::ZERO;
        assert!(create.validate().is_ok());

        create.name = "  ".to_string();
        assert_eq!(
            create.validate(),
            Err(DomainError::EmptyField { field: "name" })
        );
    }
}
