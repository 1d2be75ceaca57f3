//! Transactions and their payloads.

use chrono::{DateTime, Utc};
use common::{InventoryId, TransactionId, TransactionType, UserId, lenient};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::wire;

fn one() -> Decimal {
    Decimal::ONE
}

/// A recorded purchase, sale or capital movement.
///
/// `total_amount` is computed by the server; clients never set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: UserId,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub transaction_type: TransactionType,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub amount_per_unit: Decimal,
    #[serde(default = "one", deserialize_with = "lenient::deserialize")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub total_amount: Decimal,
    #[serde(deserialize_with = "wire::timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
    #[serde(default, deserialize_with = "lenient::option::deserialize")]
    pub purchase_price: Option<Decimal>,
    #[serde(default, alias = "ownerFullName", skip_serializing_if = "Option::is_none")]
    pub owner_full_name: Option<String>,
    #[serde(default, alias = "inventoryName", skip_serializing_if = "Option::is_none")]
    pub inventory_name: Option<String>,
}

impl Transaction {
    /// Returns the linked item and quantity when this transaction moves
    /// stock-linked goods (`inventory_id` set and `quantity > 0`).
    ///
    /// Capital transactions still report a link; whether it moves stock is
    /// decided by the transaction type.
    pub fn stock_link(&self) -> Option<(InventoryId, Decimal)> {
        match self.inventory_id {
            Some(id) if self.quantity > Decimal::ZERO => Some((id, self.quantity)),
            _ => None,
        }
    }
}

/// Payload for creating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCreate {
    pub title: String,
    pub owner_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub transaction_type: TransactionType,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub amount_per_unit: Decimal,
    #[serde(default = "one", deserialize_with = "lenient::deserialize")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "wire::timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<InventoryId>,
    #[serde(
        default,
        deserialize_with = "lenient::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_price: Option<Decimal>,
}

impl TransactionCreate {
    /// Creates an expense payload of quantity 1 with no amount.
    pub fn new(title: impl Into<String>, owner_id: UserId, date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            owner_id,
            description: None,
            transaction_type: TransactionType::default(),
            amount_per_unit: Decimal::ZERO,
            quantity: Decimal::ONE,
            date,
            inventory_id: None,
            purchase_price: None,
        }
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn amount_per_unit(mut self, amount: Decimal) -> Self {
        self.amount_per_unit = amount;
        self
    }

    pub fn inventory(mut self, inventory_id: InventoryId) -> Self {
        self.inventory_id = Some(inventory_id);
        self
    }

    pub fn purchase_price(mut self, price: Decimal) -> Self {
        self.purchase_price = Some(price);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the title and the non-negative quantity invariant.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "title" });
        }
        non_negative("quantity", self.quantity)
    }
}

/// Partial update for a transaction.
///
/// Absent fields keep their current value. `inventory_id` is tri-state:
/// absent keeps the link, `null` removes it, a value relinks. A `null`
/// transaction type is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(
        default,
        deserialize_with = "lenient::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_per_unit: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "wire::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "wire::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub inventory_id: Option<Option<InventoryId>>,
    #[serde(
        default,
        deserialize_with = "lenient::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_price: Option<Decimal>,
}

impl TransactionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn amount_per_unit(mut self, amount: Decimal) -> Self {
        self.amount_per_unit = Some(amount);
        self
    }

    pub fn inventory(mut self, inventory_id: InventoryId) -> Self {
        self.inventory_id = Some(Some(inventory_id));
        self
    }

    pub fn unlink_inventory(mut self) -> Self {
        self.inventory_id = Some(None);
        self
    }

    /// Effective inventory link after applying this update to `existing`.
    pub fn effective_inventory_id(&self, existing: &Transaction) -> Option<InventoryId> {
        match self.inventory_id {
            Some(link) => link,
            None => existing.inventory_id,
        }
    }

    /// Effective quantity after applying this update to `existing`.
    pub fn effective_quantity(&self, existing: &Transaction) -> Decimal {
        self.quantity.unwrap_or(existing.quantity)
    }

    /// Effective type after applying this update to `existing`.
    pub fn effective_type(&self, existing: &Transaction) -> TransactionType {
        self.transaction_type.unwrap_or(existing.transaction_type)
    }

    /// Returns the record that results from applying this update.
    ///
    /// Used by stores that keep records locally; the total is recomputed.
    pub fn apply_to(&self, existing: &Transaction) -> Result<Transaction> {
        let mut updated = existing.clone();
        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if let Some(description) = &self.description {
            updated.description = Some(description.clone());
        }
        updated.transaction_type = self.effective_type(existing);
        if let Some(amount) = self.amount_per_unit {
            updated.amount_per_unit = amount;
        }
        updated.quantity = self.effective_quantity(existing);
        if let Some(date) = self.date {
            updated.date = date;
        }
        updated.inventory_id = self.effective_inventory_id(existing);
        if let Some(price) = self.purchase_price {
            updated.purchase_price = Some(price);
        }
        updated.total_amount = line_total(updated.amount_per_unit, updated.quantity)?;
        Ok(updated)
    }

    /// Checks the title and the non-negative quantity invariant.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(DomainError::EmptyField { field: "title" });
        }
        match self.quantity {
            Some(q) => non_negative("quantity", q),
            None => Ok(()),
        }
    }
}

/// `amount_per_unit × quantity`, failing instead of overflowing.
pub fn line_total(amount_per_unit: Decimal, quantity: Decimal) -> Result<Decimal> {
    amount_per_unit
        .checked_mul(quantity)
        .ok_or(DomainError::Overflow {
            field: "total_amount",
        })
}

fn non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(DomainError::Negative {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
