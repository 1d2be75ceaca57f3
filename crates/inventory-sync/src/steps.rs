//! Step names and typed step results.

use common::{InventoryId, TransactionType, signed_delta};
use domain::Transaction;
use rust_decimal::Decimal;
use serde::Serialize;

/// Step name: check stock before an earning is recorded.
pub const STEP_PRE_VALIDATE: &str = "pre_validate_stock";

/// Step name: create, update or delete the transaction record.
pub const STEP_PERSIST_TRANSACTION: &str = "persist_transaction";

/// Step name: undo the effect of the transaction as it was stored.
pub const STEP_REVERSE_EFFECT: &str = "reverse_inventory_effect";

/// Step name: apply the effect of the transaction as it will be stored.
pub const STEP_APPLY_EFFECT: &str = "apply_inventory_effect";

/// Step name: put back an effect that was reversed earlier in the operation.
pub const STEP_RESTORE_EFFECT: &str = "restore_inventory_effect";

/// The stock movement a transaction causes on one inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryEffect {
    pub inventory_id: InventoryId,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
}

impl InventoryEffect {
    /// Returns the effect of a stored transaction, if it has one.
    pub fn of(tx: &Transaction) -> Option<Self> {
        tx.stock_link().map(|(inventory_id, quantity)| Self {
            inventory_id,
            transaction_type: tx.transaction_type,
            quantity,
        })
    }

    /// An effect exists only when an item is linked and `quantity > 0`.
    pub fn from_parts(
        inventory_id: Option<InventoryId>,
        transaction_type: TransactionType,
        quantity: Decimal,
    ) -> Option<Self> {
        match inventory_id {
            Some(inventory_id) if quantity > Decimal::ZERO => Some(Self {
                inventory_id,
                transaction_type,
                quantity,
            }),
            _ => None,
        }
    }

    /// Signed change to the item's stock.
    pub fn delta(&self) -> Decimal {
        signed_delta(self.transaction_type, self.quantity)
    }

    /// The effect that undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            transaction_type: self.transaction_type.reversed(),
            ..*self
        }
    }
}

/// A stock change as it was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjustment {
    pub inventory_id: InventoryId,
    pub before: Decimal,
    pub after: Decimal,
}

impl Adjustment {
    /// True when nothing was written (e.g. a capital movement).
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

/// A tolerated failure: the operation succeeded but a step did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncWarning {
    pub step: &'static str,
    pub inventory_id: InventoryId,
    pub message: String,
}

/// Result of a successful operation together with tolerated failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome<T> {
    pub value: T,
    pub warnings: Vec<SyncWarning>,
}

impl<T> SyncOutcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
