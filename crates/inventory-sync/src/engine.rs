//! Orchestrates transaction mutations and their inventory effects.

use std::sync::Arc;
use std::time::Instant;

use common::{TransactionId, TransactionType};
use domain::{Transaction, TransactionCreate, TransactionUpdate};
use remote::{InventoryResource, TransactionResource};
use rust_decimal::Decimal;

use crate::accessors::{InventoryAccessor, TransactionAccessor};
use crate::error::{Result, SyncError};
use crate::steps::{
    Adjustment, InventoryEffect, STEP_APPLY_EFFECT, STEP_PERSIST_TRANSACTION, STEP_PRE_VALIDATE,
    STEP_RESTORE_EFFECT, STEP_REVERSE_EFFECT, SyncOutcome, SyncWarning,
};

/// Keeps inventory stock consistent with the transactions applied to it.
///
/// Every operation re-fetches the state it needs before writing and holds
/// nothing between calls. Concurrent operations on the same item are not
/// coordinated: two of them can read the same stock and one write can
/// overwrite the other.
///
/// Dropping an operation's future stops it between remote calls. Steps that
/// already completed stay in place and no compensation is run for them.
pub struct InventorySyncEngine<R> {
    inventory: InventoryAccessor<R>,
    transactions: TransactionAccessor<R>,
}

impl<R> Clone for InventorySyncEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inventory: self.inventory.clone(),
            transactions: self.transactions.clone(),
        }
    }
}

impl<R> InventorySyncEngine<R>
where
    R: InventoryResource + TransactionResource,
{
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            inventory: InventoryAccessor::new(Arc::clone(&remote)),
            transactions: TransactionAccessor::new(remote),
        }
    }

    /// Records a new transaction and applies its inventory effect.
    ///
    /// An earning is checked against current stock before anything is
    /// written. Once the transaction exists it is never rolled back: a failed
    /// inventory step is returned as a warning in the outcome.
    #[tracing::instrument(skip(self, payload), fields(operation = "create"))]
    pub async fn create(&self, payload: TransactionCreate) -> Result<SyncOutcome<Transaction>> {
        let start = Instant::now();
        let result = self.run_create(payload).await;
        record("create", start, &result);
        result
    }

    /// Updates a transaction, moving its inventory effect to the new state.
    ///
    /// The old effect is reversed first, then the new one applied. If the new
    /// effect cannot be applied the reversal is undone and the record is left
    /// untouched.
    #[tracing::instrument(skip(self, payload), fields(operation = "update"))]
    pub async fn update(&self, id: TransactionId, payload: TransactionUpdate) -> Result<Transaction> {
        let start = Instant::now();
        let result = self.run_update(id, payload).await;
        record("update", start, &result);
        result
    }

    /// Deletes a transaction after reversing its inventory effect.
    ///
    /// If the reversal fails the record is kept.
    #[tracing::instrument(skip(self), fields(operation = "delete"))]
    pub async fn delete(&self, id: TransactionId) -> Result<()> {
        let start = Instant::now();
        let result = self.run_delete(id).await;
        record("delete", start, &result);
        result
    }

    async fn run_create(&self, payload: TransactionCreate) -> Result<SyncOutcome<Transaction>> {
        payload.validate()?;

        let effect = InventoryEffect::from_parts(
            payload.inventory_id,
            payload.transaction_type,
            payload.quantity,
        );
        let Some(effect) = effect else {
            let tx = self.transactions.create(payload).await?;
            return Ok(SyncOutcome::clean(tx));
        };

        if effect.transaction_type == TransactionType::Earning {
            let item = self.inventory.fetch_by_id(effect.inventory_id).await?;
            if item.quantity < effect.quantity {
                tracing::info!(
                    step = STEP_PRE_VALIDATE,
                    inventory_id = %item.id,
                    available = %item.quantity,
                    requested = %effect.quantity,
                    "insufficient stock, transaction not created"
                );
                return Err(SyncError::InsufficientInventory {
                    inventory_id: item.id,
                    available: item.quantity,
                    requested: effect.quantity,
                });
            }
        }

        let tx = self.transactions.create(payload).await?;
        tracing::info!(step = STEP_PERSIST_TRANSACTION, transaction_id = %tx.id, "transaction created");

        match self.apply_effect(effect).await {
            Ok(_) => Ok(SyncOutcome::clean(tx)),
            Err(e) => {
                tracing::warn!(
                    step = STEP_APPLY_EFFECT,
                    transaction_id = %tx.id,
                    inventory_id = %effect.inventory_id,
                    error = %e,
                    "inventory not adjusted, transaction kept"
                );
                metrics::counter!("inventory_sync_warnings_total", "operation" => "create")
                    .increment(1);
                Ok(SyncOutcome {
                    value: tx,
                    warnings: vec![SyncWarning {
                        step: STEP_APPLY_EFFECT,
                        inventory_id: effect.inventory_id,
                        message: e.to_string(),
                    }],
                })
            }
        }
    }

    async fn run_update(&self, id: TransactionId, payload: TransactionUpdate) -> Result<Transaction> {
        payload.validate()?;
        let existing = self.transactions.fetch_by_id(id).await?;

        let old_effect = InventoryEffect::of(&existing);
        if let Some(old) = old_effect {
            self.apply_effect(old.reversed()).await.inspect_err(|e| {
                tracing::warn!(
                    step = STEP_REVERSE_EFFECT,
                    inventory_id = %old.inventory_id,
                    error = %e,
                    "could not reverse old effect, update aborted"
                );
            })?;
        }

        let new_effect = InventoryEffect::from_parts(
            payload.effective_inventory_id(&existing),
            payload.effective_type(&existing),
            payload.effective_quantity(&existing),
        );
        if let Some(new) = new_effect
            && let Err(e) = self.apply_effect(new).await
        {
            tracing::warn!(
                step = STEP_APPLY_EFFECT,
                inventory_id = %new.inventory_id,
                error = %e,
                "could not apply new effect, restoring old one"
            );
            if let Some(old) = old_effect {
                self.compensate(STEP_RESTORE_EFFECT, old).await;
            }
            return Err(e);
        }

        match self.transactions.update(id, payload).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                tracing::warn!(
                    step = STEP_PERSIST_TRANSACTION,
                    transaction_id = %id,
                    error = %e,
                    "record not updated, moving stock back"
                );
                if let Some(new) = new_effect {
                    self.compensate(STEP_REVERSE_EFFECT, new.reversed()).await;
                }
                if let Some(old) = old_effect {
                    self.compensate(STEP_RESTORE_EFFECT, old).await;
                }
                Err(e)
            }
        }
    }

    async fn run_delete(&self, id: TransactionId) -> Result<()> {
        let existing = self.transactions.fetch_by_id(id).await?;

        let effect = InventoryEffect::of(&existing);
        if let Some(effect) = effect {
            self.apply_effect(effect.reversed()).await.inspect_err(|e| {
                tracing::warn!(
                    step = STEP_REVERSE_EFFECT,
                    inventory_id = %effect.inventory_id,
                    error = %e,
                    "could not reverse effect, delete aborted"
                );
            })?;
        }

        if let Err(e) = self.transactions.delete(id).await {
            if let Some(effect) = effect {
                self.compensate(STEP_RESTORE_EFFECT, effect).await;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Re-fetches the item, checks the result stays non-negative and writes
    /// it. Neutral effects (capital) write nothing.
    async fn apply_effect(&self, effect: InventoryEffect) -> Result<Adjustment> {
        let item = self.inventory.fetch_by_id(effect.inventory_id).await?;
        let delta = effect.delta();
        let after = item
            .quantity
            .checked_add(delta)
            .ok_or_else(|| SyncError::InventoryUpdateFailed {
                inventory_id: item.id,
                reason: format!("quantity overflow: {} + {}", item.quantity, delta),
            })?;

        if after < Decimal::ZERO {
            return Err(SyncError::InsufficientInventory {
                inventory_id: item.id,
                available: item.quantity,
                requested: effect.quantity,
            });
        }

        let adjustment = Adjustment {
            inventory_id: item.id,
            before: item.quantity,
            after,
        };
        if adjustment.is_noop() {
            return Ok(adjustment);
        }

        self.inventory.apply_quantity(&item, after).await?;
        tracing::debug!(
            inventory_id = %item.id,
            before = %adjustment.before,
            after = %adjustment.after,
            "stock adjusted"
        );
        Ok(adjustment)
    }

    /// Best-effort compensation; a failure is logged and counted.
    async fn compensate(&self, step: &'static str, effect: InventoryEffect) {
        metrics::counter!("inventory_sync_compensations_total", "step" => step).increment(1);
        if let Err(e) = self.apply_effect(effect).await {
            metrics::counter!("inventory_sync_compensations_failed_total", "step" => step)
                .increment(1);
            tracing::error!(
                step,
                inventory_id = %effect.inventory_id,
                error = %e,
                "compensation failed, stock needs manual correction"
            );
        }
    }
}

fn record<T>(operation: &'static str, start: Instant, result: &Result<T>) {
    metrics::counter!("inventory_sync_operations_total", "operation" => operation).increment(1);
    metrics::histogram!("inventory_sync_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
    if let Err(e) = result {
        metrics::counter!(
            "inventory_sync_failures_total",
            "operation" => operation,
            "kind" => e.kind()
        )
        .increment(1);
    }
}
