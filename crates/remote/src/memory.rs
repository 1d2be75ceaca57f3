use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::{CategoryId, InventoryId, TransactionId, UserId, WeightId};
use domain::{
    Category, CategoryCreate, CategoryUpdate, InventoryCreate, InventoryItem, InventoryUpdate,
    Page, Transaction, TransactionCreate, TransactionSearch, TransactionUpdate, User, UserCreate,
    UserUpdate, Weight, WeightCreate, WeightUpdate, line_total,
};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::{
    RemoteError, Result,
    store::{CategoryResource, InventoryResource, TransactionResource, UserResource, WeightResource},
};

#[derive(Debug, Default)]
struct State {
    inventory: BTreeMap<InventoryId, InventoryItem>,
    transactions: BTreeMap<TransactionId, Transaction>,
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    weights: BTreeMap<WeightId, Weight>,
    last_id: i64,
    inventory_writes: usize,
    user_list_calls: usize,
    failing_items: HashSet<InventoryId>,
    fail_all_inventory_updates: bool,
    fail_on_inventory_list: bool,
    fail_inventory_update_in: Option<usize>,
    fail_on_transaction_create: bool,
    fail_on_transaction_update: bool,
    fail_on_transaction_delete: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Decides whether the inventory write about to happen is refused.
    fn refuse_inventory_write(&mut self, id: InventoryId) -> bool {
        if let Some(remaining) = self.fail_inventory_update_in.as_mut() {
            if *remaining <= 1 {
                self.fail_inventory_update_in = None;
                return true;
            }
            *remaining -= 1;
        }
        self.fail_all_inventory_updates || self.failing_items.contains(&id)
    }

    fn enrich_item(&self, item: &InventoryItem) -> InventoryItem {
        let mut item = item.clone();
        if let Some(category) = self.categories.get(&item.category_id) {
            item.category_name = Some(category.name.clone());
        }
        if let Some(weight) = self.weights.get(&item.weight_id) {
            item.weight_name = Some(weight.name.clone());
        }
        item
    }

    fn enrich_transaction(&self, tx: &mut Transaction) {
        tx.owner_full_name = self
            .users
            .get(&tx.owner_id)
            .and_then(|u| u.full_name.clone());
        tx.inventory_name = tx
            .inventory_id
            .and_then(|id| self.inventory.get(&id))
            .map(|item| item.name.clone());
    }

    /// Transactions newest first, ties broken by id.
    fn sorted_transactions(&self) -> Vec<Transaction> {
        let mut txs: Vec<_> = self.transactions.values().cloned().collect();
        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        txs
    }
}

/// In-memory remote store for tests and local runs.
///
/// Behaves like the real server: assigns ids, computes transaction totals
/// and enriches records with related names. Writes can be made to fail on
/// demand to exercise compensation paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemote {
    state: Arc<RwLock<State>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory item with the given stock (category and weight 1).
    pub async fn seed_inventory(&self, name: &str, quantity: Decimal) -> InventoryItem {
        let mut state = self.state.write().await;
        let id = InventoryId::new(state.next_id());
        let item = InventoryItem {
            id,
            name: name.to_string(),
            category_id: CategoryId::new(1),
            weight_id: WeightId::new(1),
            quantity,
            category_name: None,
            weight_name: None,
        };
        state.inventory.insert(id, item.clone());
        item
    }

    /// Current stock of an item, bypassing failure injection.
    pub async fn quantity_of(&self, id: InventoryId) -> Option<Decimal> {
        self.state.read().await.inventory.get(&id).map(|i| i.quantity)
    }

    /// Number of successful inventory updates since creation.
    pub async fn inventory_write_count(&self) -> usize {
        self.state.read().await.inventory_writes
    }

    /// Number of times the user list has been fetched.
    pub async fn user_list_count(&self) -> usize {
        self.state.read().await.user_list_calls
    }

    pub async fn transaction_count(&self) -> usize {
        self.state.read().await.transactions.len()
    }

    /// Makes every update of `id` fail until cleared.
    pub async fn fail_inventory_updates_for(&self, id: InventoryId) {
        self.state.write().await.failing_items.insert(id);
    }

    /// Makes every inventory update fail until cleared.
    pub async fn set_fail_on_inventory_update(&self, fail: bool) {
        self.state.write().await.fail_all_inventory_updates = fail;
    }

    /// Makes the `n`-th inventory update from now fail, once.
    pub async fn fail_nth_inventory_update(&self, n: usize) {
        self.state.write().await.fail_inventory_update_in = Some(n.max(1));
    }

    /// Removes every inventory failure configured so far.
    pub async fn clear_inventory_failures(&self) {
        let mut state = self.state.write().await;
        state.failing_items.clear();
        state.fail_all_inventory_updates = false;
        state.fail_inventory_update_in = None;
    }

    /// Makes listing inventory fail until cleared.
    pub async fn set_fail_on_inventory_list(&self, fail: bool) {
        self.state.write().await.fail_on_inventory_list = fail;
    }

    pub async fn set_fail_on_transaction_create(&self, fail: bool) {
        self.state.write().await.fail_on_transaction_create = fail;
    }

    pub async fn set_fail_on_transaction_update(&self, fail: bool) {
        self.state.write().await.fail_on_transaction_update = fail;
    }

    pub async fn set_fail_on_transaction_delete(&self, fail: bool) {
        self.state.write().await.fail_on_transaction_delete = fail;
    }
}

#[async_trait]
impl InventoryResource for InMemoryRemote {
    async fn list_inventory(&self, page: Page) -> Result<Vec<InventoryItem>> {
        let state = self.state.read().await;
        if state.fail_on_inventory_list {
            return Err(RemoteError::Unavailable("inventory list refused".to_string()));
        }
        let items = state
            .inventory
            .values()
            .map(|item| state.enrich_item(item))
            .collect();
        Ok(page.apply(items))
    }

    async fn get_inventory(&self, id: InventoryId) -> Result<InventoryItem> {
        let state = self.state.read().await;
        state
            .inventory
            .get(&id)
            .map(|item| state.enrich_item(item))
            .ok_or_else(|| RemoteError::not_found("inventory", id))
    }

    async fn create_inventory(&self, item: InventoryCreate) -> Result<InventoryItem> {
        item.validate()?;
        let mut state = self.state.write().await;
        let id = InventoryId::new(state.next_id());
        let created = InventoryItem {
            id,
            name: item.name,
            category_id: item.category_id,
            weight_id: item.weight_id,
            quantity: item.quantity,
            category_name: None,
            weight_name: None,
        };
        state.inventory.insert(id, created.clone());
        Ok(state.enrich_item(&created))
    }

    async fn update_inventory(
        &self,
        id: InventoryId,
        record: InventoryUpdate,
    ) -> Result<InventoryItem> {
        record.validate()?;
        let mut state = self.state.write().await;
        if !state.inventory.contains_key(&id) {
            return Err(RemoteError::not_found("inventory", id));
        }
        if state.refuse_inventory_write(id) {
            return Err(RemoteError::Unavailable(format!(
                "inventory {id} update refused"
            )));
        }
        let updated = record.apply_to(id);
        state.inventory.insert(id, updated.clone());
        state.inventory_writes += 1;
        Ok(state.enrich_item(&updated))
    }

    async fn delete_inventory(&self, id: InventoryId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .inventory
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found("inventory", id))
    }
}

#[async_trait]
impl TransactionResource for InMemoryRemote {
    async fn list_transactions(&self, page: Page) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        Ok(page.apply(state.sorted_transactions()))
    }

    async fn search_transactions(&self, search: &TransactionSearch) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        let hits = state
            .sorted_transactions()
            .into_iter()
            .filter(|tx| search.matches(tx))
            .collect();
        Ok(search.window().apply(hits))
    }

    async fn get_transaction(&self, id: TransactionId) -> Result<Transaction> {
        self.state
            .read()
            .await
            .transactions
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found("transaction", id))
    }

    async fn create_transaction(&self, tx: TransactionCreate) -> Result<Transaction> {
        tx.validate()?;
        let mut state = self.state.write().await;
        if state.fail_on_transaction_create {
            return Err(RemoteError::Unavailable(
                "transaction create refused".to_string(),
            ));
        }
        let total_amount = line_total(tx.amount_per_unit, tx.quantity)?;
        let id = TransactionId::new(state.next_id());
        let mut created = Transaction {
            id,
            title: tx.title,
            description: tx.description,
            owner_id: tx.owner_id,
            transaction_type: tx.transaction_type,
            amount_per_unit: tx.amount_per_unit,
            quantity: tx.quantity,
            total_amount,
            date: tx.date,
            inventory_id: tx.inventory_id,
            purchase_price: tx.purchase_price,
            owner_full_name: None,
            inventory_name: None,
        };
        state.enrich_transaction(&mut created);
        state.transactions.insert(id, created.clone());
        Ok(created)
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        update.validate()?;
        let mut state = self.state.write().await;
        let existing = state
            .transactions
            .get(&id)
            .ok_or_else(|| RemoteError::not_found("transaction", id))?;
        if state.fail_on_transaction_update {
            return Err(RemoteError::Unavailable(format!(
                "transaction {id} update refused"
            )));
        }
        let mut updated = update.apply_to(existing)?;
        state.enrich_transaction(&mut updated);
        state.transactions.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.transactions.contains_key(&id) {
            return Err(RemoteError::not_found("transaction", id));
        }
        if state.fail_on_transaction_delete {
            return Err(RemoteError::Unavailable(format!(
                "transaction {id} delete refused"
            )));
        }
        state.transactions.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserResource for InMemoryRemote {
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut state = self.state.write().await;
        state.user_list_calls += 1;
        Ok(state.users.values().cloned().collect())
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found("user", id))
    }

    async fn create_user(&self, user: UserCreate) -> Result<User> {
        user.validate()?;
        let mut state = self.state.write().await;
        let id = UserId::new(state.next_id());
        let created = User {
            id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User> {
        let mut state = self.state.write().await;
        let existing = state
            .users
            .get(&id)
            .ok_or_else(|| RemoteError::not_found("user", id))?;
        let updated = update.apply_to(existing);
        state.users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found("user", id))
    }
}

#[async_trait]
impl CategoryResource for InMemoryRemote {
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        Ok(page.apply(state.categories.values().cloned().collect()))
    }

    async fn create_category(&self, category: CategoryCreate) -> Result<Category> {
        category.validate()?;
        let mut state = self.state.write().await;
        let id = CategoryId::new(state.next_id());
        let created = Category {
            id,
            name: category.name,
            description: category.description,
        };
        state.categories.insert(id, created.clone());
        Ok(created)
    }

    async fn update_category(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        let mut state = self.state.write().await;
        let existing = state
            .categories
            .get(&id)
            .ok_or_else(|| RemoteError::not_found("category", id))?;
        let updated = update.apply_to(existing);
        state.categories.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found("category", id))
    }
}

#[async_trait]
impl WeightResource for InMemoryRemote {
    async fn list_weights(&self, page: Page) -> Result<Vec<Weight>> {
        let state = self.state.read().await;
        Ok(page.apply(state.weights.values().cloned().collect()))
    }

    async fn create_weight(&self, weight: WeightCreate) -> Result<Weight> {
        weight.validate()?;
        let mut state = self.state.write().await;
        let id = WeightId::new(state.next_id());
        let created = Weight {
            id,
            name: weight.name,
            description: weight.description,
        };
        state.weights.insert(id, created.clone());
        Ok(created)
    }

    async fn update_weight(&self, id: WeightId, update: WeightUpdate) -> Result<Weight> {
        let mut state = self.state.write().await;
        let existing = state
            .weights
            .get(&id)
            .ok_or_else(|| RemoteError::not_found("weight", id))?;
        let updated = update.apply_to(existing);
        state.weights.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_weight(&self, id: WeightId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .weights
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found("weight", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::TransactionType;

    fn date(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_transaction_computes_total() {
        let remote = InMemoryRemote::new();
        let tx = remote
            .create_transaction(
                TransactionCreate::new("Sale", UserId::new(1), date(1))
                    .amount_per_unit(Decimal::new(1550, 2))
                    .quantity(Decimal::from(4)),
            )
            .await
            .unwrap();

        assert_eq!(tx.total_amount, Decimal::new(6200, 2));
        assert_eq!(remote.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected() {
        let remote = InMemoryRemote::new();
        let result = remote
            .create_transaction(
                TransactionCreate::new("Huge", UserId::new(1), date(1))
                    .amount_per_unit(Decimal::MAX)
                    .quantity(Decimal::from(2)),
            )
            .await;
        assert!(matches!(result, Err(RemoteError::Invalid(_))));
        assert_eq!(remote.transaction_count().await, 0);

        let tx = remote
            .create_transaction(
                TransactionCreate::new("Sale", UserId::new(1), date(1))
                    .amount_per_unit(Decimal::MAX),
            )
            .await
            .unwrap();
        let result = remote
            .update_transaction(tx.id, TransactionUpdate::new().quantity(Decimal::from(3)))
            .await;
        assert!(matches!(result, Err(RemoteError::Invalid(_))));
        let stored = remote.get_transaction(tx.id).await.unwrap();
        assert_eq!(stored.quantity, Decimal::ONE);
    }

    #[tokio::test]
    async fn test_update_recomputes_total_and_enriches() {
        let remote = InMemoryRemote::new();
        let item = remote.seed_inventory("LPG 11kg", Decimal::from(10)).await;
        let tx = remote
            .create_transaction(
                TransactionCreate::new("Sale", UserId::new(1), date(1))
                    .amount_per_unit(Decimal::from(3)),
            )
            .await
            .unwrap();

        let updated = remote
            .update_transaction(
                tx.id,
                TransactionUpdate::new()
                    .quantity(Decimal::from(2))
                    .inventory(item.id),
            )
            .await
            .unwrap();
        assert_eq!(updated.total_amount, Decimal::from(6));
        assert_eq!(updated.inventory_name.as_deref(), Some("LPG 11kg"));
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let remote = InMemoryRemote::new();
        let err = remote.get_inventory(InventoryId::new(9)).await.unwrap_err();
        assert!(err.is_not_found());
        let err = remote
            .delete_transaction(TransactionId::new(9))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_inventory_failure_injection() {
        let remote = InMemoryRemote::new();
        let item = remote.seed_inventory("Coke", Decimal::from(5)).await;

        remote.fail_inventory_updates_for(item.id).await;
        let result = remote
            .update_inventory(item.id, item.with_quantity(Decimal::from(4)))
            .await;
        assert!(result.is_err());
        assert_eq!(remote.quantity_of(item.id).await, Some(Decimal::from(5)));
        assert_eq!(remote.inventory_write_count().await, 0);

        remote.clear_inventory_failures().await;
        remote
            .update_inventory(item.id, item.with_quantity(Decimal::from(4)))
            .await
            .unwrap();
        assert_eq!(remote.quantity_of(item.id).await, Some(Decimal::from(4)));
        assert_eq!(remote.inventory_write_count().await, 1);
    }

    #[tokio::test]
    async fn test_nth_inventory_update_fails_once() {
        let remote = InMemoryRemote::new();
        let item = remote.seed_inventory("Beer", Decimal::from(5)).await;
        remote.fail_nth_inventory_update(2).await;

        for (quantity, succeeds) in [(6, true), (7, false), (8, true)] {
            let result = remote
                .update_inventory(item.id, item.with_quantity(Decimal::from(quantity)))
                .await;
            assert_eq!(result.is_ok(), succeeds);
        }
        assert_eq!(remote.quantity_of(item.id).await, Some(Decimal::from(8)));
    }

    #[tokio::test]
    async fn test_negative_stock_is_rejected() {
        let remote = InMemoryRemote::new();
        let item = remote.seed_inventory("Pepsi", Decimal::from(1)).await;
        let err = remote
            .update_inventory(item.id, item.with_quantity(Decimal::from(-1)))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_search_sorts_newest_first_and_windows() {
        let remote = InMemoryRemote::new();
        for day in 1..=5 {
            remote
                .create_transaction(
                    TransactionCreate::new(format!("Sale {day}"), UserId::new(1), date(day))
                        .transaction_type(TransactionType::Earning),
                )
                .await
                .unwrap();
        }
        remote
            .create_transaction(TransactionCreate::new("Rent", UserId::new(1), date(3)))
            .await
            .unwrap();

        let search = TransactionSearch::new()
            .transaction_type(TransactionType::Earning)
            .page(Page::new(1, 2));
        let titles: Vec<String> = remote
            .search_transactions(&search)
            .await
            .unwrap()
            .into_iter()
            .map(|tx| tx.title)
            .collect();
        assert_eq!(titles, vec!["Sale 4", "Sale 3"]);
    }

    #[tokio::test]
    async fn test_inventory_listing_enriches_names() {
        let remote = InMemoryRemote::new();
        let category = remote
            .create_category(CategoryCreate {
                name: "LPG".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let weight = remote
            .create_weight(WeightCreate {
                name: "11kg".to_string(),
                description: None,
            })
            .await
            .unwrap();
        remote
            .create_inventory(InventoryCreate {
                name: "Cylinder".to_string(),
                quantity: Decimal::from(3),
                category_id: category.id,
                weight_id: weight.id,
            })
            .await
            .unwrap();

        let items = remote.list_inventory(Page::all()).await.unwrap();
        assert_eq!(items[0].category_name.as_deref(), Some("LPG"));
        assert_eq!(items[0].weight_name.as_deref(), Some("11kg"));
    }
}
