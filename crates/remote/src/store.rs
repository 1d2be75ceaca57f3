use async_trait::async_trait;
use common::{CategoryId, InventoryId, TransactionId, UserId, WeightId};
use domain::{
    Category, CategoryCreate, CategoryUpdate, InventoryCreate, InventoryItem, InventoryUpdate,
    Page, Transaction, TransactionCreate, TransactionSearch, TransactionUpdate, User, UserCreate,
    UserUpdate, Weight, WeightCreate, WeightUpdate,
};

use crate::Result;

/// The `inventory` collection.
///
/// `update_inventory` has full-replace semantics: every field of the record
/// is written, so callers must resend unchanged fields.
#[async_trait]
pub trait InventoryResource: Send + Sync {
    async fn list_inventory(&self, page: Page) -> Result<Vec<InventoryItem>>;

    /// Fails with `RemoteError::NotFound` if the item does not exist.
    async fn get_inventory(&self, id: InventoryId) -> Result<InventoryItem>;

    async fn create_inventory(&self, item: InventoryCreate) -> Result<InventoryItem>;

    async fn update_inventory(
        &self,
        id: InventoryId,
        record: InventoryUpdate,
    ) -> Result<InventoryItem>;

    async fn delete_inventory(&self, id: InventoryId) -> Result<()>;
}

/// The `transactions` collection.
///
/// Writes here never touch inventory; keeping stock consistent is the
/// caller's job.
#[async_trait]
pub trait TransactionResource: Send + Sync {
    async fn list_transactions(&self, page: Page) -> Result<Vec<Transaction>>;

    async fn search_transactions(&self, search: &TransactionSearch) -> Result<Vec<Transaction>>;

    async fn get_transaction(&self, id: TransactionId) -> Result<Transaction>;

    async fn create_transaction(&self, tx: TransactionCreate) -> Result<Transaction>;

    async fn update_transaction(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, id: TransactionId) -> Result<()>;
}

/// The `users` collection.
#[async_trait]
pub trait UserResource: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn get_user(&self, id: UserId) -> Result<User>;
    async fn create_user(&self, user: UserCreate) -> Result<User>;
    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User>;
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

/// The `categories` collection.
#[async_trait]
pub trait CategoryResource: Send + Sync {
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>>;
    async fn create_category(&self, category: CategoryCreate) -> Result<Category>;
    async fn update_category(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category>;
    async fn delete_category(&self, id: CategoryId) -> Result<()>;
}

/// The `weights` collection.
#[async_trait]
pub trait WeightResource: Send + Sync {
    async fn list_weights(&self, page: Page) -> Result<Vec<Weight>>;
    async fn create_weight(&self, weight: WeightCreate) -> Result<Weight>;
    async fn update_weight(&self, id: WeightId, update: WeightUpdate) -> Result<Weight>;
    async fn delete_weight(&self, id: WeightId) -> Result<()>;
}

/// Every collection the remote store exposes.
pub trait RemoteStore:
    InventoryResource + TransactionResource + UserResource + CategoryResource + WeightResource
{
}

// Blanket implementation for anything that serves all collections
impl<T> RemoteStore for T where
    T: InventoryResource
        + TransactionResource
        + UserResource
        + CategoryResource
        + WeightResource
        + ?Sized
{
}
