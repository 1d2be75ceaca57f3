use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{CategoryId, InventoryId, TransactionId, UserId, WeightId};
use domain::{
    Category, CategoryCreate, CategoryUpdate, InventoryCreate, InventoryItem, InventoryUpdate,
    Page, Transaction, TransactionCreate, TransactionSearch, TransactionUpdate, User, UserCreate,
    UserUpdate, Weight, WeightCreate, WeightUpdate,
};
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    RemoteError, Result,
    store::{CategoryResource, InventoryResource, TransactionResource, UserResource, WeightResource},
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Connection settings for [`HttpRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRemoteConfig {
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts for GET requests that fail transiently.
    pub max_retries: u32,
}

impl Default for HttpRemoteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpRemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Delay before retry number `attempt` (1-based): `min(2 s, 100 ms × 2^attempt)`.
pub fn backoff_delay(attempt: u32) -> Duration {
    let millis = 2u64
        .checked_pow(attempt)
        .and_then(|factor| factor.checked_mul(100))
        .unwrap_or(u64::MAX);
    Duration::from_millis(millis.min(2000))
}

/// Remote store reached over JSON/HTTP.
///
/// Only GET requests are retried; writes are sent once so a timed-out write
/// is never replayed.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    config: HttpRemoteConfig,
}

impl HttpRemote {
    pub fn new(config: HttpRemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpRemoteConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Sends a request and returns the response body of a 2xx answer.
    async fn send(&self, request: RequestBuilder, resource: &'static str, id: &str) -> Result<String> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        metrics::histogram!("remote_request_duration_seconds", "resource" => resource)
            .record(start.elapsed().as_secs_f64());
        metrics::counter!("remote_requests_total", "resource" => resource, "status" => status.as_u16().to_string())
            .increment(1);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::not_found(resource, id));
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.config.timeout)
        } else {
            RemoteError::Http(err)
        }
    }

    #[instrument(skip(self, query), fields(base_url = %self.config.base_url))]
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        resource: &'static str,
        id: &str,
    ) -> Result<T> {
        let mut attempt = 0;
        loop {
            let request = self.request(Method::GET, path).query(query);
            match self.send(request, resource, id).await {
                Ok(body) => return Ok(serde_json::from_str(&body)?),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = backoff_delay(attempt);
                    warn!(attempt, ?delay, error = %err, "Retrying GET");
                    metrics::counter!("remote_retries_total", "resource" => resource).increment(1);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    #[instrument(skip(self, body), fields(base_url = %self.config.base_url))]
    async fn write<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        resource: &'static str,
        id: &str,
    ) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path).json(body);
        let text = self.send(request, resource, id).await?;
        debug!("Write accepted");
        Ok(serde_json::from_str(&text)?)
    }

    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    async fn delete(&self, path: &str, resource: &'static str, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path), resource, id)
            .await
            .map(|_| ())
    }
}

/// Pulls a readable message out of an error body (`detail`, `error` or
/// `message` keys), falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|key| json.get(key))
                .map(|value| match value.as_str() {
                    Some(text) => text.to_string(),
                    None => value.to_string(),
                })
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl InventoryResource for HttpRemote {
    async fn list_inventory(&self, page: Page) -> Result<Vec<InventoryItem>> {
        self.get("/inventory", &page.to_query_pairs(), "inventory", "")
            .await
    }

    async fn get_inventory(&self, id: InventoryId) -> Result<InventoryItem> {
        let id = id.to_string();
        self.get(&format!("/inventory/{id}"), &[], "inventory", &id)
            .await
    }

    async fn create_inventory(&self, item: InventoryCreate) -> Result<InventoryItem> {
        item.validate()?;
        self.write(Method::POST, "/inventory", &item, "inventory", "")
            .await
    }

    async fn update_inventory(
        &self,
        id: InventoryId,
        record: InventoryUpdate,
    ) -> Result<InventoryItem> {
        record.validate()?;
        let id = id.to_string();
        self.write(Method::PUT, &format!("/inventory/{id}"), &record, "inventory", &id)
            .await
    }

    async fn delete_inventory(&self, id: InventoryId) -> Result<()> {
        let id = id.to_string();
        self.delete(&format!("/inventory/{id}"), "inventory", &id)
            .await
    }
}

#[async_trait]
impl TransactionResource for HttpRemote {
    async fn list_transactions(&self, page: Page) -> Result<Vec<Transaction>> {
        self.get("/transactions", &page.to_query_pairs(), "transaction", "")
            .await
    }

    async fn search_transactions(&self, search: &TransactionSearch) -> Result<Vec<Transaction>> {
        self.get(
            "/transactions/search",
            &search.to_query_pairs(),
            "transaction",
            "",
        )
        .await
    }

    async fn get_transaction(&self, id: TransactionId) -> Result<Transaction> {
        let id = id.to_string();
        self.get(&format!("/transactions/{id}"), &[], "transaction", &id)
            .await
    }

    async fn create_transaction(&self, tx: TransactionCreate) -> Result<Transaction> {
        tx.validate()?;
        self.write(Method::POST, "/transactions", &tx, "transaction", "")
            .await
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        update.validate()?;
        let id = id.to_string();
        self.write(
            Method::PUT,
            &format!("/transactions/{id}"),
            &update,
            "transaction",
            &id,
        )
        .await
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let id = id.to_string();
        self.delete(&format!("/transactions/{id}"), "transaction", &id)
            .await
    }
}

#[async_trait]
impl UserResource for HttpRemote {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/users", &[], "user", "").await
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        let id = id.to_string();
        self.get(&format!("/users/{id}"), &[], "user", &id).await
    }

    async fn create_user(&self, user: UserCreate) -> Result<User> {
        user.validate()?;
        self.write(Method::POST, "/users", &user, "user", "").await
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User> {
        let id = id.to_string();
        self.write(Method::PUT, &format!("/users/{id}"), &update, "user", &id)
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let id = id.to_string();
        self.delete(&format!("/users/{id}"), "user", &id).await
    }
}

#[async_trait]
impl CategoryResource for HttpRemote {
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>> {
        self.get("/categories", &page.to_query_pairs(), "category", "")
            .await
    }

    async fn create_category(&self, category: CategoryCreate) -> Result<Category> {
        category.validate()?;
        self.write(Method::POST, "/categories", &category, "category", "")
            .await
    }

    async fn update_category(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        let id = id.to_string();
        self.write(
            Method::PUT,
            &format!("/categories/{id}"),
            &update,
            "category",
            &id,
        )
        .await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        let id = id.to_string();
        self.delete(&format!("/categories/{id}"), "category", &id)
            .await
    }
}

#[async_trait]
impl WeightResource for HttpRemote {
    async fn list_weights(&self, page: Page) -> Result<Vec<Weight>> {
        self.get("/weights", &page.to_query_pairs(), "weight", "")
            .await
    }

    async fn create_weight(&self, weight: WeightCreate) -> Result<Weight> {
        weight.validate()?;
        self.write(Method::POST, "/weights", &weight, "weight", "")
            .await
    }

    async fn update_weight(&self, id: WeightId, update: WeightUpdate) -> Result<Weight> {
        let id = id.to_string();
        self.write(Method::PUT, &format!("/weights/{id}"), &update, "weight", &id)
            .await
    }

    async fn delete_weight(&self, id: WeightId) -> Result<()> {
        let id = id.to_string();
        self.delete(&format!("/weights/{id}"), "weight", &id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(2), Duration::from_millis(400));
        assert_eq!(backoff_delay(4), Duration::from_millis(1600));
        assert_eq!(backoff_delay(5), Duration::from_millis(2000));
        assert_eq!(backoff_delay(80), Duration::from_millis(2000));
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let remote = HttpRemote::new(HttpRemoteConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(remote.url("/inventory/3"), "http://localhost:8000/inventory/3");
        assert_eq!(remote.url("users"), "http://localhost:8000/users");
    }

    #[test]
    fn test_default_config() {
        let config = HttpRemoteConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"detail": "Item not in stock"}"#), "Item not in stock");
        assert_eq!(error_message(r#"{"error": "boom"}"#), "boom");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
