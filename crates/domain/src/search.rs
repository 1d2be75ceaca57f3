use chrono::NaiveDate;
use common::{InventoryId, TransactionType, UserId};
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Window over a listed collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Page {
    /// Everything, no window.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
        }
    }

    /// Renders the window as query-string pairs.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    /// Applies the window to an already-ordered list.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skipped = items.into_iter().skip(self.skip.unwrap_or(0));
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

/// Builder for transaction search filters.
///
/// Allows filtering transactions by owner, free text, type, date range and
/// linked inventory item. Date bounds are inclusive calendar days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSearch {
    /// Filter by owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,

    /// Case-insensitive match against title and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    /// Filter by transaction type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,

    /// Earliest transaction date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    /// Latest transaction date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,

    /// Filter by linked inventory item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<InventoryId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl TransactionSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn text(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn inventory(mut self, inventory_id: InventoryId) -> Self {
        self.inventory_id = Some(inventory_id);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.skip = page.skip;
        self.limit = page.limit;
        self
    }

    /// Returns the page window requested by this search.
    pub fn window(&self) -> Page {
        Page {
            skip: self.skip,
            limit: self.limit,
        }
    }

    /// Renders the filters as query-string pairs, omitting unset ones.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(owner) = self.owner_id {
            pairs.push(("owner_id", owner.to_string()));
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(ty) = self.transaction_type {
            pairs.push(("transaction_type", ty.to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(inventory) = self.inventory_id {
            pairs.push(("inventory_id", inventory.to_string()));
        }
        pairs.extend(self.window().to_query_pairs());
        pairs
    }

    /// Returns true if `tx` passes every filter (the page window excluded).
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(owner) = self.owner_id
            && tx.owner_id != owner
        {
            return false;
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let in_title = tx.title.to_lowercase().contains(&needle);
            let in_description = tx
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(ty) = self.transaction_type
            && tx.transaction_type != ty
        {
            return false;
        }
        let day = tx.date.date_naive();
        if let Some(from) = self.date_from
            && day < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && day > to
        {
            return false;
        }
        if let Some(inventory) = self.inventory_id
            && tx.inventory_id != Some(inventory)
        {
            return false;
        }
        true
    }
}
