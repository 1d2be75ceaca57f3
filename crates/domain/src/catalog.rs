//! Users, categories and weights.

use common::{CategoryId, UserId, WeightId};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

fn active() -> bool {
    true
}

/// A user who owns transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default, alias = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

impl User {
    /// Name to show in pickers: full name, else email.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

impl UserCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank("email", &self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn apply_to(&self, user: &User) -> User {
        User {
            id: user.id,
            email: self.email.clone().unwrap_or_else(|| user.email.clone()),
            full_name: self.full_name.clone().or_else(|| user.full_name.clone()),
            is_active: self.is_active.unwrap_or(user.is_active),
        }
    }
}

/// An inventory category (e.g. "LPG", "Beer").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "category_id")]
    pub id: CategoryId,
    #[serde(alias = "category_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryUpdate {
    pub fn apply_to(&self, category: &Category) -> Category {
        Category {
            id: category.id,
            name: self.name.clone().unwrap_or_else(|| category.name.clone()),
            description: self
                .description
                .clone()
                .or_else(|| category.description.clone()),
        }
    }
}

/// A weight or size classification (e.g. "11kg", "355ml (12oz)").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    #[serde(alias = "weight_id")]
    pub id: WeightId,
    #[serde(alias = "weight_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WeightCreate {
    pub fn validate(&self) -> Result<()> {
        not_blank("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WeightUpdate {
    pub fn apply_to(&self, weight: &Weight) -> Weight {
        Weight {
            id: weight.id,
            name: self.name.clone().unwrap_or_else(|| weight.name.clone()),
            description: self
                .description
                .clone()
                .or_else(|| weight.description.clone()),
        }
    }
}

fn not_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}
