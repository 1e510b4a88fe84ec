use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceCategory {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub base_price_cents: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewPriceItem {
    pub name: String,
    pub base_price_cents: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PriceItemPatch {
    pub name: Option<String>,
    pub base_price_cents: Option<i64>,
    pub description: Option<String>,
    pub estimated_minutes: Option<Option<u32>>,
}

pub fn validate_base_price(cents: i64) -> Result<i64, ModelError> {
    if cents < 0 {
        return Err(ModelError::validation("base price must not be negative"));
    }
    Ok(cents)
}

impl PriceCategory {
    pub fn create(name: &str, position: u32, now: DateTime<Utc>) -> Result<Self, ModelError> {
        Ok(Self { id: Uuid::new_v4(), name: crate::validate_name("category name", name)?, position, created_at: now })
    }
}

impl PriceItem {
    pub fn create(category_id: Uuid, input: NewPriceItem, now: DateTime<Utc>) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            category_id,
            name: crate::validate_name("item name", &input.name)?,
            base_price_cents: validate_base_price(input.base_price_cents)?,
            description: input.description.trim().to_string(),
            estimated_minutes: input.estimated_minutes,
            created_at: now,
        })
    }

    pub fn apply(&mut self, patch: PriceItemPatch) -> Result<(), ModelError> {
        let name = patch.name.as_deref().map(|n| crate::validate_name("item name", n)).transpose()?;
        let price = patch.base_price_cents.map(validate_base_price).transpose()?;
        if let Some(n) = name { self.name = n; }
        if let Some(p) = price { self.base_price_cents = p; }
        if let Some(d) = patch.description { self.description = d.trim().to_string(); }
        if let Some(m) = patch.estimated_minutes { self.estimated_minutes = m; }
        Ok(())
    }
}
