use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::price::{NewPriceItem, PriceCategory, PriceItem, PriceItemPatch};

use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::storage::{Collection, DataKind, KvStore, UserScope};

/// The studio's price list: categories owning items.
#[derive(Clone)]
pub struct PriceService {
    categories: Collection<PriceCategory>,
    items: Collection<PriceItem>,
    clock: Arc<dyn Clock>,
}

impl PriceService {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            categories: Collection::new(store.clone(), DataKind::PriceCategories),
            items: Collection::new(store, DataKind::PriceItems),
            clock,
        }
    }

    /// Append a category at the end of the list.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn create_category(&self, scope: &UserScope, name: &str) -> Result<PriceCategory, ServiceError> {
        let now = self.clock.now_utc();
        let category = self
            .categories
            .update(scope, |items| {
                let position = items.iter().map(|c| c.position + 1).max().unwrap_or(0);
                let category = PriceCategory::create(name, position, now)?;
                items.push(category.clone());
                Ok(category)
            })
            .await?;
        info!(category_id = %category.id, "price_category_created");
        Ok(category)
    }

    pub async fn rename_category(&self, scope: &UserScope, id: Uuid, name: &str) -> Result<PriceCategory, ServiceError> {
        let name = models::validate_name("category name", name)?;
        self.categories
            .update(scope, |items| {
                let c = items.iter_mut().find(|c| c.id == id).ok_or_else(|| ServiceError::not_found("category"))?;
                c.name = name;
                Ok(c.clone())
            })
            .await
    }

    /// Categories by position, then name.
    pub async fn list_categories(&self, scope: &UserScope) -> Result<Vec<PriceCategory>, ServiceError> {
        let mut cats = self.categories.load(scope).await?;
        cats.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase())));
        Ok(cats)
    }

    /// Delete an empty category. A category that still owns items is rejected.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn delete_category(&self, scope: &UserScope, id: Uuid) -> Result<(), ServiceError> {
        let owned = self.items.load(scope).await?.iter().filter(|i| i.category_id == id).count();
        if owned > 0 {
            return Err(ServiceError::Conflict(format!("category still has {owned} item(s)")));
        }
        self.categories
            .update(scope, |items| {
                let before = items.len();
                items.retain(|c| c.id != id);
                if items.len() == before {
                    return Err(ServiceError::not_found("category"));
                }
                Ok(())
            })
            .await?;
        info!(category_id = %id, "price_category_deleted");
        Ok(())
    }

    #[instrument(skip(self, scope, input), fields(user_id = %scope.user_id()))]
    pub async fn create_item(&self, scope: &UserScope, category_id: Uuid, input: NewPriceItem) -> Result<PriceItem, ServiceError> {
        if !self.categories.load(scope).await?.iter().any(|c| c.id == category_id) {
            return Err(ServiceError::not_found("category"));
        }
        let item = PriceItem::create(category_id, input, self.clock.now_utc())?;
        let stored = item.clone();
        self.items.update(scope, move |items| { items.push(stored); Ok(()) }).await?;
        info!(item_id = %item.id, price_cents = item.base_price_cents, "price_item_created");
        Ok(item)
    }

    pub async fn get_item(&self, scope: &UserScope, id: Uuid) -> Result<Option<PriceItem>, ServiceError> {
        Ok(self.items.load(scope).await?.into_iter().find(|i| i.id == id))
    }

    pub async fn all_items(&self, scope: &UserScope) -> Result<Vec<PriceItem>, ServiceError> {
        self.items.load(scope).await
    }

    pub async fn list_items(&self, scope: &UserScope, category_id: Uuid) -> Result<Vec<PriceItem>, ServiceError> {
        let mut items: Vec<PriceItem> = self.items.load(scope).await?.into_iter().filter(|i| i.category_id == category_id).collect();
        items.sort_by(|a, b| a.base_price_cents.cmp(&b.base_price_cents).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    pub async fn update_item(&self, scope: &UserScope, id: Uuid, patch: PriceItemPatch) -> Result<PriceItem, ServiceError> {
        self.items
            .update(scope, |items| {
                let item = items.iter_mut().find(|i| i.id == id).ok_or_else(|| ServiceError::not_found("price item"))?;
                item.apply(patch)?;
                Ok(item.clone())
            })
            .await
    }

    pub async fn delete_item(&self, scope: &UserScope, id: Uuid) -> Result<bool, ServiceError> {
        let mut items = self.items.load(scope).await?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.items.save(scope, &items).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestEnv;

    fn item(name: &str, cents: i64) -> NewPriceItem {
        NewPriceItem { name: name.into(), base_price_cents: cents, ..Default::default() }
    }

    #[tokio::test]
    async fn delete_category_only_when_empty() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.prices;
        let scope = env.scope();

        let empty = svc.create_category(&scope, "Piercing").await?;
        svc.delete_category(&scope, empty.id).await?;
        assert!(svc.list_categories(&scope).await?.is_empty());

        let full = svc.create_category(&scope, "Tattoo").await?;
        let it = svc.create_item(&scope, full.id, item("Small", 8000)).await?;
        let rejected = svc.delete_category(&scope, full.id).await;
        assert!(matches!(rejected, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.list_categories(&scope).await?.len(), 1);

        assert!(svc.delete_item(&scope, it.id).await?);
        svc.delete_category(&scope, full.id).await?;
        assert!(matches!(svc.delete_category(&scope, full.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn categories_keep_creation_order() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.prices;
        let scope = env.scope();
        for name in ["Tattoo", "Aftercare", "Piercing"] {
            svc.create_category(&scope, name).await?;
        }
        let names: Vec<String> = svc.list_categories(&scope).await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Tattoo", "Aftercare", "Piercing"]);
        Ok(())
    }

    #[tokio::test]
    async fn items_require_category_and_valid_price() -> anyhow::Result<()> {
        let env = TestEnv::new();
        let svc = &env.app.prices;
        let scope = env.scope();
        assert!(matches!(svc.create_item(&scope, Uuid::new_v4(), item("x", 1)).await, Err(ServiceError::NotFound(_))));

        let cat = svc.create_category(&scope, "Tattoo").await?;
        assert!(matches!(svc.create_item(&scope, cat.id, item("x", -1)).await, Err(ServiceError::Model(_))));
        let large = svc.create_item(&scope, cat.id, item("Large", 30000)).await?;
        svc.create_item(&scope, cat.id, item("Small", 8000)).await?;
        let listed: Vec<String> = svc.list_items(&scope, cat.id).await?.into_iter().map(|i| i.name).collect();
        assert_eq!(listed, vec!["Small", "Large"]);

        let patched = svc.update_item(&scope, large.id, PriceItemPatch { base_price_cents: Some(32000), ..Default::default() }).await?;
        assert_eq!(patched.base_price_cents, 32000);
        assert_eq!(svc.get_item(&scope, large.id).await?.unwrap().base_price_cents, 32000);
        Ok(())
    }
}
