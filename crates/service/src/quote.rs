//! Additive quote calculator: selected price-list items plus a signed
//! manual adjustment. No tax, currency conversion or rounding rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use models::price::PriceItem;

use crate::errors::ServiceError;
use crate::services::PriceService;
use crate::storage::UserScope;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuoteRequest {
    pub item_ids: Vec<Uuid>,
    #[serde(default)]
    pub adjustment_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteLine {
    pub item_id: Uuid,
    pub name: String,
    pub price_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub subtotal_cents: i64,
    pub adjustment_cents: i64,
    pub total_cents: i64,
    /// Sum of the items' estimates; items without one contribute nothing.
    pub estimated_minutes: u32,
}

/// Price a selection against an already loaded item list. Each id adds one
/// line, so selecting an item twice charges it twice.
pub fn calculate(items: &[PriceItem], request: &QuoteRequest) -> Result<Quote, ServiceError> {
    let by_id: HashMap<Uuid, &PriceItem> = items.iter().map(|i| (i.id, i)).collect();
    let mut lines = Vec::with_capacity(request.item_ids.len());
    let mut subtotal: i64 = 0;
    let mut minutes: u32 = 0;
    for id in &request.item_ids {
        let item = by_id.get(id).ok_or_else(|| ServiceError::NotFound(format!("price item {id} not found")))?;
        subtotal = subtotal
            .checked_add(item.base_price_cents)
            .ok_or_else(|| ServiceError::Validation("quote subtotal overflow".into()))?;
        minutes = minutes.saturating_add(item.estimated_minutes.unwrap_or(0));
        lines.push(QuoteLine { item_id: item.id, name: item.name.clone(), price_cents: item.base_price_cents });
    }
    let total = subtotal
        .checked_add(request.adjustment_cents)
        .ok_or_else(|| ServiceError::Validation("quote total overflow".into()))?;
    if total < 0 {
        return Err(ServiceError::Validation("adjustment makes the total negative".into()));
    }
    Ok(Quote { lines, subtotal_cents: subtotal, adjustment_cents: request.adjustment_cents, total_cents: total, estimated_minutes: minutes })
}

/// Quote against the user's stored price list.
#[instrument(skip(prices, scope, request), fields(user_id = %scope.user_id(), items = request.item_ids.len()))]
pub async fn quote(prices: &PriceService, scope: &UserScope, request: &QuoteRequest) -> Result<Quote, ServiceError> {
    let items = prices.all_items(scope).await?;
    let q = calculate(&items, request)?;
    debug!(total_cents = q.total_cents, "quote_calculated");
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::price::NewPriceItem;

    fn item(name: &str, cents: i64, minutes: Option<u32>) -> PriceItem {
        PriceItem::create(
            Uuid::new_v4(),
            NewPriceItem { name: name.into(), base_price_cents: cents, description: String::new(), estimated_minutes: minutes },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn sums_items_and_adjustment() {
        let items = vec![item("Small", 8000, Some(60)), item("Color", 3000, None)];
        let q = calculate(&items, &QuoteRequest { item_ids: vec![items[0].id, items[1].id], adjustment_cents: -1000 }).unwrap();
        assert_eq!(q.subtotal_cents, 11000);
        assert_eq!(q.total_cents, 10000);
        assert_eq!(q.lines.len(), 2);
        assert_eq!(q.estimated_minutes, 60);
    }

    #[test]
    fn duplicates_count_twice_and_empty_is_adjustment_only() {
        let items = vec![item("Session", 5000, Some(30))];
        let q = calculate(&items, &QuoteRequest { item_ids: vec![items[0].id, items[0].id], adjustment_cents: 0 }).unwrap();
        assert_eq!(q.total_cents, 10000);
        assert_eq!(q.estimated_minutes, 60);

        let only_adj = calculate(&items, &QuoteRequest { item_ids: vec![], adjustment_cents: 2500 }).unwrap();
        assert_eq!(only_adj.total_cents, 2500);
        assert!(only_adj.lines.is_empty());
    }

    #[test]
    fn unknown_item_and_negative_total_rejected() {
        let items = vec![item("Small", 8000, None)];
        let unknown = calculate(&items, &QuoteRequest { item_ids: vec![Uuid::new_v4()], adjustment_cents: 0 });
        assert!(matches!(unknown, Err(ServiceError::NotFound(_))));
        let negative = calculate(&items, &QuoteRequest { item_ids: vec![items[0].id], adjustment_cents: -8001 });
        assert!(matches!(negative, Err(ServiceError::Validation(_))));
        let zero = calculate(&items, &QuoteRequest { item_ids: vec![items[0].id], adjustment_cents: -8000 }).unwrap();
        assert_eq!(zero.total_cents, 0);
    }

    #[tokio::test]
    async fn quotes_against_stored_price_list() -> anyhow::Result<()> {
        let env = crate::test_support::TestEnv::new();
        let scope = env.scope();
        let cat = env.app.prices.create_category(&scope, "Tattoo").await?;
        let a = env.app.prices.create_item(&scope, cat.id, NewPriceItem { name: "Small".into(), base_price_cents: 8000, ..Default::default() }).await?;
        let q = quote(&env.app.prices, &scope, &QuoteRequest { item_ids: vec![a.id], adjustment_cents: 500 }).await?;
        assert_eq!(q.total_cents, 8500);

        // another user's price list is not visible
        let other = env.scope();
        assert!(quote(&env.app.prices, &other, &QuoteRequest { item_ids: vec![a.id], adjustment_cents: 0 }).await.is_err());
        Ok(())
    }
}
