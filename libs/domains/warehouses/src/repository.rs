use async_trait::async_trait;
use database::RequestContext;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::WarehouseResult;
use crate::models::{Warehouse, WarehouseInput, WarehouseReport};

/// Repository trait for Warehouse persistence
///
/// Not-found conditions are reported as `None` / `false`; the service decides
/// what they mean.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    /// All warehouses ordered by id
    async fn list(&self, ctx: &RequestContext) -> WarehouseResult<Vec<Warehouse>>;

    /// Get a warehouse by ID
    async fn get_by_id(&self, ctx: &RequestContext, id: i32) -> WarehouseResult<Option<Warehouse>>;

    /// Insert a warehouse and return it with its generated id
    async fn create(&self, ctx: &RequestContext, input: WarehouseInput) -> WarehouseResult<Warehouse>;

    /// Overwrite every field of `warehouse.id`; `false` when no row matched
    async fn update(&self, ctx: &RequestContext, warehouse: Warehouse) -> WarehouseResult<bool>;

    /// Delete a warehouse by ID; `false` when no row matched
    async fn delete(&self, ctx: &RequestContext, id: i32) -> WarehouseResult<bool>;

    /// Product count of one warehouse; `None` when the warehouse does not exist
    async fn report_products(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> WarehouseResult<Option<WarehouseReport>>;
}

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    warehouses: BTreeMap<i32, Warehouse>,
    /// product id -> warehouse id
    product_links: HashMap<i32, i32>,
}

/// In-memory implementation of WarehouseRepository (for development/testing)
///
/// Also stands in for the `products.id_warehouse` foreign key: the in-memory
/// product repository records its links here, so the product count report
/// works and deleting a warehouse clears the links like `ON DELETE SET NULL`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWarehouseRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryWarehouseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `product_id` at `warehouse_id`, or clear its link with `None`.
    ///
    /// Returns `false` (and changes nothing) when the warehouse does not exist.
    pub async fn link_product(&self, product_id: i32, warehouse_id: Option<i32>) -> bool {
        let mut store = self.store.write().await;
        match warehouse_id {
            Some(warehouse_id) if !store.warehouses.contains_key(&warehouse_id) => false,
            Some(warehouse_id) => {
                store.product_links.insert(product_id, warehouse_id);
                true
            }
            None => {
                store.product_links.remove(&product_id);
                true
            }
        }
    }

    /// Warehouse currently owning `product_id`
    pub async fn warehouse_of(&self, product_id: i32) -> Option<i32> {
        self.store.read().await.product_links.get(&product_id).copied()
    }
}

#[async_trait]
impl WarehouseRepository for InMemoryWarehouseRepository {
    async fn list(&self, _ctx: &RequestContext) -> WarehouseResult<Vec<Warehouse>> {
        let store = self.store.read().await;
        Ok(store.warehouses.values().cloned().collect())
    }

    async fn get_by_id(&self, _ctx: &RequestContext, id: i32) -> WarehouseResult<Option<Warehouse>> {
        let store = self.store.read().await;
        Ok(store.warehouses.get(&id).cloned())
    }

    async fn create(&self, _ctx: &RequestContext, input: WarehouseInput) -> WarehouseResult<Warehouse> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let warehouse = Warehouse::from_input(store.last_id, input);
        store.warehouses.insert(warehouse.id, warehouse.clone());

        tracing::info!(warehouse_id = warehouse.id, "Created warehouse");
        Ok(warehouse)
    }

    async fn update(&self, _ctx: &RequestContext, warehouse: Warehouse) -> WarehouseResult<bool> {
        let mut store = self.store.write().await;
        match store.warehouses.get_mut(&warehouse.id) {
            Some(existing) => {
                tracing::info!(warehouse_id = warehouse.id, "Updated warehouse");
                *existing = warehouse;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, _ctx: &RequestContext, id: i32) -> WarehouseResult<bool> {
        let mut store = self.store.write().await;
        if store.warehouses.remove(&id).is_none() {
            return Ok(false);
        }
        store.product_links.retain(|_, warehouse_id| *warehouse_id != id);

        tracing::info!(warehouse_id = id, "Deleted warehouse");
        Ok(true)
    }

    async fn report_products(
        &self,
        _ctx: &RequestContext,
        id: i32,
    ) -> WarehouseResult<Option<WarehouseReport>> {
        let store = self.store.read().await;
        Ok(store.warehouses.get(&id).map(|warehouse| WarehouseReport {
            warehouse_name: warehouse.name.clone(),
            product_count: store
                .product_links
                .values()
                .filter(|warehouse_id| **warehouse_id == id)
                .count() as i64,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> WarehouseInput {
        WarehouseInput {
            name: name.to_string(),
            address: "A1".to_string(),
            telephone: "T1".to_string(),
            capacity: 10,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryWarehouseRepository::new();
        let ctx = RequestContext::background();

        let first = repo.create(&ctx, input("W1")).await.unwrap();
        let second = repo.create(&ctx, input("W2")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        let all = repo.list(&ctx).await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_rows() {
        let repo = InMemoryWarehouseRepository::new();
        let ctx = RequestContext::background();

        let ghost = Warehouse::from_input(99, input("ghost"));
        assert!(!repo.update(&ctx, ghost).await.unwrap());
        assert!(!repo.delete(&ctx, 99).await.unwrap());
    }

    #[tokio::test]
    async fn test_links_drive_report_and_are_cleared_on_delete() {
        let repo = InMemoryWarehouseRepository::new();
        let ctx = RequestContext::background();
        let warehouse = repo.create(&ctx, input("W1")).await.unwrap();

        assert!(!repo.link_product(1, Some(42)).await);
        assert!(repo.link_product(1, Some(warehouse.id)).await);
        assert!(repo.link_product(2, Some(warehouse.id)).await);

        let report = repo.report_products(&ctx, warehouse.id).await.unwrap().unwrap();
        assert_eq!(report.warehouse_name, "W1");
        assert_eq!(report.product_count, 2);

        assert!(repo.delete(&ctx, warehouse.id).await.unwrap());
        assert_eq!(repo.warehouse_of(1).await, None);
        assert!(repo.report_products(&ctx, warehouse.id).await.unwrap().is_none());
    }
}
