use async_trait::async_trait;
use database::RequestContext;
use domain_warehouses::{InMemoryWarehouseRepository, WarehouseRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductWithWarehouse};

/// Repository trait for Product persistence
///
/// Not-found conditions are reported as `None` / `false`; the service decides
/// what they mean. Writes report a code collision that slipped past the
/// service's existence check as `UniqueViolation` (create) or
/// `RegisteredConflict` (update), and an unknown warehouse as `InvalidStruct`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id
    async fn list(&self, ctx: &RequestContext) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn get_by_id(&self, ctx: &RequestContext, id: i32) -> ProductResult<Option<Product>>;

    /// Product joined with its warehouse; `None` when either is missing
    async fn get_with_warehouse(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> ProductResult<Option<ProductWithWarehouse>>;

    /// Whether a product other than `excluding` uses `code`
    async fn exists_by_code(
        &self,
        ctx: &RequestContext,
        code: &str,
        excluding: Option<i32>,
    ) -> ProductResult<bool>;

    /// Insert a product and return it with its generated id
    async fn create(&self, ctx: &RequestContext, input: CreateProduct) -> ProductResult<Product>;

    /// Overwrite every field of `product.id`; `false` when no row matched
    async fn update(&self, ctx: &RequestContext, product: Product) -> ProductResult<bool>;

    /// Delete a product by ID; `false` when no row matched
    async fn delete(&self, ctx: &RequestContext, id: i32) -> ProductResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    products: BTreeMap<i32, Product>,
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Warehouse references live in the shared [`InMemoryWarehouseRepository`],
/// which plays the part of the foreign key: unknown warehouses are rejected,
/// product counts stay in step, and deleting a warehouse clears the
/// reference of its products.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
    warehouses: InMemoryWarehouseRepository,
}

impl InMemoryProductRepository {
    pub fn new(warehouses: InMemoryWarehouseRepository) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            warehouses,
        }
    }

    async fn with_current_warehouse(&self, mut product: Product) -> Product {
        product.id_warehouse = self.warehouses.warehouse_of(product.id).await;
        product
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, _ctx: &RequestContext) -> ProductResult<Vec<Product>> {
        let stored: Vec<Product> = self.store.read().await.products.values().cloned().collect();

        let mut products = Vec::with_capacity(stored.len());
        for product in stored {
            products.push(self.with_current_warehouse(product).await);
        }
        Ok(products)
    }

    async fn get_by_id(&self, _ctx: &RequestContext, id: i32) -> ProductResult<Option<Product>> {
        let stored = self.store.read().await.products.get(&id).cloned();
        match stored {
            Some(product) => Ok(Some(self.with_current_warehouse(product).await)),
            None => Ok(None),
        }
    }

    async fn get_with_warehouse(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> ProductResult<Option<ProductWithWarehouse>> {
        let Some(product) = self.get_by_id(ctx, id).await? else {
            return Ok(None);
        };
        let Some(warehouse_id) = product.id_warehouse else {
            return Ok(None);
        };

        let warehouse = self
            .warehouses
            .get_by_id(ctx, warehouse_id)
            .await
            .map_err(|e| ProductError::Internal(e.to_string()))?;

        Ok(warehouse.map(|warehouse| ProductWithWarehouse { product, warehouse }))
    }

    async fn exists_by_code(
        &self,
        _ctx: &RequestContext,
        code: &str,
        excluding: Option<i32>,
    ) -> ProductResult<bool> {
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .any(|p| p.code_value == code && Some(p.id) != excluding))
    }

    async fn create(&self, _ctx: &RequestContext, input: CreateProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        if store.products.values().any(|p| p.code_value == input.code_value) {
            return Err(ProductError::UniqueViolation(input.code_value));
        }

        let id = store.last_id + 1;
        if !self.warehouses.link_product(id, input.id_warehouse).await {
            return Err(ProductError::unknown_warehouse());
        }

        store.last_id = id;
        let product = Product::new(id, input);
        store.products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn update(&self, _ctx: &RequestContext, product: Product) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        if !store.products.contains_key(&product.id) {
            return Ok(false);
        }
        if store
            .products
            .values()
            .any(|p| p.code_value == product.code_value && p.id != product.id)
        {
            return Err(ProductError::RegisteredConflict(product.code_value));
        }
        if !self.warehouses.link_product(product.id, product.id_warehouse).await {
            return Err(ProductError::unknown_warehouse());
        }

        tracing::info!(product_id = product.id, "Updated product");
        store.products.insert(product.id, product);
        Ok(true)
    }

    async fn delete(&self, _ctx: &RequestContext, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;
        if store.products.remove(&id).is_none() {
            return Ok(false);
        }
        self.warehouses.link_product(id, None).await;

        tracing::info!(product_id = id, "Deleted product");
        Ok(true)
    }
}
