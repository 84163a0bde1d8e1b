use database::RequestContext;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductWithWarehouse, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All products; empty when there are none
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_all(&self, ctx: &RequestContext) -> ProductResult<Vec<Product>> {
        self.repository.list(ctx).await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get(&self, ctx: &RequestContext, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(ctx, id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Product together with the warehouse storing it. A product that is not
    /// stored in any warehouse is `NotFound`.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_with_warehouse(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> ProductResult<ProductWithWarehouse> {
        self.repository
            .get_with_warehouse(ctx, id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Validate, check the code is free, insert, then return the stored row
    /// read back by its new id.
    #[instrument(skip(self, ctx, input), fields(request_id = %ctx.request_id(), code = %input.code_value))]
    pub async fn create(&self, ctx: &RequestContext, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        if self
            .repository
            .exists_by_code(ctx, &input.code_value, None)
            .await?
        {
            return Err(ProductError::UniqueViolation(input.code_value));
        }

        let created = self.repository.create(ctx, input).await?;

        self.repository
            .get_by_id(ctx, created.id)
            .await?
            .ok_or_else(|| {
                ProductError::Internal(format!("Product {} vanished after insert", created.id))
            })
    }

    /// Merge `candidate` onto the stored product (see [`Product::merge`]) and
    /// persist the result.
    ///
    /// The merged code value must not belong to any other product.
    #[instrument(skip(self, ctx, candidate), fields(request_id = %ctx.request_id()))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i32,
        candidate: UpdateProduct,
    ) -> ProductResult<Product> {
        let mut product = self
            .repository
            .get_by_id(ctx, id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        product.merge(candidate);
        product.validate()?;

        if self
            .repository
            .exists_by_code(ctx, &product.code_value, Some(id))
            .await?
        {
            return Err(ProductError::RegisteredConflict(product.code_value));
        }

        if !self.repository.update(ctx, product.clone()).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(product)
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> ProductResult<()> {
        if !self.repository.delete(ctx, id).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};
    use domain_warehouses::{InMemoryWarehouseRepository, WarehouseInput, WarehouseRepository};

    fn candidate(code: &str) -> CreateProduct {
        CreateProduct {
            name: "P1".to_string(),
            quantity: 5,
            code_value: code.to_string(),
            price: 9.99,
            ..Default::default()
        }
    }

    fn stored(id: i32, code: &str) -> Product {
        Product::new(id, candidate(code))
    }

    fn in_memory() -> (ProductService<InMemoryProductRepository>, InMemoryWarehouseRepository) {
        let warehouses = InMemoryWarehouseRepository::new();
        let service = ProductService::new(InMemoryProductRepository::new(warehouses.clone()));
        (service, warehouses)
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let (service, _) = in_memory();
        let ctx = RequestContext::background();

        let created = service.create(&ctx, candidate("C1")).await.unwrap();
        let fetched = service.get(&ctx, created.id).await.unwrap();

        assert_ne!(created.id, 0);
        assert_eq!(fetched, Product::new(created.id, candidate("C1")));
    }

    #[tokio::test]
    async fn test_create_duplicate_code_is_unique_violation() {
        let (service, _) = in_memory();
        let ctx = RequestContext::background();

        service.create(&ctx, candidate("C1")).await.unwrap();
        let err = service.create(&ctx, candidate("C1")).await.unwrap_err();

        assert!(matches!(err, ProductError::UniqueViolation(code) if code == "C1"));
        assert_eq!(service.get_all(&ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_before_touching_storage() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_code().never();
        repo.expect_create().never();
        let service = ProductService::new(repo);

        let err = service
            .create(
                &RequestContext::background(),
                CreateProduct {
                    quantity: 0,
                    ..candidate("C1")
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::InvalidStruct(_)));
    }

    #[tokio::test]
    async fn test_create_rereads_stored_row() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_code()
            .returning(|_, _, excluding| {
                assert_eq!(excluding, None);
                Ok(false)
            });
        repo.expect_create()
            .times(1)
            .returning(|_, input| Ok(Product::new(11, input)));
        repo.expect_get_by_id()
            .withf(|_, id| *id == 11)
            .times(1)
            .returning(|_, id| {
                Ok(Some(Product {
                    name: "canonical".to_string(),
                    ..stored(id, "C1")
                }))
            });
        let service = ProductService::new(repo);

        let product = service
            .create(&RequestContext::background(), candidate("C1"))
            .await
            .unwrap();

        assert_eq!(product.id, 11);
        assert_eq!(product.name, "canonical");
    }

    #[tokio::test]
    async fn test_update_name_only() {
        let (service, _) = in_memory();
        let ctx = RequestContext::background();
        let created = service.create(&ctx, candidate("C1")).await.unwrap();

        let updated = service
            .update(
                &ctx,
                created.id,
                UpdateProduct {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            updated,
            Product {
                name: "Renamed".to_string(),
                ..created.clone()
            }
        );
        assert_eq!(service.get(&ctx, created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_keeping_own_code_does_not_conflict() {
        let (service, _) = in_memory();
        let ctx = RequestContext::background();
        let created = service.create(&ctx, candidate("C1")).await.unwrap();

        let updated = service
            .update(
                &ctx,
                created.id,
                UpdateProduct {
                    code_value: Some("C1".to_string()),
                    quantity: Some(8),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity, 8);
    }

    #[tokio::test]
    async fn test_update_to_other_products_code_conflicts_without_write() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(|_, id| Ok(Some(stored(id, "C1"))));
        repo.expect_exists_by_code()
            .withf(|_, code, excluding| code == "C2" && *excluding == Some(1))
            .returning(|_, _, _| Ok(true));
        repo.expect_update().never();
        let service = ProductService::new(repo);

        let err = service
            .update(
                &RequestContext::background(),
                1,
                UpdateProduct {
                    code_value: Some("C2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::RegisteredConflict(code) if code == "C2"));
    }

    #[tokio::test]
    async fn test_update_missing_product_performs_no_write() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_, _| Ok(None));
        repo.expect_exists_by_code().never();
        repo.expect_update().never();
        let service = ProductService::new(repo);

        let err = service
            .update(&RequestContext::background(), 404, UpdateProduct::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(404)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (service, _) = in_memory();
        let ctx = RequestContext::background();
        let created = service.create(&ctx, candidate("C1")).await.unwrap();

        service.delete(&ctx, created.id).await.unwrap();

        assert!(matches!(
            service.get(&ctx, created.id).await,
            Err(ProductError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&ctx, created.id).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_empty() {
        let (service, _) = in_memory();
        assert!(service
            .get_all(&RequestContext::background())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_get_with_warehouse() {
        let (service, warehouses) = in_memory();
        let ctx = RequestContext::background();
        let warehouse = warehouses
            .create(
                &ctx,
                WarehouseInput {
                    name: "W1".to_string(),
                    address: "A1".to_string(),
                    telephone: "T1".to_string(),
                    capacity: 10,
                },
            )
            .await
            .unwrap();

        let stocked = service
            .create(
                &ctx,
                CreateProduct {
                    id_warehouse: Some(warehouse.id),
                    ..candidate("C1")
                },
            )
            .await
            .unwrap();
        let loose = service.create(&ctx, candidate("C2")).await.unwrap();

        let joined = service.get_with_warehouse(&ctx, stocked.id).await.unwrap();
        assert_eq!(joined.product, stocked);
        assert_eq!(joined.warehouse, warehouse);

        assert!(matches!(
            service.get_with_warehouse(&ctx, loose.id).await,
            Err(ProductError::NotFound(_))
        ));
    }
}
