use database::RequestContext;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{WarehouseError, WarehouseResult};
use crate::models::{UpdateWarehouse, Warehouse, WarehouseInput, WarehouseReport};
use crate::repository::WarehouseRepository;

/// Service layer for Warehouse business logic
#[derive(Clone)]
pub struct WarehouseService<R: WarehouseRepository> {
    repository: Arc<R>,
}

impl<R: WarehouseRepository> WarehouseService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All warehouses; empty when there are none
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_all(&self, ctx: &RequestContext) -> WarehouseResult<Vec<Warehouse>> {
        self.repository.list(ctx).await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get(&self, ctx: &RequestContext, id: i32) -> WarehouseResult<Warehouse> {
        self.repository
            .get_by_id(ctx, id)
            .await?
            .ok_or(WarehouseError::NotFound(id))
    }

    /// Validate, insert, then return the stored row read back by its new id.
    #[instrument(skip(self, ctx, input), fields(request_id = %ctx.request_id()))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: WarehouseInput,
    ) -> WarehouseResult<Warehouse> {
        input.validate()?;

        let created = self.repository.create(ctx, input).await?;

        self.repository
            .get_by_id(ctx, created.id)
            .await?
            .ok_or_else(|| {
                WarehouseError::Internal(format!("Warehouse {} vanished after insert", created.id))
            })
    }

    /// Replace every field of an existing warehouse.
    ///
    /// Returns the replacement with the path id; the row is not read back.
    #[instrument(skip(self, ctx, replacement), fields(request_id = %ctx.request_id()))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i32,
        replacement: WarehouseInput,
    ) -> WarehouseResult<Warehouse> {
        replacement.validate()?;

        if self.repository.get_by_id(ctx, id).await?.is_none() {
            return Err(WarehouseError::NotFound(id));
        }

        self.write(ctx, Warehouse::from_input(id, replacement)).await
    }

    /// Overlay the supplied fields onto the stored warehouse, then replace it.
    ///
    /// One read and one write; the result is not read back.
    #[instrument(skip(self, ctx, patch), fields(request_id = %ctx.request_id()))]
    pub async fn patch(
        &self,
        ctx: &RequestContext,
        id: i32,
        patch: UpdateWarehouse,
    ) -> WarehouseResult<Warehouse> {
        let current = self.get(ctx, id).await?;
        let replacement = patch.apply_to(current);
        replacement.validate()?;

        self.write(ctx, Warehouse::from_input(id, replacement)).await
    }

    async fn write(&self, ctx: &RequestContext, warehouse: Warehouse) -> WarehouseResult<Warehouse> {
        if !self.repository.update(ctx, warehouse.clone()).await? {
            return Err(WarehouseError::NotFound(warehouse.id));
        }

        Ok(warehouse)
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> WarehouseResult<()> {
        if !self.repository.delete(ctx, id).await? {
            return Err(WarehouseError::NotFound(id));
        }

        Ok(())
    }

    /// Product count of one warehouse. Zero products is a report with a zero
    /// count; an unknown warehouse is `NotFound`.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn report_products(
        &self,
        ctx: &RequestContext,
        warehouse_id: i32,
    ) -> WarehouseResult<WarehouseReport> {
        self.repository
            .report_products(ctx, warehouse_id)
            .await?
            .ok_or(WarehouseError::NotFound(warehouse_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryWarehouseRepository, MockWarehouseRepository};

    fn input() -> WarehouseInput {
        WarehouseInput {
            name: "W1".to_string(),
            address: "A1".to_string(),
            telephone: "T1".to_string(),
            capacity: 10,
        }
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let service = WarehouseService::new(InMemoryWarehouseRepository::new());
        let ctx = RequestContext::background();

        let warehouse = service.create(&ctx, input()).await.unwrap();

        assert_ne!(warehouse.id, 0);
        assert_eq!(WarehouseInput::from(warehouse.clone()), input());
        assert_eq!(service.get(&ctx, warehouse.id).await.unwrap(), warehouse);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_writing() {
        let mut repo = MockWarehouseRepository::new();
        repo.expect_create().never();
        let service = WarehouseService::new(repo);

        let err = service
            .create(
                &RequestContext::background(),
                WarehouseInput {
                    name: String::new(),
                    ..input()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WarehouseError::InvalidStruct(_)));
    }

    #[tokio::test]
    async fn test_update_missing_warehouse_performs_no_write() {
        let mut repo = MockWarehouseRepository::new();
        repo.expect_get_by_id()
            .withf(|_, id| *id == 5)
            .returning(|_, _| Ok(None));
        repo.expect_update().never();
        let service = WarehouseService::new(repo);

        let err = service
            .update(&RequestContext::background(), 5, input())
            .await
            .unwrap_err();

        assert!(matches!(err, WarehouseError::NotFound(5)));
    }

    #[tokio::test]
    async fn test_update_returns_replacement_with_path_id() {
        let mut repo = MockWarehouseRepository::new();
        repo.expect_get_by_id()
            .returning(|_, id| Ok(Some(Warehouse::from_input(id, input()))));
        repo.expect_update()
            .withf(|_, w| w.id == 3 && w.capacity == 99)
            .times(1)
            .returning(|_, _| Ok(true));
        let service = WarehouseService::new(repo);

        let updated = service
            .update(
                &RequestContext::background(),
                3,
                WarehouseInput {
                    capacity: 99,
                    ..input()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, 3);
        assert_eq!(updated.capacity, 99);
    }

    #[tokio::test]
    async fn test_patch_reads_once_and_overlays_supplied_fields() {
        let mut repo = MockWarehouseRepository::new();
        repo.expect_get_by_id()
            .times(1)
            .returning(|_, id| Ok(Some(Warehouse::from_input(id, input()))));
        repo.expect_update()
            .withf(|_, w| w.id == 3 && w.capacity == 40 && w.name == "W1" && w.address == "A1")
            .times(1)
            .returning(|_, _| Ok(true));
        let service = WarehouseService::new(repo);

        let patched = service
            .patch(
                &RequestContext::background(),
                3,
                UpdateWarehouse {
                    capacity: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched, Warehouse::from_input(3, WarehouseInput { capacity: 40, ..input() }));
    }

    #[tokio::test]
    async fn test_patch_missing_warehouse_performs_no_write() {
        let mut repo = MockWarehouseRepository::new();
        repo.expect_get_by_id().times(1).returning(|_, _| Ok(None));
        repo.expect_update().never();
        let service = WarehouseService::new(repo);

        let err = service
            .patch(&RequestContext::background(), 8, UpdateWarehouse::default())
            .await
            .unwrap_err();

        assert!(matches!(err, WarehouseError::NotFound(8)));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = WarehouseService::new(InMemoryWarehouseRepository::new());
        let ctx = RequestContext::background();
        let warehouse = service.create(&ctx, input()).await.unwrap();

        service.delete(&ctx, warehouse.id).await.unwrap();

        assert!(matches!(
            service.delete(&ctx, warehouse.id).await,
            Err(WarehouseError::NotFound(_))
        ));
        assert!(matches!(
            service.get(&ctx, warehouse.id).await,
            Err(WarehouseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_report_distinguishes_empty_from_missing() {
        let service = WarehouseService::new(InMemoryWarehouseRepository::new());
        let ctx = RequestContext::background();
        let warehouse = service.create(&ctx, input()).await.unwrap();

        let report = service.report_products(&ctx, warehouse.id).await.unwrap();
        assert_eq!(report.product_count, 0);
        assert_eq!(report.warehouse_name, "W1");

        assert!(matches!(
            service.report_products(&ctx, warehouse.id + 1).await,
            Err(WarehouseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_empty() {
        let service = WarehouseService::new(InMemoryWarehouseRepository::new());
        let all = service.get_all(&RequestContext::background()).await.unwrap();
        assert!(all.is_empty());
    }
}
