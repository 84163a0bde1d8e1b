use async_trait::async_trait;
use database::RequestContext;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Statement,
};

use crate::{
    entity,
    error::WarehouseResult,
    models::{Warehouse, WarehouseInput, WarehouseReport},
    repository::WarehouseRepository,
};

/// LEFT JOIN so an empty warehouse still yields a row with a zero count.
const REPORT_PRODUCTS_SQL: &str = r#"
SELECT w.name AS warehouse_name, COUNT(p.id) AS product_count
FROM warehouses w
LEFT JOIN products p ON p.id_warehouse = w.id
WHERE w.id = $1
GROUP BY w.id, w.name
"#;

#[derive(Debug, FromQueryResult)]
struct ReportRow {
    warehouse_name: String,
    product_count: i64,
}

pub struct PgWarehouseRepository {
    db: DatabaseConnection,
}

impl PgWarehouseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WarehouseRepository for PgWarehouseRepository {
    async fn list(&self, ctx: &RequestContext) -> WarehouseResult<Vec<Warehouse>> {
        let models = ctx
            .run(
                entity::Entity::find()
                    .order_by_asc(entity::Column::Id)
                    .all(&self.db),
            )
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: i32) -> WarehouseResult<Option<Warehouse>> {
        let model = ctx.run(entity::Entity::find_by_id(id).one(&self.db)).await?;
        Ok(model.map(Into::into))
    }

    async fn create(&self, ctx: &RequestContext, input: WarehouseInput) -> WarehouseResult<Warehouse> {
        let active_model: entity::ActiveModel = input.into();
        let model = ctx.run(active_model.insert(&self.db)).await?;

        tracing::info!(warehouse_id = model.id, request_id = %ctx.request_id(), "Created warehouse");
        Ok(model.into())
    }

    async fn update(&self, ctx: &RequestContext, warehouse: Warehouse) -> WarehouseResult<bool> {
        let id = warehouse.id;
        let active_model: entity::ActiveModel = warehouse.into();

        let result = ctx
            .run(
                entity::Entity::update_many()
                    .set(active_model)
                    .filter(entity::Column::Id.eq(id))
                    .exec(&self.db),
            )
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(warehouse_id = id, request_id = %ctx.request_id(), "Updated warehouse");
        }
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, ctx: &RequestContext, id: i32) -> WarehouseResult<bool> {
        let result = ctx
            .run(entity::Entity::delete_by_id(id).exec(&self.db))
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(warehouse_id = id, request_id = %ctx.request_id(), "Deleted warehouse");
        }
        Ok(result.rows_affected > 0)
    }

    async fn report_products(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> WarehouseResult<Option<WarehouseReport>> {
        let statement =
            Statement::from_sql_and_values(DbBackend::Postgres, REPORT_PRODUCTS_SQL, [id.into()]);

        let row = ctx
            .run(ReportRow::find_by_statement(statement).one(&self.db))
            .await?;

        Ok(row.map(|row| WarehouseReport {
            warehouse_name: row.warehouse_name,
            product_count: row.product_count,
        }))
    }
}
