use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{DatabaseError, RequestContext};
use domain_warehouses::Warehouse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Statement,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, ProductWithWarehouse},
    repository::ProductRepository,
};

/// Inner join: a product without a warehouse has no row.
const PRODUCT_WITH_WAREHOUSE_SQL: &str = r#"
SELECT p.id, p.name, p.quantity, p.code_value, p.is_published, p.expiration, p.price,
       p.id_warehouse,
       w.id AS warehouse_id, w.name AS warehouse_name, w.adress AS warehouse_address,
       w.telephone AS warehouse_telephone, w.capacity AS warehouse_capacity
FROM products p
INNER JOIN warehouses w ON w.id = p.id_warehouse
WHERE p.id = $1
"#;

#[derive(Debug, FromQueryResult)]
struct ProductWithWarehouseRow {
    id: i32,
    name: String,
    quantity: i32,
    code_value: String,
    is_published: bool,
    expiration: Option<DateTime<Utc>>,
    price: f64,
    id_warehouse: Option<i32>,
    warehouse_id: i32,
    warehouse_name: String,
    warehouse_address: String,
    warehouse_telephone: String,
    warehouse_capacity: i32,
}

impl From<ProductWithWarehouseRow> for ProductWithWarehouse {
    fn from(row: ProductWithWarehouseRow) -> Self {
        Self {
            product: Product {
                id: row.id,
                name: row.name,
                quantity: row.quantity,
                code_value: row.code_value,
                is_published: row.is_published,
                expiration: row.expiration,
                price: row.price,
                id_warehouse: row.id_warehouse,
            },
            warehouse: Warehouse {
                id: row.warehouse_id,
                name: row.warehouse_name,
                address: row.warehouse_address,
                telephone: row.warehouse_telephone,
                capacity: row.warehouse_capacity,
            },
        }
    }
}

/// Constraint violations on write: the code index and the warehouse FK.
fn write_error(err: DatabaseError, on_duplicate_code: impl FnOnce() -> ProductError) -> ProductError {
    if err.is_unique_violation() {
        on_duplicate_code()
    } else if err.is_foreign_key_violation() {
        ProductError::unknown_warehouse()
    } else {
        err.into()
    }
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, ctx: &RequestContext) -> ProductResult<Vec<Product>> {
        let models = ctx
            .run(
                entity::Entity::find()
                    .order_by_asc(entity::Column::Id)
                    .all(&self.db),
            )
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: i32) -> ProductResult<Option<Product>> {
        let model = ctx.run(entity::Entity::find_by_id(id).one(&self.db)).await?;
        Ok(model.map(Into::into))
    }

    async fn get_with_warehouse(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> ProductResult<Option<ProductWithWarehouse>> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            PRODUCT_WITH_WAREHOUSE_SQL,
            [id.into()],
        );

        let row = ctx
            .run(ProductWithWarehouseRow::find_by_statement(statement).one(&self.db))
            .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_code(
        &self,
        ctx: &RequestContext,
        code: &str,
        excluding: Option<i32>,
    ) -> ProductResult<bool> {
        let mut query = entity::Entity::find().filter(entity::Column::CodeValue.eq(code));
        if let Some(id) = excluding {
            query = query.filter(entity::Column::Id.ne(id));
        }

        let existing = ctx.run(query.one(&self.db)).await?;
        Ok(existing.is_some())
    }

    async fn create(&self, ctx: &RequestContext, input: CreateProduct) -> ProductResult<Product> {
        let code = input.code_value.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = ctx
            .run(active_model.insert(&self.db))
            .await
            .map_err(|e| write_error(e, || ProductError::UniqueViolation(code)))?;

        tracing::info!(product_id = model.id, request_id = %ctx.request_id(), "Created product");
        Ok(model.into())
    }

    async fn update(&self, ctx: &RequestContext, product: Product) -> ProductResult<bool> {
        let id = product.id;
        let code = product.code_value.clone();
        let active_model: entity::ActiveModel = product.into();

        let result = ctx
            .run(
                entity::Entity::update_many()
                    .set(active_model)
                    .filter(entity::Column::Id.eq(id))
                    .exec(&self.db),
            )
            .await
            .map_err(|e| write_error(e, || ProductError::RegisteredConflict(code)))?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, request_id = %ctx.request_id(), "Updated product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, ctx: &RequestContext, id: i32) -> ProductResult<bool> {
        let result = ctx
            .run(entity::Entity::delete_by_id(id).exec(&self.db))
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, request_id = %ctx.request_id(), "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }
}
