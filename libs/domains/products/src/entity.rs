use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{CreateProduct, Product};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    #[sea_orm(unique)]
    pub code_value: String,
    pub is_published: bool,
    pub expiration: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub id_warehouse: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_warehouses::entity::Entity",
        from = "Column::IdWarehouse",
        to = "domain_warehouses::entity::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Warehouse,
}

impl Related<domain_warehouses::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            quantity: model.quantity,
            code_value: model.code_value,
            is_published: model.is_published,
            expiration: model.expiration,
            price: model.price,
            id_warehouse: model.id_warehouse,
        }
    }
}

// id is assigned by the sequence
impl From<CreateProduct> for ActiveModel {
    fn from(input: CreateProduct) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            quantity: Set(input.quantity),
            code_value: Set(input.code_value),
            is_published: Set(input.is_published),
            expiration: Set(input.expiration),
            price: Set(input.price),
            id_warehouse: Set(input.id_warehouse),
        }
    }
}

impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            quantity: Set(product.quantity),
            code_value: Set(product.code_value),
            is_published: Set(product.is_published),
            expiration: Set(product.expiration),
            price: Set(product.price),
            id_warehouse: Set(product.id_warehouse),
        }
    }
}
