use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Warehouse, WarehouseInput};

/// Sea-ORM Entity for the warehouses table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Column keeps the legacy spelling
    #[sea_orm(column_name = "adress")]
    pub address: String,
    pub telephone: String,
    pub capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Warehouse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            telephone: model.telephone,
            capacity: model.capacity,
        }
    }
}

// id is assigned by the sequence
impl From<WarehouseInput> for ActiveModel {
    fn from(input: WarehouseInput) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            address: Set(input.address),
            telephone: Set(input.telephone),
            capacity: Set(input.capacity),
        }
    }
}

impl From<Warehouse> for ActiveModel {
    fn from(warehouse: Warehouse) -> Self {
        ActiveModel {
            id: Set(warehouse.id),
            name: Set(warehouse.name),
            address: Set(warehouse.address),
            telephone: Set(warehouse.telephone),
            capacity: Set(warehouse.capacity),
        }
    }
}
