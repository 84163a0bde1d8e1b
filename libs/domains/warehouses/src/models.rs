use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A storage location products can belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Warehouse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub telephone: String,
    pub capacity: i32,
}

impl Warehouse {
    /// Attach an id to a full set of warehouse fields
    pub fn from_input(id: i32, input: WarehouseInput) -> Self {
        Self {
            id,
            name: input.name,
            address: input.address,
            telephone: input.telephone,
            capacity: input.capacity,
        }
    }
}

/// Every writable warehouse field. Used for create and for full replacement.
///
/// Missing JSON fields default to empty values so that they fail validation
/// (422) instead of deserialization (400).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default)]
pub struct WarehouseInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub address: String,

    #[validate(length(min = 1, max = 50))]
    pub telephone: String,

    #[validate(range(min = 1))]
    pub capacity: i32,
}

impl From<Warehouse> for WarehouseInput {
    fn from(warehouse: Warehouse) -> Self {
        Self {
            name: warehouse.name,
            address: warehouse.address,
            telephone: warehouse.telephone,
            capacity: warehouse.capacity,
        }
    }
}

/// Partial warehouse body accepted by `PATCH /warehouses/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateWarehouse {
    pub name: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub capacity: Option<i32>,
}

impl UpdateWarehouse {
    /// Overlay the supplied fields onto the current record.
    pub fn apply_to(self, current: Warehouse) -> WarehouseInput {
        let mut input = WarehouseInput::from(current);
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(address) = self.address {
            input.address = address;
        }
        if let Some(telephone) = self.telephone {
            input.telephone = telephone;
        }
        if let Some(capacity) = self.capacity {
            input.capacity = capacity;
        }
        input
    }
}

/// Number of products stored in one warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WarehouseReport {
    pub warehouse_name: String,
    pub product_count: i64,
}

/// Query string of `GET /warehouses/reportProducts`
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Warehouse ID
    pub id: i32,
}
