use chrono::{DateTime, Utc};
use domain_warehouses::Warehouse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A stock item. `code_value` is unique across all products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Product {
    pub id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 255))]
    pub code_value: String,
    pub is_published: bool,
    pub expiration: Option<DateTime<Utc>>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    pub id_warehouse: Option<i32>,
}

impl Product {
    pub fn new(id: i32, input: CreateProduct) -> Self {
        Self {
            id,
            name: input.name,
            quantity: input.quantity,
            code_value: input.code_value,
            is_published: input.is_published,
            expiration: input.expiration,
            price: input.price,
            id_warehouse: input.id_warehouse,
        }
    }

    /// Field-merge update: supplied values overwrite the stored ones unless
    /// they are the zero value of their type (empty string, `0`, `0.0`,
    /// `false`, the `0001-01-01T00:00:00Z` timestamp). Nothing is ever cleared.
    pub fn merge(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name.filter(|name| !name.is_empty()) {
            self.name = name;
        }
        if let Some(quantity) = update.quantity.filter(|quantity| *quantity != 0) {
            self.quantity = quantity;
        }
        if let Some(code_value) = update.code_value.filter(|code| !code.is_empty()) {
            self.code_value = code_value;
        }
        if let Some(is_published) = update.is_published.filter(|published| *published) {
            self.is_published = is_published;
        }
        if let Some(expiration) = update.expiration.filter(|at| !is_unset_time(at)) {
            self.expiration = Some(expiration);
        }
        if let Some(price) = update.price.filter(|price| *price != 0.0) {
            self.price = price;
        }
        if let Some(id_warehouse) = update.id_warehouse.filter(|id| *id != 0) {
            self.id_warehouse = Some(id_warehouse);
        }
    }
}

/// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`, the zero time
/// clients send for "no date".
const UNSET_TIMESTAMP: i64 = -62_135_596_800;

fn is_unset_time(at: &DateTime<Utc>) -> bool {
    at.timestamp() == UNSET_TIMESTAMP
}

/// Body of `POST /products`
///
/// Missing JSON fields default to zero values so that they fail validation
/// (422) instead of deserialization (400).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(length(min = 1, max = 255))]
    pub code_value: String,

    pub is_published: bool,

    pub expiration: Option<DateTime<Utc>>,

    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,

    pub id_warehouse: Option<i32>,
}

/// Body of `PATCH /products/{id}`, see [`Product::merge`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub code_value: Option<String>,
    pub is_published: Option<bool>,
    pub expiration: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub id_warehouse: Option<i32>,
}

/// A product joined with the warehouse that stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductWithWarehouse {
    pub product: Product,
    pub warehouse: Warehouse,
}
