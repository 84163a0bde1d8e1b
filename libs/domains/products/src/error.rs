use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Invalid product: {0}")]
    InvalidStruct(#[from] ValidationErrors),

    /// A new product reuses an existing code value
    #[error("Product with code '{0}' already exists")]
    UniqueViolation(String),

    /// An update would give the product a code owned by another product
    #[error("Code '{0}' is registered to another product")]
    RegisteredConflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// `id_warehouse` points at a warehouse that does not exist.
    pub fn unknown_warehouse() -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            "id_warehouse",
            ValidationError::new("warehouse_not_found")
                .with_message(Cow::Borrowed("warehouse does not exist")),
        );
        ProductError::InvalidStruct(errors)
    }
}

impl From<DatabaseError> for ProductError {
    fn from(err: DatabaseError) -> Self {
        ProductError::Internal(format!("Database error: {}", err))
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::InvalidStruct(errors) => AppError::ValidationError(errors),
            ProductError::UniqueViolation(code) => {
                AppError::Conflict(format!("Product with code '{}' already exists", code))
            }
            ProductError::RegisteredConflict(code) => {
                AppError::Conflict(format!("Code '{}' is registered to another product", code))
            }
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
