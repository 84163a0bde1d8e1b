use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DatabaseError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("Warehouse not found: {0}")]
    NotFound(i32),

    #[error("Invalid warehouse: {0}")]
    InvalidStruct(#[from] ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;

impl From<DatabaseError> for WarehouseError {
    fn from(err: DatabaseError) -> Self {
        WarehouseError::Internal(format!("Database error: {}", err))
    }
}

/// Convert WarehouseError to AppError for standardized error responses
impl From<WarehouseError> for AppError {
    fn from(err: WarehouseError) -> Self {
        match err {
            WarehouseError::NotFound(id) => {
                AppError::NotFound(format!("Warehouse {} not found", id))
            }
            WarehouseError::InvalidStruct(errors) => AppError::ValidationError(errors),
            WarehouseError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for WarehouseError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
