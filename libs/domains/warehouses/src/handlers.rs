use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, IdPath, JsonBody, RequestCtx,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
        UnprocessableEntityResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::WarehouseResult;
use crate::models::{ReportQuery, UpdateWarehouse, Warehouse, WarehouseInput, WarehouseReport};
use crate::repository::WarehouseRepository;
use crate::service::WarehouseService;

pub const TAG: &str = "warehouses";

/// OpenAPI documentation for Warehouses API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_warehouses,
        create_warehouse,
        get_warehouse,
        update_warehouse,
        delete_warehouse,
        report_products,
    ),
    components(
        schemas(Warehouse, WarehouseInput, UpdateWarehouse, WarehouseReport),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Warehouse management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the warehouse router with all HTTP endpoints
pub fn router<R: WarehouseRepository + 'static>(service: WarehouseService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_warehouses).post(create_warehouse))
        .route("/reportProducts", get(report_products))
        .route(
            "/{id}",
            get(get_warehouse)
                .patch(update_warehouse)
                .delete(delete_warehouse),
        )
        .with_state(shared_service)
}

/// List all warehouses
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of warehouses", body = Vec<Warehouse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_warehouses<R: WarehouseRepository>(
    State(service): State<Arc<WarehouseService<R>>>,
    RequestCtx(ctx): RequestCtx,
) -> WarehouseResult<Json<Vec<Warehouse>>> {
    let warehouses = service.get_all(&ctx).await?;
    Ok(Json(warehouses))
}

/// Create a new warehouse
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = WarehouseInput,
    responses(
        (status = 201, description = "Warehouse created successfully", body = Warehouse),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_warehouse<R: WarehouseRepository>(
    State(service): State<Arc<WarehouseService<R>>>,
    RequestCtx(ctx): RequestCtx,
    headers: HeaderMap,
    JsonBody(input): JsonBody<WarehouseInput>,
) -> WarehouseResult<impl IntoResponse> {
    let result = service.create(&ctx, input).await;

    AuditEvent::new(
        "warehouse.create",
        result.as_ref().ok().map(|w| format!("warehouse:{}", w.id)),
        AuditOutcome::of(&result),
    )
    .with_request_id(ctx.request_id())
    .with_headers(&headers)
    .log();

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Get a warehouse by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Warehouse ID")
    ),
    responses(
        (status = 200, description = "Warehouse found", body = Warehouse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_warehouse<R: WarehouseRepository>(
    State(service): State<Arc<WarehouseService<R>>>,
    RequestCtx(ctx): RequestCtx,
    IdPath(id): IdPath,
) -> WarehouseResult<Json<Warehouse>> {
    let warehouse = service.get(&ctx, id).await?;
    Ok(Json(warehouse))
}

/// Update a warehouse
///
/// Supplied fields overwrite the stored ones; omitted fields keep their
/// current value.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Warehouse ID")
    ),
    request_body = UpdateWarehouse,
    responses(
        (status = 200, description = "Warehouse updated successfully", body = Warehouse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_warehouse<R: WarehouseRepository>(
    State(service): State<Arc<WarehouseService<R>>>,
    RequestCtx(ctx): RequestCtx,
    headers: HeaderMap,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<UpdateWarehouse>,
) -> WarehouseResult<Json<Warehouse>> {
    let result = service.patch(&ctx, id, patch).await;

    AuditEvent::new(
        "warehouse.update",
        Some(format!("warehouse:{}", id)),
        AuditOutcome::of(&result),
    )
    .with_request_id(ctx.request_id())
    .with_headers(&headers)
    .log();

    Ok(Json(result?))
}

/// Delete a warehouse
///
/// Products stored in it are kept with their warehouse reference cleared.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Warehouse ID")
    ),
    responses(
        (status = 204, description = "Warehouse deleted successfully"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_warehouse<R: WarehouseRepository>(
    State(service): State<Arc<WarehouseService<R>>>,
    RequestCtx(ctx): RequestCtx,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> WarehouseResult<impl IntoResponse> {
    let result = service.delete(&ctx, id).await;

    AuditEvent::new(
        "warehouse.delete",
        Some(format!("warehouse:{}", id)),
        AuditOutcome::of(&result),
    )
    .with_request_id(ctx.request_id())
    .with_headers(&headers)
    .log();

    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Count the products stored in a warehouse
#[utoipa::path(
    get,
    path = "/reportProducts",
    tag = TAG,
    params(ReportQuery),
    responses(
        (status = 200, description = "Product count", body = WarehouseReport),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn report_products<R: WarehouseRepository>(
    State(service): State<Arc<WarehouseService<R>>>,
    RequestCtx(ctx): RequestCtx,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<WarehouseReport>, AppError> {
    let Query(ReportQuery { id }) = query?;
    let report = service.report_products(&ctx, id).await?;
    Ok(Json(report))
}
