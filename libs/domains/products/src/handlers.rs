use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, JsonBody, RequestCtx,
    errors::responses::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnprocessableEntityResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductWithWarehouse, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "products";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        get_product_with_warehouse,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductWithWarehouse),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            UnprocessableEntityResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/{id}/withWarehouse", get(get_product_with_warehouse))
        .with_state(shared_service)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequestCtx(ctx): RequestCtx,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.get_all(&ctx).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequestCtx(ctx): RequestCtx,
    headers: HeaderMap,
    JsonBody(input): JsonBody<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let code_value = input.code_value.clone();
    let result = service.create(&ctx, input).await;

    AuditEvent::new(
        "product.create",
        result.as_ref().ok().map(|p| format!("product:{}", p.id)),
        AuditOutcome::of(&result),
    )
    .with_request_id(ctx.request_id())
    .with_headers(&headers)
    .with_details(json!({ "code_value": code_value }))
    .log();

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequestCtx(ctx): RequestCtx,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    let product = service.get(&ctx, id).await?;
    Ok(Json(product))
}

/// Update a product
///
/// Only supplied, non-empty and non-zero fields replace the stored values.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequestCtx(ctx): RequestCtx,
    headers: HeaderMap,
    IdPath(id): IdPath,
    JsonBody(candidate): JsonBody<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let result = service.update(&ctx, id, candidate).await;

    AuditEvent::new(
        "product.update",
        Some(format!("product:{}", id)),
        AuditOutcome::of(&result),
    )
    .with_request_id(ctx.request_id())
    .with_headers(&headers)
    .log();

    Ok(Json(result?))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequestCtx(ctx): RequestCtx,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> ProductResult<impl IntoResponse> {
    let result = service.delete(&ctx, id).await;

    AuditEvent::new(
        "product.delete",
        Some(format!("product:{}", id)),
        AuditOutcome::of(&result),
    )
    .with_request_id(ctx.request_id())
    .with_headers(&headers)
    .log();

    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a product together with its warehouse
#[utoipa::path(
    get,
    path = "/{id}/withWarehouse",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product and warehouse", body = ProductWithWarehouse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_with_warehouse<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RequestCtx(ctx): RequestCtx,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductWithWarehouse>> {
    let joined = service.get_with_warehouse(&ctx, id).await?;
    Ok(Json(joined))
}
