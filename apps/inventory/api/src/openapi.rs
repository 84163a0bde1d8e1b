use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "CRUD API for products and the warehouses that store them"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/products", api = domain_products::ApiDoc),
        (path = "/v1/warehouses", api = domain_warehouses::ApiDoc)
    )
)]
pub struct ApiDoc;
