use axum::Router;
use domain_products::{PgProductRepository, ProductRepository, ProductService};
use domain_warehouses::{PgWarehouseRepository, WarehouseRepository, WarehouseService};

pub mod health;

/// Creates the API routes without the `/api` prefix, which `create_router`
/// adds. Every domain router has its state applied already.
pub fn routes(state: &crate::state::AppState) -> Router {
    v1(
        ProductService::new(PgProductRepository::new(state.db.clone())),
        WarehouseService::new(PgWarehouseRepository::new(state.db.clone())),
    )
}

/// Version 1 of the API over any pair of repositories.
pub fn v1<P, W>(products: ProductService<P>, warehouses: WarehouseService<W>) -> Router
where
    P: ProductRepository + 'static,
    W: WarehouseRepository + 'static,
{
    Router::new().nest(
        "/v1",
        Router::new()
            .nest("/products", domain_products::handlers::router(products))
            .nest("/warehouses", domain_warehouses::handlers::router(warehouses)),
    )
}

/// Router with the `/ready` endpoint, which checks the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum_helpers::create_router;
    use core_config::server::ServerConfig;
    use domain_products::InMemoryProductRepository;
    use domain_warehouses::InMemoryWarehouseRepository;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let warehouses = InMemoryWarehouseRepository::new();
        let products = InMemoryProductRepository::new(warehouses.clone());
        let routes = v1(
            ProductService::new(products),
            WarehouseService::new(warehouses),
        );
        create_router::<ApiDoc>(routes, &ServerConfig::default()).unwrap()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_warehouse_product_report_flow() {
        let app = app();

        let (status, warehouse) = send(
            &app,
            "POST",
            "/api/v1/warehouses",
            Some(json!({"name": "W1", "address": "A1", "telephone": "T1", "capacity": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let warehouse_id = warehouse["id"].as_i64().unwrap();
        assert_ne!(warehouse_id, 0);

        let (status, product) = send(
            &app,
            "POST",
            "/api/v1/products",
            Some(json!({
                "name": "P1",
                "quantity": 5,
                "code_value": "C1",
                "price": 9.99,
                "id_warehouse": warehouse_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, joined) = send(
            &app,
            "GET",
            &format!("/api/v1/products/{}/withWarehouse", product["id"]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(joined["product"]["code_value"], "C1");
        assert_eq!(joined["warehouse"], warehouse);

        let (status, report) = send(
            &app,
            "GET",
            &format!("/api/v1/warehouses/reportProducts?id={}", warehouse_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report, json!({"warehouse_name": "W1", "product_count": 1}));

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/v1/warehouses/{}", warehouse_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, product) = send(
            &app,
            "GET",
            &format!("/api/v1/products/{}", product["id"]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(product["id_warehouse"].is_null());
    }

    #[tokio::test]
    async fn test_error_envelopes() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/v1/products/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_ID");

        let (status, body) = send(&app, "GET", "/api/v1/warehouses/reportProducts?id=x", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_QUERY");

        let (status, body) = send(&app, "GET", "/api/v1/warehouses/12", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");

        let (status, _) = send(&app, "GET", "/api/v2/products", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
