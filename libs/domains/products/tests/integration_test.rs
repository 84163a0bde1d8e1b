//! Postgres integration tests for the Products domain
//!
//! These start a Postgres container through `test_utils::TestDatabase` and
//! need Docker: run with `cargo test -- --ignored`.

use database::RequestContext;
use domain_products::*;
use domain_warehouses::{PgWarehouseRepository, WarehouseInput, WarehouseService};
use test_utils::assertions::{assert_close, assert_some};
use test_utils::{TestDataBuilder, TestDatabase};

fn candidate(builder: &TestDataBuilder, suffix: &str, id_warehouse: Option<i32>) -> CreateProduct {
    CreateProduct {
        name: builder.name("product", suffix),
        quantity: 5,
        code_value: builder.code(suffix),
        price: 9.99,
        id_warehouse,
        ..Default::default()
    }
}

fn services(db: &TestDatabase) -> (ProductService<PgProductRepository>, WarehouseService<PgWarehouseRepository>) {
    (
        ProductService::new(PgProductRepository::new(db.connection())),
        WarehouseService::new(PgWarehouseRepository::new(db.connection())),
    )
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_warehouse_then_product_with_warehouse() {
    let db = TestDatabase::new().await;
    let (products, warehouses) = services(&db);
    let ctx = RequestContext::background();

    let warehouse = warehouses
        .create(
            &ctx,
            WarehouseInput {
                name: "W1".to_string(),
                address: "A1".to_string(),
                telephone: "T1".to_string(),
                capacity: 10,
            },
        )
        .await
        .unwrap();
    assert!(warehouse.id > 0);

    let product = products
        .create(
            &ctx,
            CreateProduct {
                name: "P1".to_string(),
                quantity: 5,
                code_value: "C1".to_string(),
                price: 9.99,
                id_warehouse: Some(warehouse.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let joined = products.get_with_warehouse(&ctx, product.id).await.unwrap();
    assert_eq!(joined.product.name, "P1");
    assert_eq!(joined.product.quantity, 5);
    assert_eq!(joined.product.code_value, "C1");
    assert_close(joined.product.price, 9.99, "price");
    assert_eq!(joined.warehouse, warehouse);

    let report = warehouses.report_products(&ctx, warehouse.id).await.unwrap();
    assert_eq!(report.product_count, 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unique_code_and_merge_update() {
    let db = TestDatabase::new().await;
    let (products, _) = services(&db);
    let ctx = RequestContext::background();
    let builder = TestDataBuilder::from_test_name("product_unique_merge");

    let first = products
        .create(&ctx, candidate(&builder, "a", None))
        .await
        .unwrap();
    let second = products
        .create(&ctx, candidate(&builder, "b", None))
        .await
        .unwrap();

    assert!(matches!(
        products.create(&ctx, candidate(&builder, "a", None)).await,
        Err(ProductError::UniqueViolation(_))
    ));

    assert!(matches!(
        products
            .update(
                &ctx,
                second.id,
                UpdateProduct {
                    code_value: Some(first.code_value.clone()),
                    ..Default::default()
                },
            )
            .await,
        Err(ProductError::RegisteredConflict(_))
    ));

    let updated = products
        .update(
            &ctx,
            first.id,
            UpdateProduct {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let stored = assert_some(
        products.get_all(&ctx).await.unwrap().into_iter().find(|p| p.id == first.id),
        "updated product",
    );
    assert_eq!(stored, updated);
    assert_eq!(stored.code_value, first.code_value);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_foreign_key_and_set_null() {
    let db = TestDatabase::new().await;
    let (products, warehouses) = services(&db);
    let ctx = RequestContext::background();
    let builder = TestDataBuilder::from_test_name("product_foreign_key");

    assert!(matches!(
        products.create(&ctx, candidate(&builder, "orphan", Some(4242))).await,
        Err(ProductError::InvalidStruct(_))
    ));

    let warehouse = warehouses
        .create(
            &ctx,
            WarehouseInput {
                name: builder.name("warehouse", "main"),
                address: "A1".to_string(),
                telephone: "T1".to_string(),
                capacity: 10,
            },
        )
        .await
        .unwrap();
    let product = products
        .create(&ctx, candidate(&builder, "stocked", Some(warehouse.id)))
        .await
        .unwrap();

    warehouses.delete(&ctx, warehouse.id).await.unwrap();

    let product = products.get(&ctx, product.id).await.unwrap();
    assert_eq!(product.id_warehouse, None);
    assert!(matches!(
        products.get_with_warehouse(&ctx, product.id).await,
        Err(ProductError::NotFound(_))
    ));

    products.delete(&ctx, product.id).await.unwrap();
    assert!(matches!(
        products.delete(&ctx, product.id).await,
        Err(ProductError::NotFound(_))
    ));
}
