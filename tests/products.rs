// tests/products.rs

mod common;

use pos_backend::{common::error::AppError, models::sales::PaymentMethod};

use common::{line, product, setup};

#[tokio::test]
async fn product_without_sales_can_be_deleted() {
    let Some(store) = setup().await else { return };
    let goma = product(&store, "Goma", 500, 10, None).await;

    store.state.product_service.delete_product(&store.ctx, goma.id).await.unwrap();

    let gone = store.state.product_service.get_product(&store.ctx, goma.id).await;
    assert!(matches!(gone, Err(AppError::ResourceNotFound(_))));
}

#[tokio::test]
async fn product_with_sales_is_kept() {
    let Some(store) = setup().await else { return };
    let lapiz = product(&store, "Lápiz", 300, 10, None).await;

    store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&lapiz, 1)], PaymentMethod::Cash)
        .await
        .unwrap();

    let result = store.state.product_service.delete_product(&store.ctx, lapiz.id).await;
    assert!(matches!(result, Err(AppError::ForeignKeyConstraint)));
    assert!(store.state.product_service.get_product(&store.ctx, lapiz.id).await.is_ok());
}

#[tokio::test]
async fn barcode_is_unique_per_store() {
    let Some(store) = setup().await else { return };
    product(&store, "Agua 500ml", 900, 10, Some("7790001112223")).await;

    let duplicate = store
        .state
        .product_service
        .create_product(
            &store.ctx,
            &pos_backend::models::product::ProductPayload {
                name: "Agua Copia".to_string(),
                barcode: Some(" 7790001112223 ".to_string()),
                description: None,
                brand: None,
                category: None,
                price: common::money(900),
                cost: None,
                stock: 1,
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::DuplicateBarcode(code)) if code == "7790001112223"));

    // Outra loja pode usar o mesmo código
    let Some(other) = setup().await else { return };
    product(&other, "Agua Otra Tienda", 900, 10, Some("7790001112223")).await;

    let found = store
        .state
        .product_service
        .find_by_barcode(&store.ctx, "7790001112223")
        .await
        .unwrap();
    assert_eq!(found.name, "Agua 500ml");
}

#[tokio::test]
async fn products_without_barcode_do_not_collide() {
    let Some(store) = setup().await else { return };
    product(&store, "Granel A", 100, 1, None).await;
    product(&store, "Granel B", 100, 1, Some("")).await;
    product(&store, "Granel C", 100, 1, None).await;

    let list = store.state.product_service.list_products(&store.ctx, Some("granel")).await.unwrap();
    assert_eq!(list.len(), 3);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let Some(store) = setup().await else { return };
    product(&store, "Descuento 50% Jabón", 100, 1, None).await;
    product(&store, "Jabón 500g", 100, 1, None).await;
    product(&store, "Pasta_Dental", 100, 1, None).await;
    product(&store, "PastaXDental", 100, 1, None).await;

    let service = &store.state.product_service;
    let percent = service.list_products(&store.ctx, Some("50%")).await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "Descuento 50% Jabón");

    let underscore = service.list_products(&store.ctx, Some("pasta_")).await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "Pasta_Dental");
}
