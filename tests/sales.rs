// tests/sales.rs

mod common;

use pos_backend::{common::error::AppError, models::sales::PaymentMethod};

use common::{line, money, product, setup, stock_of};

#[tokio::test]
async fn failed_sale_leaves_no_trace() {
    let Some(store) = setup().await else { return };
    let pan = product(&store, "Pan", 1500, 5, None).await;
    let leche = product(&store, "Leche", 2000, 1, None).await;

    let result = store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&pan, 2), line(&leche, 3)], PaymentMethod::Cash)
        .await;

    match result {
        Err(AppError::InsufficientStock { product, available }) => {
            assert_eq!(product, "Leche");
            assert_eq!(available, 1);
        }
        other => panic!("esperava estoque insuficiente, veio {other:?}"),
    }

    assert_eq!(stock_of(&store, &pan).await, 5);
    assert_eq!(stock_of(&store, &leche).await, 1);
    let history = store.state.sales_service.sales_history(&store.ctx).await.unwrap();
    assert!(history.sales.is_empty());
}

#[tokio::test]
async fn stock_never_goes_below_zero() {
    let Some(store) = setup().await else { return };
    let cafe = product(&store, "Café", 4500, 3, None).await;

    store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&cafe, 3)], PaymentMethod::Card)
        .await
        .unwrap();
    assert_eq!(stock_of(&store, &cafe).await, 0);

    let again = store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&cafe, 1)], PaymentMethod::Card)
        .await;
    assert!(matches!(again, Err(AppError::InsufficientStock { available: 0, .. })));
}

#[tokio::test]
async fn repeated_lines_are_checked_together() {
    let Some(store) = setup().await else { return };
    let azucar = product(&store, "Azúcar", 1000, 3, None).await;

    let result = store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&azucar, 2), line(&azucar, 2)], PaymentMethod::Cash)
        .await;

    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
    assert_eq!(stock_of(&store, &azucar).await, 3);
}

#[tokio::test]
async fn concurrent_sales_of_last_unit_sell_once() {
    let Some(store) = setup().await else { return };
    let ultimo = product(&store, "Último", 9900, 1, None).await;

    let sales = &store.state.sales_service;
    let cart = [line(&ultimo, 1)];
    let (first, second) = tokio::join!(
        sales.process_sale(&store.ctx, &cart, PaymentMethod::Cash),
        sales.process_sale(&store.ctx, &cart, PaymentMethod::Cash),
    );

    let successes = [first.is_ok(), second.is_ok()].into_iter().filter(|ok| *ok).count();
    assert_eq!(successes, 1);
    assert_eq!(stock_of(&store, &ultimo).await, 0);
}

#[tokio::test]
async fn total_is_computed_from_lines() {
    let Some(store) = setup().await else { return };
    let arroz = product(&store, "Arroz", 150050, 10, None).await;
    let sal = product(&store, "Sal", 20000, 10, None).await;

    let sale = store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&arroz, 2), line(&sal, 1)], PaymentMethod::Transfer)
        .await
        .unwrap();

    assert_eq!(sale.total, money(320100));
    assert_eq!(sale.payment_method, PaymentMethod::Transfer);

    let detail = store.state.sales_service.get_sale(&store.ctx, sale.id).await.unwrap();
    assert_eq!(detail.items.len(), 2);
    assert_eq!(stock_of(&store, &arroz).await, 8);

    let history = store.state.sales_service.sales_history(&store.ctx).await.unwrap();
    assert_eq!(history.sales.len(), 1);
    assert_eq!(history.summary.total_revenue, money(320100));
}

#[tokio::test]
async fn oversized_total_is_a_business_error() {
    let Some(store) = setup().await else { return };
    let caro = product(&store, "Maquinaria", 99_999_999_900, 200, None).await;

    let result = store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&caro, 100)], PaymentMethod::Cash)
        .await;

    assert!(matches!(result, Err(AppError::TotalTooLarge)));
    assert_eq!(stock_of(&store, &caro).await, 200);

    let quote = store
        .state
        .quote_service
        .create_quote(&store.ctx, "Industria", &[line(&caro, 100)])
        .await;
    assert!(matches!(quote, Err(AppError::TotalTooLarge)));
}
