// tests/quotes.rs

mod common;

use pos_backend::{
    common::error::AppError,
    models::{quote::QuoteStatus, sales::PaymentMethod},
};

use common::{line, money, product, setup, stock_of};

#[tokio::test]
async fn quote_converts_exactly_once() {
    let Some(store) = setup().await else { return };
    let mesa = product(&store, "Mesa", 250000, 4, None).await;

    let quote = store
        .state
        .quote_service
        .create_quote(&store.ctx, "Juan Pérez", &[line(&mesa, 2)])
        .await
        .unwrap();
    assert_eq!(quote.quote.status, QuoteStatus::Draft);
    assert_eq!(quote.quote.total, money(500000));
    // Orçamento não mexe no estoque
    assert_eq!(stock_of(&store, &mesa).await, 4);

    let quotes = &store.state.quote_service;
    let (first, second) = tokio::join!(
        quotes.convert_to_sale(&store.ctx, quote.quote.id, PaymentMethod::Cash),
        quotes.convert_to_sale(&store.ctx, quote.quote.id, PaymentMethod::Cash),
    );

    let (sale, rejected) = match (first, second) {
        (Ok(sale), Err(e)) | (Err(e), Ok(sale)) => (sale, e),
        other => panic!("esperava uma única conversão, veio {other:?}"),
    };
    assert!(matches!(rejected, AppError::AlreadyConverted));
    assert_eq!(sale.quote_id, Some(quote.quote.id));
    assert_eq!(sale.total, money(500000));
    assert_eq!(stock_of(&store, &mesa).await, 2);

    let converted = quotes.get_quote(&store.ctx, quote.quote.id).await.unwrap();
    assert_eq!(converted.quote.status, QuoteStatus::Converted);

    // Terminal: nem status manual nem exclusão
    let reopen = quotes.update_status(&store.ctx, quote.quote.id, QuoteStatus::Draft).await;
    assert!(matches!(reopen, Err(AppError::AlreadyConverted)));
    let delete = quotes.delete_quote(&store.ctx, quote.quote.id).await;
    assert!(matches!(delete, Err(AppError::AlreadyConverted)));
}

#[tokio::test]
async fn conversion_rechecks_live_stock() {
    let Some(store) = setup().await else { return };
    let silla = product(&store, "Silla", 80000, 3, None).await;

    let quote = store
        .state
        .quote_service
        .create_quote(&store.ctx, "Ana Gómez", &[line(&silla, 3)])
        .await
        .unwrap();

    store
        .state
        .sales_service
        .process_sale(&store.ctx, &[line(&silla, 2)], PaymentMethod::Cash)
        .await
        .unwrap();

    let result = store
        .state
        .quote_service
        .convert_to_sale(&store.ctx, quote.quote.id, PaymentMethod::Cash)
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { available: 1, .. })));

    let still_open = store.state.quote_service.get_quote(&store.ctx, quote.quote.id).await.unwrap();
    assert_eq!(still_open.quote.status, QuoteStatus::Draft);
    assert_eq!(stock_of(&store, &silla).await, 1);
}

#[tokio::test]
async fn duplicate_is_an_independent_draft() {
    let Some(store) = setup().await else { return };
    let lampara = product(&store, "Lámpara", 35050, 10, None).await;
    let quotes = &store.state.quote_service;

    let original = quotes
        .create_quote(&store.ctx, "Cliente Original", &[line(&lampara, 3)])
        .await
        .unwrap();
    quotes
        .update_status(&store.ctx, original.quote.id, QuoteStatus::Approved)
        .await
        .unwrap();

    let copy = quotes
        .duplicate_quote(&store.ctx, original.quote.id, "  Cliente Nuevo  ")
        .await
        .unwrap();

    assert_ne!(copy.quote.id, original.quote.id);
    assert_eq!(copy.quote.client_name, "Cliente Nuevo");
    assert_eq!(copy.quote.status, QuoteStatus::Draft);
    assert_eq!(copy.quote.total, original.quote.total);
    assert_eq!(copy.items.len(), 1);
    assert_eq!(copy.items[0].product_name, "Lámpara");
    assert_ne!(copy.items[0].id, original.items[0].id);

    // Mudanças no original depois da cópia não a alcançam
    quotes
        .convert_to_sale(&store.ctx, original.quote.id, PaymentMethod::Card)
        .await
        .unwrap();
    let copy_after = quotes.get_quote(&store.ctx, copy.quote.id).await.unwrap();
    assert_eq!(copy_after.quote.status, QuoteStatus::Draft);
    assert_eq!(copy_after.quote.total, copy.quote.total);
    assert_eq!(copy_after.items.len(), 1);
    assert_eq!(copy_after.items[0].quantity, 3);
    assert_eq!(copy_after.items[0].price, copy.items[0].price);

    // A cópia continua conversível por conta própria
    let sale = quotes
        .convert_to_sale(&store.ctx, copy.quote.id, PaymentMethod::Cash)
        .await
        .unwrap();
    assert_eq!(sale.quote_id, Some(copy.quote.id));
    assert_eq!(stock_of(&store, &lampara).await, 4);

    let blank = quotes.duplicate_quote(&store.ctx, original.quote.id, "   ").await;
    assert!(matches!(blank, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn manual_status_cannot_reach_converted() {
    let Some(store) = setup().await else { return };
    let vaso = product(&store, "Vaso", 1200, 5, None).await;
    let quotes = &store.state.quote_service;

    let quote = quotes.create_quote(&store.ctx, "Luis", &[line(&vaso, 1)]).await.unwrap();

    let result = quotes.update_status(&store.ctx, quote.quote.id, QuoteStatus::Converted).await;
    assert!(matches!(
        result,
        Err(AppError::InvalidStatusTransition { from: QuoteStatus::Draft, to: QuoteStatus::Converted })
    ));

    let approved = quotes.update_status(&store.ctx, quote.quote.id, QuoteStatus::Approved).await.unwrap();
    assert_eq!(approved.status, QuoteStatus::Approved);
    let back = quotes.update_status(&store.ctx, quote.quote.id, QuoteStatus::Draft).await.unwrap();
    assert_eq!(back.status, QuoteStatus::Draft);
}
