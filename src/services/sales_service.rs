// src/services/sales_service.rs

use std::{collections::HashMap, sync::Arc};

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, Resource},
        money::{checked_total, round_money},
    },
    db::{ProductRepository, SalesRepository},
    models::{
        context::RequestContext,
        product::ProductStock,
        sales::{LineItemInput, PaymentMethod, Sale, SaleDetail, SaleItemDetail, SalesHistory, SalesSummary},
    },
    services::view_cache::ViewCache,
};

/// Baixa a aplicar num produto (linhas repetidas já somadas).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDeduction {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
}

/// Confere o estoque das linhas contra as linhas travadas.
/// Produto ausente em `locked` é de outra loja ou não existe.
pub fn plan_stock_deductions(
    lines: &[LineItemInput],
    locked: &[ProductStock],
) -> Result<Vec<StockDeduction>, AppError> {
    // 1. Soma as quantidades por produto, na ordem em que aparecem
    let mut requested: Vec<(Uuid, i32)> = Vec::new();
    for line in lines {
        match requested.iter_mut().find(|(id, _)| *id == line.product_id) {
            Some((_, qty)) => {
                *qty = qty
                    .checked_add(line.quantity)
                    .ok_or_else(|| anyhow::anyhow!("quantidade agregada excede i32"))?;
            }
            None => requested.push((line.product_id, line.quantity)),
        }
    }

    // 2. Confere cada produto
    requested
        .into_iter()
        .map(|(product_id, quantity)| {
            let row = locked
                .iter()
                .find(|p| p.id == product_id)
                .ok_or(AppError::ResourceNotFound(Resource::Product))?;

            if row.stock < quantity {
                return Err(AppError::InsufficientStock {
                    product: row.name.clone(),
                    available: row.stock,
                });
            }

            Ok(StockDeduction {
                product_id,
                product_name: row.name.clone(),
                quantity,
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    product_repo: ProductRepository,
    cache: ViewCache,
    pool: PgPool,
}

impl SalesService {
    pub fn new(sales_repo: SalesRepository, product_repo: ProductRepository, cache: ViewCache, pool: PgPool) -> Self {
        Self {
            sales_repo,
            product_repo,
            cache,
            pool,
        }
    }

    // --- REGISTRAR VENDA ---
    pub async fn process_sale(
        &self,
        ctx: &RequestContext,
        lines: &[LineItemInput],
        payment_method: PaymentMethod,
    ) -> Result<Sale, AppError> {
        let mut tx = self.pool.begin().await?;
        let sale = self
            .record_sale_in_tx(&mut tx, ctx.store_id, lines, payment_method, None)
            .await?;
        tx.commit().await?;

        self.cache.invalidate_store(ctx.store_id).await;
        tracing::info!(
            store_id = %ctx.store_id,
            sale_id = %sale.id,
            total = %sale.total,
            items = lines.len(),
            "Venda registrada"
        );
        Ok(sale)
    }

    /// Núcleo da venda, dentro da transação do chamador (venda direta ou conversão).
    /// Trava os produtos em ordem de id, confere estoque, grava cabeçalho e itens e dá baixa.
    pub async fn record_sale_in_tx(
        &self,
        conn: &mut PgConnection,
        store_id: Uuid,
        lines: &[LineItemInput],
        payment_method: PaymentMethod,
        quote_id: Option<Uuid>,
    ) -> Result<Sale, AppError> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let lines: Vec<LineItemInput> = lines
            .iter()
            .map(|line| LineItemInput {
                price: round_money(line.price),
                ..line.clone()
            })
            .collect();

        // 1. Trava (ordem de id evita deadlock entre vendas concorrentes)
        let mut ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        ids.sort();
        ids.dedup();
        let locked = self.product_repo.lock_for_update(&mut *conn, store_id, &ids).await?;

        // 2. Confere estoque
        let deductions = plan_stock_deductions(&lines, &locked)?;

        // 3. Cabeçalho com total calculado aqui
        let total = checked_total(lines.iter().map(|l| (l.price, l.quantity)))?;
        let sale = self
            .sales_repo
            .insert_sale(&mut *conn, store_id, total, payment_method, quote_id)
            .await?;

        // 4. Itens, na ordem do carrinho
        for (position, line) in lines.iter().enumerate() {
            let position = i32::try_from(position).map_err(anyhow::Error::from)?;
            self.sales_repo.insert_item(&mut *conn, sale.id, position, line).await?;
        }

        // 5. Baixa de estoque
        for deduction in &deductions {
            self.product_repo
                .decrement_stock(
                    &mut *conn,
                    store_id,
                    deduction.product_id,
                    deduction.quantity,
                    &deduction.product_name,
                )
                .await?;
        }

        Ok(sale)
    }

    // --- HISTÓRICO ---
    pub async fn sales_history(&self, ctx: &RequestContext) -> Result<Arc<SalesHistory>, AppError> {
        self.cache
            .sales_history_or_load(ctx.store_id, || self.load_history(ctx.store_id))
            .await
    }

    async fn load_history(&self, store_id: Uuid) -> Result<SalesHistory, AppError> {
        let sales = self.sales_repo.list_by_store(&self.pool, store_id).await?;
        let items = self.sales_repo.items_for_store(&self.pool, store_id).await?;

        let mut by_sale: HashMap<Uuid, Vec<SaleItemDetail>> = HashMap::new();
        for item in items {
            by_sale.entry(item.sale_id).or_default().push(item);
        }

        let sales: Vec<SaleDetail> = sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                SaleDetail { sale, items }
            })
            .collect();

        Ok(SalesHistory {
            summary: SalesSummary::from_sales(&sales),
            sales,
        })
    }

    pub async fn get_sale(&self, ctx: &RequestContext, sale_id: Uuid) -> Result<SaleDetail, AppError> {
        let sale = self
            .sales_repo
            .find_by_id(&self.pool, ctx.store_id, sale_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Sale))?;
        let items = self.sales_repo.items_for_sale(&self.pool, sale.id).await?;
        Ok(SaleDetail { sale, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(product_id: Uuid, quantity: i32) -> LineItemInput {
        LineItemInput {
            product_id,
            quantity,
            price: Decimal::new(1000, 2),
        }
    }

    fn row(id: Uuid, name: &str, stock: i32) -> ProductStock {
        ProductStock {
            id,
            name: name.to_string(),
            stock,
        }
    }

    #[test]
    fn aggregates_repeated_lines_in_first_seen_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let plan = plan_stock_deductions(
            &[line(b, 1), line(a, 2), line(b, 3)],
            &[row(a, "Cuaderno", 5), row(b, "Lápiz", 4)],
        )
        .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!((plan[0].product_id, plan[0].quantity), (b, 4));
        assert_eq!((plan[1].product_id, plan[1].quantity), (a, 2));
    }

    #[test]
    fn repeated_lines_can_exceed_stock_together() {
        let a = Uuid::new_v4();
        let err = plan_stock_deductions(&[line(a, 2), line(a, 2)], &[row(a, "Goma", 3)]).unwrap_err();
        match err {
            AppError::InsufficientStock { product, available } => {
                assert_eq!(product, "Goma");
                assert_eq!(available, 3);
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn exact_stock_is_allowed() {
        let a = Uuid::new_v4();
        let plan = plan_stock_deductions(&[line(a, 1)], &[row(a, "Regla", 1)]).unwrap();
        assert_eq!(plan[0].quantity, 1);
    }

    #[test]
    fn unknown_or_foreign_product_is_not_found() {
        let a = Uuid::new_v4();
        let err = plan_stock_deductions(&[line(a, 1)], &[]).unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(Resource::Product)));
    }
}
