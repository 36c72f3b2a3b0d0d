// src/services/quote_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{AppError, Resource},
        money::{checked_total, round_money},
    },
    db::{NewQuoteItem, ProductRepository, QuoteRepository},
    models::{
        context::RequestContext,
        quote::{
            ConversionPolicy, DuplicateQuotePayload, Quote, QuoteDetail, QuoteItem, QuoteStatus, QuoteSummary,
        },
        sales::{LineItemInput, PaymentMethod, Sale},
    },
    services::{sales_service::SalesService, view_cache::ViewCache},
};

/// Linhas de um orçamento convertidas em linhas de venda.
/// Uma linha cujo produto foi excluído não pode mais virar venda.
pub fn sale_lines_from_quote(items: &[QuoteItem]) -> Result<Vec<LineItemInput>, AppError> {
    items
        .iter()
        .map(|item| {
            let product_id = item.product_id.ok_or(AppError::ResourceNotFound(Resource::Product))?;
            Ok(LineItemInput {
                product_id,
                quantity: item.quantity,
                price: item.price,
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct QuoteService {
    quote_repo: QuoteRepository,
    product_repo: ProductRepository,
    sales_service: SalesService,
    cache: ViewCache,
    policy: ConversionPolicy,
    pool: PgPool,
}

impl QuoteService {
    pub fn new(
        quote_repo: QuoteRepository,
        product_repo: ProductRepository,
        sales_service: SalesService,
        cache: ViewCache,
        policy: ConversionPolicy,
        pool: PgPool,
    ) -> Self {
        Self {
            quote_repo,
            product_repo,
            sales_service,
            cache,
            policy,
            pool,
        }
    }

    // --- CRIAR ---
    /// Preços vêm do cliente (foto do momento); produtos precisam ser da loja.
    pub async fn create_quote(
        &self,
        ctx: &RequestContext,
        client_name: &str,
        lines: &[LineItemInput],
    ) -> Result<QuoteDetail, AppError> {
        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let mut tx = self.pool.begin().await?;

        // 1. Resolve os nomes (e a posse) dos produtos
        let mut ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        ids.sort();
        ids.dedup();
        let products = self.product_repo.find_stock_rows(&mut *tx, ctx.store_id, &ids).await?;

        let items = lines
            .iter()
            .map(|line| {
                let product = products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .ok_or(AppError::ResourceNotFound(Resource::Product))?;
                Ok(NewQuoteItem {
                    product_id: Some(product.id),
                    product_name: product.name.clone(),
                    quantity: line.quantity,
                    price: round_money(line.price),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        // 2. Grava
        let detail = self.insert_quote(&mut tx, ctx.store_id, client_name.trim(), &items).await?;
        tx.commit().await?;

        tracing::info!(store_id = %ctx.store_id, quote_id = %detail.quote.id, total = %detail.quote.total, "Orçamento criado");
        Ok(detail)
    }

    async fn insert_quote(
        &self,
        conn: &mut sqlx::PgConnection,
        store_id: Uuid,
        client_name: &str,
        items: &[NewQuoteItem],
    ) -> Result<QuoteDetail, AppError> {
        let total = checked_total(items.iter().map(|i| (i.price, i.quantity)))?;
        let quote = self.quote_repo.insert_quote(&mut *conn, store_id, client_name, total).await?;

        let mut saved = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position).map_err(anyhow::Error::from)?;
            saved.push(self.quote_repo.insert_item(&mut *conn, quote.id, position, item).await?);
        }

        Ok(QuoteDetail { quote, items: saved })
    }

    // --- CONSULTAS ---
    pub async fn list_quotes(&self, ctx: &RequestContext) -> Result<Vec<QuoteSummary>, AppError> {
        self.quote_repo.list_by_store(&self.pool, ctx.store_id).await
    }

    pub async fn get_quote(&self, ctx: &RequestContext, quote_id: Uuid) -> Result<QuoteDetail, AppError> {
        let quote = self.find_quote(ctx, quote_id).await?;
        let items = self.quote_repo.items(&self.pool, quote.id).await?;
        Ok(QuoteDetail { quote, items })
    }

    async fn find_quote(&self, ctx: &RequestContext, quote_id: Uuid) -> Result<Quote, AppError> {
        self.quote_repo
            .find_by_id(&self.pool, ctx.store_id, quote_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Quote))
    }

    // --- DUPLICAR ---
    /// Cópia independente em DRAFT, com as mesmas linhas e preços.
    pub async fn duplicate_quote(
        &self,
        ctx: &RequestContext,
        quote_id: Uuid,
        new_client_name: &str,
    ) -> Result<QuoteDetail, AppError> {
        DuplicateQuotePayload {
            client_name: new_client_name.to_string(),
        }
        .validate()?;
        let client_name = new_client_name.trim();

        let mut tx = self.pool.begin().await?;

        let source = self
            .quote_repo
            .find_by_id(&mut *tx, ctx.store_id, quote_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Quote))?;
        let source_items = self.quote_repo.items(&mut *tx, source.id).await?;

        let items: Vec<NewQuoteItem> = source_items
            .into_iter()
            .map(|item| NewQuoteItem {
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        let detail = self.insert_quote(&mut tx, ctx.store_id, client_name, &items).await?;
        tx.commit().await?;

        tracing::info!(
            store_id = %ctx.store_id,
            source_quote_id = %source.id,
            quote_id = %detail.quote.id,
            "Orçamento duplicado"
        );
        Ok(detail)
    }

    // --- STATUS ---
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        quote_id: Uuid,
        target: QuoteStatus,
    ) -> Result<Quote, AppError> {
        let mut tx = self.pool.begin().await?;

        let quote = self
            .quote_repo
            .lock_for_update(&mut *tx, ctx.store_id, quote_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Quote))?;

        quote.status.check_manual_transition(target)?;
        if quote.status == target {
            return Ok(quote);
        }

        let updated = self.quote_repo.set_status(&mut *tx, quote.id, target).await?;
        tx.commit().await?;

        tracing::info!(
            store_id = %ctx.store_id,
            quote_id = %quote.id,
            from = quote.status.as_str(),
            to = target.as_str(),
            "Status do orçamento alterado"
        );
        Ok(updated)
    }

    // --- CONVERTER EM VENDA ---
    /// Tudo numa transação: trava o orçamento, aplica a política, confere o
    /// estoque atual, grava a venda e marca CONVERTED. No máximo uma vez por orçamento.
    pub async fn convert_to_sale(
        &self,
        ctx: &RequestContext,
        quote_id: Uuid,
        payment_method: PaymentMethod,
    ) -> Result<Sale, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Trava o orçamento (conversões concorrentes esperam aqui)
        let quote = self
            .quote_repo
            .lock_for_update(&mut *tx, ctx.store_id, quote_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Quote))?;

        // 2. Status
        self.policy.check(quote.status)?;

        // 3. Venda (trava produtos, confere estoque, baixa)
        let items = self.quote_repo.items(&mut *tx, quote.id).await?;
        let lines = sale_lines_from_quote(&items)?;
        let sale = self
            .sales_service
            .record_sale_in_tx(&mut tx, ctx.store_id, &lines, payment_method, Some(quote.id))
            .await?;

        // 4. Estado terminal
        self.quote_repo
            .set_status(&mut *tx, quote.id, QuoteStatus::Converted)
            .await?;

        tx.commit().await?;

        self.cache.invalidate_store(ctx.store_id).await;
        tracing::info!(
            store_id = %ctx.store_id,
            quote_id = %quote.id,
            sale_id = %sale.id,
            total = %sale.total,
            "Orçamento convertido em venda"
        );
        Ok(sale)
    }

    // --- EXCLUIR ---
    pub async fn delete_quote(&self, ctx: &RequestContext, quote_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let quote = self
            .quote_repo
            .lock_for_update(&mut *tx, ctx.store_id, quote_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Quote))?;

        if quote.status == QuoteStatus::Converted {
            return Err(AppError::AlreadyConverted);
        }

        self.quote_repo.delete(&mut *tx, quote.id).await?;
        tx.commit().await?;

        tracing::info!(store_id = %ctx.store_id, quote_id = %quote.id, "Orçamento excluído");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(product_id: Option<Uuid>, position: i32) -> QuoteItem {
        QuoteItem {
            id: Uuid::new_v4(),
            quote_id: Uuid::nil(),
            product_id,
            product_name: "Cuaderno".into(),
            position,
            quantity: 2,
            price: Decimal::new(350050, 2),
        }
    }

    #[test]
    fn quote_lines_become_sale_lines_in_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let lines = sale_lines_from_quote(&[item(Some(a), 0), item(Some(b), 1)]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, a);
        assert_eq!(lines[1].product_id, b);
        assert_eq!(lines[0].price, Decimal::new(350050, 2));
    }

    #[test]
    fn deleted_product_blocks_conversion() {
        let err = sale_lines_from_quote(&[item(Some(Uuid::new_v4()), 0), item(None, 1)]).unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(Resource::Product)));
    }
}
