// src/services/document_service.rs

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use genpdf::{elements, style, Alignment, Element};
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::format_money},
    models::{quote::QuoteDetail, sales::SaleDetail, store::StoreSettings},
};

// Paleta padrão (lilás / rosa) quando a loja não configurou cores
const DEFAULT_PRIMARY: (u8, u8, u8) = (205, 180, 219);
const DEFAULT_SECONDARY: (u8, u8, u8) = (255, 200, 221);

/// "#rrggbb" -> (r, g, b).
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Folio impresso: 8 primeiros caracteres do id, em maiúsculas.
pub fn folio(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect::<String>().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Quote,
    SaleReceipt,
}

impl DocumentKind {
    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::Quote => "COTIZACIÓN",
            DocumentKind::SaleReceipt => "COMPROBANTE DE VENTA",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            DocumentKind::Quote => "cotizacion",
            DocumentKind::SaleReceipt => "venta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableLine {
    pub description: String,
    pub quantity: i32,
    pub unit_price: String,
    pub subtotal: String,
}

/// Tudo o que vai no papel, já resolvido e formatado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableDocument {
    pub kind: DocumentKind,
    pub folio: String,
    pub store_name: String,
    pub contact_lines: Vec<String>,
    pub client: Option<String>,
    pub date: String,
    pub payment: Option<String>,
    pub lines: Vec<PrintableLine>,
    pub total: String,
    pub footer: Option<String>,
    pub primary_color: (u8, u8, u8),
    pub secondary_color: (u8, u8, u8),
}

impl PrintableDocument {
    pub fn for_quote(detail: &QuoteDetail, settings: &StoreSettings) -> Self {
        let lines = detail
            .items
            .iter()
            .map(|item| printable_line(&item.product_name, item.quantity, item.price))
            .collect();

        Self {
            folio: folio(&detail.quote.id),
            client: Some(detail.quote.client_name.clone()),
            date: format_date(detail.quote.created_at),
            payment: None,
            lines,
            total: format_money(detail.quote.total),
            footer: Some(format!("Cotización válida por {} días.", settings.quote_validity_days)),
            ..Self::branded(DocumentKind::Quote, settings)
        }
    }

    pub fn for_sale(detail: &SaleDetail, settings: &StoreSettings) -> Self {
        let lines = detail
            .items
            .iter()
            .map(|item| printable_line(&item.product_name, item.quantity, item.price))
            .collect();

        Self {
            folio: folio(&detail.sale.id),
            date: format_date(detail.sale.created_at),
            payment: Some(detail.sale.payment_method.label().to_string()),
            lines,
            total: format_money(detail.sale.total),
            footer: Some("Gracias por su compra.".to_string()),
            ..Self::branded(DocumentKind::SaleReceipt, settings)
        }
    }

    // Cabeçalho e cores da loja
    fn branded(kind: DocumentKind, settings: &StoreSettings) -> Self {
        let contact_lines = [
            settings.contact_phone.as_deref().map(|v| format!("Tel: {v}")),
            settings.contact_email.as_deref().map(|v| format!("Email: {v}")),
            settings.address.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.trim().is_empty())
        .collect();

        let color = |value: &Option<String>, fallback| {
            value.as_deref().and_then(parse_hex_color).unwrap_or(fallback)
        };

        Self {
            kind,
            folio: String::new(),
            store_name: settings.name.clone(),
            contact_lines,
            client: None,
            date: String::new(),
            payment: None,
            lines: Vec::new(),
            total: format_money(rust_decimal::Decimal::ZERO),
            footer: None,
            primary_color: color(&settings.pdf_primary_color, DEFAULT_PRIMARY),
            secondary_color: color(&settings.pdf_secondary_color, DEFAULT_SECONDARY),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}.pdf", self.kind.file_prefix(), self.folio)
    }
}

fn printable_line(description: &str, quantity: i32, price: rust_decimal::Decimal) -> PrintableLine {
    PrintableLine {
        description: description.to_string(),
        quantity,
        unit_price: format_money(price),
        subtotal: format_money(crate::common::money::line_total(price, quantity)),
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

// ---
// Renderização (genpdf)
// ---
#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
        }
    }

    /// Renderiza fora do runtime async (genpdf é síncrono e pesado).
    pub async fn render(&self, document: PrintableDocument) -> Result<Vec<u8>, AppError> {
        let fonts_dir = self.fonts_dir.clone();
        tokio::task::spawn_blocking(move || render_pdf(&fonts_dir, &document))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de renderização do PDF: {e}"))?
    }
}

fn render_pdf(fonts_dir: &std::path::Path, document: &PrintableDocument) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, "Roboto", None)
        .map_err(|e| AppError::PdfError(format!("fonte Roboto não encontrada em {}: {e}", fonts_dir.display())))?;

    let (pr, pg, pb) = document.primary_color;
    let (sr, sg, sb) = document.secondary_color;
    let primary = style::Color::Rgb(pr, pg, pb);
    let secondary = style::Color::Rgb(sr, sg, sb);

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("{} {}", document.kind.title(), document.folio));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(
        elements::Paragraph::new(document.store_name.as_str())
            .styled(style::Style::new().bold().with_font_size(20).with_color(primary)),
    );
    for line in &document.contact_lines {
        doc.push(elements::Paragraph::new(line.as_str()).styled(style::Style::new().with_font_size(9)));
    }
    doc.push(elements::Break::new(1.5));
    doc.push(
        elements::Paragraph::new(document.kind.title())
            .styled(style::Style::new().bold().with_font_size(16).with_color(secondary)),
    );

    // --- DADOS ---
    if let Some(client) = &document.client {
        doc.push(elements::Paragraph::new(format!("Cliente: {client}")));
    }
    doc.push(elements::Paragraph::new(format!("Fecha: {}", document.date)));
    doc.push(elements::Paragraph::new(format!("Folio: #{}", document.folio)));
    if let Some(payment) = &document.payment {
        doc.push(elements::Paragraph::new(format!("Forma de pago: {payment}")));
    }
    doc.push(elements::Break::new(1.5));

    // --- TABELA ---
    let mut table = elements::TableLayout::new(vec![5, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let header_style = style::Style::new().bold().with_color(primary);
    table
        .row()
        .element(elements::Paragraph::new("Producto").styled(header_style))
        .element(elements::Paragraph::new("Cant.").styled(header_style))
        .element(elements::Paragraph::new("Precio Unit.").styled(header_style))
        .element(elements::Paragraph::new("Total").styled(header_style))
        .push()
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    for line in &document.lines {
        table
            .row()
            .element(elements::Paragraph::new(line.description.as_str()))
            .element(elements::Paragraph::new(line.quantity.to_string()))
            .element(elements::Paragraph::new(line.unit_price.as_str()).aligned(Alignment::Right))
            .element(elements::Paragraph::new(line.subtotal.as_str()).aligned(Alignment::Right))
            .push()
            .map_err(|e| AppError::PdfError(e.to_string()))?;
    }
    doc.push(table);
    doc.push(elements::Break::new(1.5));

    // --- TOTAL ---
    doc.push(
        elements::Paragraph::new(format!("TOTAL: {}", document.total))
            .aligned(Alignment::Right)
            .styled(style::Style::new().bold().with_font_size(14)),
    );

    // --- RODAPÉ ---
    if let Some(footer) = &document.footer {
        doc.push(elements::Break::new(2));
        doc.push(
            elements::Paragraph::new(footer.as_str())
                .aligned(Alignment::Center)
                .styled(style::Style::new().italic().with_font_size(8)),
        );
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(|e| AppError::PdfError(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        quote::{Quote, QuoteItem, QuoteStatus},
        sales::{PaymentMethod, Sale, SaleItemDetail},
    };
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn settings() -> StoreSettings {
        StoreSettings {
            store_id: Uuid::new_v4(),
            name: "Librería Agosto 7".into(),
            pdf_primary_color: Some("#18181b".into()),
            pdf_secondary_color: None,
            contact_phone: Some("(555) 123-4567".into()),
            contact_email: None,
            address: Some("Calle Principal #1234".into()),
            quote_validity_days: 30,
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 15, 30, 0).unwrap()
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#cdb4db"), Some((205, 180, 219)));
        assert_eq!(parse_hex_color("#FFC8DD"), Some((255, 200, 221)));
        assert_eq!(parse_hex_color("cdb4db"), None);
        assert_eq!(parse_hex_color("#cdb4d"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn folio_is_first_eight_chars_upper_case() {
        let id = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        assert_eq!(folio(&id), "A1B2C3D4");
    }

    #[test]
    fn quote_document_carries_lines_and_validity() {
        let quote_id = Uuid::parse_str("0f9e8d7c-1111-4000-8000-000000000000").unwrap();
        let detail = QuoteDetail {
            quote: Quote {
                id: quote_id,
                store_id: Uuid::new_v4(),
                client_name: "Colegio San Martín".into(),
                total: Decimal::new(3200000, 2),
                status: QuoteStatus::Draft,
                created_at: created_at(),
                updated_at: created_at(),
            },
            items: vec![QuoteItem {
                id: Uuid::new_v4(),
                quote_id,
                product_id: None,
                product_name: "Cuaderno Universitario".into(),
                position: 0,
                quantity: 4,
                price: Decimal::new(800000, 2),
            }],
        };

        let doc = PrintableDocument::for_quote(&detail, &settings());
        assert_eq!(doc.kind.title(), "COTIZACIÓN");
        assert_eq!(doc.folio, "0F9E8D7C");
        assert_eq!(doc.client.as_deref(), Some("Colegio San Martín"));
        assert_eq!(doc.date, "07/03/2025");
        assert_eq!(doc.lines[0].unit_price, "$8,000.00");
        assert_eq!(doc.lines[0].subtotal, "$32,000.00");
        assert_eq!(doc.total, "$32,000.00");
        assert_eq!(doc.footer.as_deref(), Some("Cotización válida por 30 días."));
        assert_eq!(doc.contact_lines, vec!["Tel: (555) 123-4567", "Calle Principal #1234"]);
        assert_eq!(doc.primary_color, (0x18, 0x18, 0x1b));
        assert_eq!(doc.secondary_color, DEFAULT_SECONDARY);
        assert_eq!(doc.file_name(), "cotizacion_0F9E8D7C.pdf");
    }

    #[test]
    fn sale_receipt_has_payment_and_no_client() {
        let sale_id = Uuid::new_v4();
        let detail = SaleDetail {
            sale: Sale {
                id: sale_id,
                store_id: Uuid::new_v4(),
                total: Decimal::new(1550, 2),
                payment_method: PaymentMethod::Card,
                quote_id: None,
                created_at: created_at(),
            },
            items: vec![SaleItemDetail {
                sale_id,
                product_id: Uuid::new_v4(),
                product_name: "Lápiz".into(),
                position: 0,
                quantity: 1,
                price: Decimal::new(1550, 2),
            }],
        };

        let doc = PrintableDocument::for_sale(&detail, &settings());
        assert_eq!(doc.kind, DocumentKind::SaleReceipt);
        assert_eq!(doc.kind.title(), "COMPROBANTE DE VENTA");
        assert!(doc.client.is_none());
        assert_eq!(doc.payment.as_deref(), Some("Tarjeta"));
        assert_eq!(doc.total, "$15.50");
    }

    #[tokio::test]
    async fn missing_fonts_is_a_pdf_error() {
        let service = DocumentService::new("/nonexistent/fonts");
        let doc = PrintableDocument::for_sale(
            &SaleDetail {
                sale: Sale {
                    id: Uuid::new_v4(),
                    store_id: Uuid::new_v4(),
                    total: Decimal::ZERO,
                    payment_method: PaymentMethod::Cash,
                    quote_id: None,
                    created_at: created_at(),
                },
                items: Vec::new(),
            },
            &settings(),
        );
        assert!(matches!(service.render(doc).await, Err(AppError::PdfError(_))));
    }
}
