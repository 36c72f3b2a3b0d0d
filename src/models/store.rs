// src/models/store.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_hex_color, validate_not_blank};

// ---
// 1. Store (a "Loja" / tenant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    #[schema(example = "Librería Central")]
    pub name: String,
    #[schema(example = "libreria-central-4821")]
    pub slug: String,
    #[schema(example = "#cdb4db")]
    pub pdf_primary_color: Option<String>,
    #[schema(example = "#ffc8dd")]
    pub pdf_secondary_color: Option<String>,
    #[schema(example = "(555) 123-4567")]
    pub contact_phone: Option<String>,
    #[schema(example = "contacto@libreria.com")]
    pub contact_email: Option<String>,
    #[schema(example = "Calle Principal #1234")]
    pub address: Option<String>,
    #[schema(example = 15)]
    pub quote_validity_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "store_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreRole {
    Owner,
    Manager,
    Cashier,
}

// ---
// 2. StoreUser (ponte Usuário-Loja)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreUser {
    pub id: Uuid,
    pub user_id: String,
    pub store_id: Uuid,
    pub role: StoreRole,
    #[schema(example = json!(["sales", "inventory", "history", "quotes"]))]
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. Módulos do painel
// ---
// As permissões só controlam a visibilidade dos módulos, nunca o acesso aos dados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Sales,
    Inventory,
    History,
    Quotes,
}

impl Module {
    pub const ALL: [Module; 4] = [Module::Sales, Module::Inventory, Module::History, Module::Quotes];

    pub fn tag(self) -> &'static str {
        match self {
            Module::Sales => "sales",
            Module::Inventory => "inventory",
            Module::History => "history",
            Module::Quotes => "quotes",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Module::ALL.into_iter().find(|m| m.tag() == tag.trim())
    }

    /// Tags desconhecidas são ignoradas; a ordem segue `ALL`.
    pub fn parse_all<S: AsRef<str>>(tags: &[S]) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|m| tags.iter().any(|t| Module::from_tag(t.as_ref()) == Some(*m)))
            .collect()
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorePayload {
    #[validate(
        length(min = 1, max = 80, message = "El nombre de la tienda es obligatorio."),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Librería Agosto 7")]
    pub name: String,
}

// Dados de marca usados nos PDFs
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub store_id: Uuid,
    pub name: String,
    pub pdf_primary_color: Option<String>,
    pub pdf_secondary_color: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub address: Option<String>,
    pub quote_validity_days: i32,
}

impl From<Store> for StoreSettings {
    fn from(store: Store) -> Self {
        Self {
            store_id: store.id,
            name: store.name,
            pdf_primary_color: store.pdf_primary_color,
            pdf_secondary_color: store.pdf_secondary_color,
            contact_phone: store.contact_phone,
            contact_email: store.contact_email,
            address: store.address,
            quote_validity_days: store.quote_validity_days,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 80), custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    #[schema(example = "#18181b")]
    pub pdf_primary_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    #[schema(example = "#27272a")]
    pub pdf_secondary_color: Option<String>,

    pub contact_phone: Option<String>,

    #[validate(email(message = "Email inválido."))]
    pub contact_email: Option<String>,

    pub address: Option<String>,

    #[validate(range(min = 1, max = 365))]
    pub quote_validity_days: Option<i32>,
}

/// Slug a partir do nome: minúsculas, espaços viram "-", resto fora de [a-z0-9-] some.
/// O sufixo garante unicidade entre lojas com o mesmo nome.
pub fn slugify(name: &str, suffix: &str) -> String {
    let mut slug = String::with_capacity(name.len() + suffix.len() + 1);
    let mut last_was_dash = false;
    for ch in name.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            if !last_was_dash {
                slug.push('-');
                last_was_dash = true;
            }
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
            last_was_dash = ch == '-';
        }
    }
    let base = slug.trim_matches('-');
    if base.is_empty() {
        format!("tienda-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_drops_accents_and_symbols() {
        assert_eq!(slugify("Librería Agosto 7", "123"), "librera-agosto-7-123");
        assert_eq!(slugify("  Mi   Tienda!! ", "9"), "mi-tienda-9");
        assert_eq!(slugify("¡¡¡", "1"), "tienda-1");
    }

    #[test]
    fn modules_parse_known_tags_only() {
        let modules = Module::parse_all(&["quotes", "sales", "admin", " history "]);
        assert_eq!(modules, vec![Module::Sales, Module::History, Module::Quotes]);
        assert!(Module::parse_all::<&str>(&[]).is_empty());
    }

    #[test]
    fn settings_validation() {
        let bad = UpdateSettingsRequest {
            name: None,
            pdf_primary_color: Some("red".into()),
            pdf_secondary_color: None,
            contact_phone: None,
            contact_email: Some("not-an-email".into()),
            address: None,
            quote_validity_days: Some(0),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("pdf_primary_color"));
        assert!(fields.contains_key("contact_email"));
        assert!(fields.contains_key("quote_validity_days"));
    }
}
