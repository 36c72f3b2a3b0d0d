// src/common/i18n.rs

use std::{collections::HashMap, sync::LazyLock};

pub const DEFAULT_LANG: &str = "es";

// (chave, es, pt, en)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    // --- Erros ---
    ("error.unauthorized", "No autorizado.", "Não autorizado.", "Unauthorized."),
    (
        "error.invalid_token",
        "Token de autenticación inválido o ausente.",
        "Token de autenticação inválido ou ausente.",
        "Missing or invalid authentication token.",
    ),
    (
        "error.account_not_approved",
        "Tu cuenta todavía no fue aprobada por un administrador.",
        "Sua conta ainda não foi aprovada por um administrador.",
        "Your account has not been approved by an administrator yet.",
    ),
    (
        "error.forbidden",
        "No tienes permisos de administrador.",
        "Você não tem permissões de administrador.",
        "Administrator permissions required.",
    ),
    (
        "error.no_store_assigned",
        "No se encontró una tienda para este usuario.",
        "Nenhuma loja encontrada para este usuário.",
        "No store found for this user.",
    ),
    ("error.not_found", "{resource} no encontrado.", "{resource} não encontrado.", "{resource} not found."),
    (
        "error.insufficient_stock",
        "Stock insuficiente para '{product}'. Disponible: {available}",
        "Estoque insuficiente para '{product}'. Disponível: {available}",
        "Insufficient stock for '{product}'. Available: {available}",
    ),
    (
        "error.duplicate_barcode",
        "El código de barras '{barcode}' ya existe en esta tienda.",
        "O código de barras '{barcode}' já existe nesta loja.",
        "Barcode '{barcode}' already exists in this store.",
    ),
    (
        "error.already_converted",
        "La cotización ya fue convertida en venta.",
        "O orçamento já foi convertido em venda.",
        "Quote already converted.",
    ),
    (
        "error.quote_not_approved",
        "La cotización debe estar aprobada antes de convertirla.",
        "O orçamento precisa estar aprovado antes da conversão.",
        "The quote must be approved before conversion.",
    ),
    (
        "error.invalid_status_transition",
        "No se puede cambiar el estado de {from} a {to}.",
        "Não é possível mudar o status de {from} para {to}.",
        "Cannot change status from {from} to {to}.",
    ),
    (
        "error.foreign_key_constraint",
        "No se puede eliminar: el producto tiene ventas asociadas.",
        "Não é possível excluir: o produto possui vendas associadas.",
        "Cannot delete: the product has associated sales.",
    ),
    (
        "error.store_already_exists",
        "Ya tienes una tienda creada.",
        "Você já possui uma loja criada.",
        "You already have a store.",
    ),
    (
        "error.empty_cart",
        "El carrito está vacío.",
        "O carrinho está vazio.",
        "The cart is empty.",
    ),
    (
        "error.total_too_large",
        "El total supera el máximo permitido (9.999.999.999,99).",
        "O total excede o máximo permitido (9.999.999.999,99).",
        "The total exceeds the maximum allowed (9,999,999,999.99).",
    ),
    (
        "error.validation",
        "Uno o más campos son inválidos.",
        "Um ou mais campos são inválidos.",
        "One or more fields are invalid.",
    ),
    (
        "error.pdf",
        "No se pudo generar el PDF.",
        "Não foi possível gerar o PDF.",
        "Could not generate the PDF.",
    ),
    (
        "error.internal",
        "Ocurrió un error inesperado.",
        "Ocorreu um erro inesperado.",
        "An unexpected error occurred.",
    ),
    // --- Recursos ---
    ("resource.product", "Producto", "Produto", "Product"),
    ("resource.quote", "Cotización", "Orçamento", "Quote"),
    ("resource.sale", "Venta", "Venda", "Sale"),
    ("resource.store", "Tienda", "Loja", "Store"),
    ("resource.user", "Usuario", "Usuário", "User"),
    // --- Sucesso ---
    ("ok.sale_registered", "Venta registrada exitosamente.", "Venda registrada com sucesso.", "Sale registered."),
    ("ok.quote_created", "Cotización creada.", "Orçamento criado.", "Quote created."),
    (
        "ok.quote_converted",
        "Cotización convertida en venta exitosamente.",
        "Orçamento convertido em venda com sucesso.",
        "Quote converted to sale.",
    ),
    ("ok.quote_duplicated", "Cotización duplicada.", "Orçamento duplicado.", "Quote duplicated."),
    ("ok.quote_deleted", "Cotización eliminada.", "Orçamento excluído.", "Quote deleted."),
    ("ok.status_updated", "Estado actualizado.", "Status atualizado.", "Status updated."),
    ("ok.product_created", "Producto '{name}' agregado exitosamente.", "Produto '{name}' adicionado.", "Product '{name}' added."),
    ("ok.product_updated", "Producto actualizado.", "Produto atualizado.", "Product updated."),
    ("ok.product_deleted", "Producto eliminado.", "Produto excluído.", "Product deleted."),
    ("ok.store_created", "Tienda creada exitosamente.", "Loja criada com sucesso.", "Store created."),
    ("ok.user_approved", "Usuario aprobado.", "Usuário aprovado.", "User approved."),
    ("ok.user_rejected", "Usuario rechazado.", "Usuário rejeitado.", "User rejected."),
    ("ok.user_suspended", "Usuario suspendido.", "Usuário suspenso.", "User suspended."),
    ("ok.user_deleted", "Usuario eliminado.", "Usuário excluído.", "User deleted."),
    ("ok.role_updated", "Rol actualizado.", "Papel atualizado.", "Role updated."),
    ("ok.settings_updated", "Configuración guardada.", "Configurações salvas.", "Settings saved."),
    (
        "ok.impersonation_started",
        "Ahora estás operando la tienda '{store}'.",
        "Agora você está operando a loja '{store}'.",
        "You are now operating store '{store}'.",
    ),
    ("ok.impersonation_stopped", "Impersonación finalizada.", "Impersonação encerrada.", "Impersonation ended."),
    ("ok.permissions_updated", "Permisos actualizados.", "Permissões atualizadas.", "Permissions updated."),
];

const LANGS: [&str; 3] = ["es", "pt", "en"];

static SHARED: LazyLock<I18nStore> = LazyLock::new(I18nStore::new);

/// Catálogo de mensagens por idioma.
#[derive(Debug)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
        for &(key, es, pt, en) in CATALOG {
            for (lang, text) in LANGS.into_iter().zip([es, pt, en]) {
                catalogs.entry(lang).or_default().insert(key, text);
            }
        }
        Self { catalogs }
    }

    /// Instância global, usada quando não há `AppState` (ex: rejeição de extrator).
    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    /// Traduz `key` substituindo `{nome}` pelos argumentos.
    /// Idioma desconhecido cai no espanhol; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_exists_in_every_language() {
        let store = I18nStore::new();
        for (key, ..) in CATALOG {
            for lang in LANGS {
                assert_ne!(store.translate(lang, key, &[]), *key, "{lang}:{key}");
            }
        }
    }

    #[test]
    fn substitutes_arguments() {
        let store = I18nStore::new();
        let msg = store.translate(
            "es",
            "error.insufficient_stock",
            &[("product", "Lapicera Azul".into()), ("available", "3".into())],
        );
        assert_eq!(msg, "Stock insuficiente para 'Lapicera Azul'. Disponible: 3");
    }

    #[test]
    fn unknown_language_falls_back_to_spanish() {
        let store = I18nStore::new();
        assert!(!store.supports("fr"));
        assert_eq!(store.translate("fr", "error.unauthorized", &[]), "No autorizado.");
    }
}
