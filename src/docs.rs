// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::get_my_modules,

        // --- Stores ---
        handlers::stores::create_store,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::find_by_barcode,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Sales ---
        handlers::sales::process_sale,
        handlers::sales::sales_history,

        // --- Quotes ---
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::duplicate_quote,
        handlers::quotes::update_quote_status,
        handlers::quotes::convert_quote,
        handlers::quotes::delete_quote,

        // --- Documents ---
        handlers::documents::quote_pdf,
        handlers::documents::sale_pdf,

        // --- Admin ---
        handlers::admin::list_users,
        handlers::admin::approve_user,
        handlers::admin::reject_user,
        handlers::admin::suspend_user,
        handlers::admin::update_role,
        handlers::admin::update_permissions,
        handlers::admin::delete_user,
        handlers::admin::list_stores,
        handlers::admin::start_impersonation,
        handlers::admin::stop_impersonation,
    ),
    components(
        schemas(
            // --- Auth / Users ---
            models::auth::UserStatus,
            models::auth::User,
            models::context::Capabilities,
            handlers::users::MeResponse,
            handlers::health::Health,

            // --- Stores ---
            models::store::Store,
            models::store::StoreRole,
            models::store::StoreUser,
            models::store::Module,
            models::store::CreateStorePayload,
            models::store::StoreSettings,
            models::store::UpdateSettingsRequest,
            handlers::stores::StoreCreated,
            handlers::settings::SettingsSaved,

            // --- Products ---
            models::product::Product,
            models::product::ProductPayload,
            models::product::ProductSaved,

            // --- Sales ---
            models::sales::PaymentMethod,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleItemDetail,
            models::sales::SaleDetail,
            models::sales::SalesSummary,
            models::sales::SalesHistory,
            models::sales::LineItemInput,
            models::sales::ProcessSalePayload,
            models::sales::SaleCreated,

            // --- Quotes ---
            models::quote::QuoteStatus,
            models::quote::Quote,
            models::quote::QuoteItem,
            models::quote::QuoteSummary,
            models::quote::QuoteDetail,
            models::quote::CreateQuotePayload,
            models::quote::DuplicateQuotePayload,
            models::quote::UpdateQuoteStatusPayload,
            models::quote::QuoteSaved,
            models::quote::QuoteConverted,

            // --- Admin ---
            models::admin::UpdateRolePayload,
            models::admin::UpdatePermissionsPayload,
            models::admin::StartImpersonationPayload,
            models::admin::UserUpdated,
            models::admin::PermissionsUpdated,
            models::admin::Ack,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Users", description = "Usuário atual e módulos visíveis"),
        (name = "Stores", description = "Onboarding da primeira loja"),
        (name = "Settings", description = "Configurações da Loja"),
        (name = "Products", description = "Catálogo e estoque"),
        (name = "Sales", description = "Ponto de venda e histórico"),
        (name = "Quotes", description = "Cotações e conversão em venda"),
        (name = "Documents", description = "PDF de cotações e comprovantes"),
        (name = "Admin", description = "Aprovação de usuários, papéis e impersonação")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_pos_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/api/sales", "/api/quotes/{id}/convert", "/api/admin/impersonation", "/api/quotes/{id}/pdf"] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {path}");
        }
        assert!(doc.components.unwrap().security_schemes.contains_key("api_jwt"));
    }
}
