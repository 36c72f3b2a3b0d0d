// src/handlers.rs

pub mod admin;
pub mod documents;
pub mod health;
pub mod products;
pub mod quotes;
pub mod sales;
pub mod settings;
pub mod stores;
pub mod users;

use crate::{config::AppState, middleware::i18n::Locale};

/// Mensagem de sucesso traduzida para o idioma do cliente.
pub(crate) fn ok_message(app_state: &AppState, locale: &Locale, key: &str, args: &[(&str, String)]) -> String {
    app_state.i18n_store.translate(&locale.0, key, args)
}
