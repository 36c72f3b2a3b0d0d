// src/common/db_utils.rs

// ---
// Classificação de erros do Postgres
// ---
// Os repositórios usam estes helpers dentro de `map_err` para transformar
// violações de constraint em erros de negócio (em vez de 500).

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

pub(crate) fn is_check_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_check_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
