// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Teto de preço unitário; o total da venda é conferido à parte
const MAX_MONEY: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

/// Valores monetários: não negativos e até `MAX_MONEY`.
pub fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    if *val > MAX_MONEY {
        let mut err = ValidationError::new("range");
        err.message = Some("El valor es demasiado grande.".into());
        return Err(err);
    }
    Ok(())
}

/// Rejeita textos que só têm espaços (o `length` do validator aceita "   ").
pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("El campo es obligatorio.".into());
        return Err(err);
    }
    Ok(())
}

/// Cores de marca do PDF: `#rrggbb`.
pub fn validate_hex_color(val: &str) -> Result<(), ValidationError> {
    if crate::services::document_service::parse_hex_color(val).is_none() {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color inválido, use el formato #rrggbb.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn money_must_fit_the_column() {
        assert!(validate_money(&dec("-0.01")).is_err());
        assert!(validate_money(&dec("0")).is_ok());
        assert!(validate_money(&dec("10.50")).is_ok());
        assert!(validate_money(&dec("999999999")).is_ok());
        assert!(validate_money(&dec("1000000000")).is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" Ana ").is_ok());
    }

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#18181b").is_ok());
        assert!(validate_hex_color("18181b").is_err());
        assert!(validate_hex_color("#zzzzzz").is_err());
    }
}
