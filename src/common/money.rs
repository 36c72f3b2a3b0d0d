// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::error::AppError;

/// Maior total que cabe em NUMERIC(12, 2).
// 999_999_999_999 centavos = 232 * 2^32 + 3_567_587_327
pub const MAX_TOTAL: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Arredonda para centavos (meio para longe do zero).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Total de um documento: Σ preço * quantidade, arredondado no fim.
/// O total enviado pelo cliente nunca é usado.
pub fn total_of<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let sum = lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, (price, qty)| acc + line_total(price, qty));
    round_money(sum)
}

/// Total de venda/orçamento a gravar; acima da coluna é erro de negócio, não 500.
pub fn checked_total<I>(lines: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let total = total_of(lines);
    if total > MAX_TOTAL {
        return Err(AppError::TotalTooLarge);
    }
    Ok(total)
}

/// Formata como "$15,000.00" (mesmo formato dos PDFs antigos).
pub fn format_money(value: Decimal) -> String {
    let rounded = round_money(value);
    let raw = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("10.004")), dec("10.00"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn total_is_sum_of_lines() {
        let total = total_of(vec![(dec("15000"), 2), (dec("800.50"), 3)]);
        assert_eq!(total, dec("32401.50"));
    }

    #[test]
    fn total_of_fractional_prices_is_rounded_once() {
        // 3 * 0.335 = 1.005 -> 1.01
        assert_eq!(total_of(vec![(dec("0.335"), 3)]), dec("1.01"));
        assert_eq!(total_of(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn total_above_column_limit_is_rejected() {
        assert_eq!(MAX_TOTAL, dec("9999999999.99"));
        assert_eq!(checked_total(vec![(dec("9999999999.99"), 1)]).unwrap(), MAX_TOTAL);
        // 100 unidades ao preço máximo aceito pela validação
        let over = checked_total(vec![(dec("999999999"), 100)]);
        assert!(matches!(over, Err(AppError::TotalTooLarge)));
    }

    #[test]
    fn formats_with_thousands_separator() {
        assert_eq!(format_money(dec("15000")), "$15,000.00");
        assert_eq!(format_money(dec("800.5")), "$800.50");
        assert_eq!(format_money(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_money(dec("0")), "$0.00");
        assert_eq!(format_money(dec("-42")), "-$42.00");
    }
}
