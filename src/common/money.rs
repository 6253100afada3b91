// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::error::AppError;

/// Casas decimais de todos os campos monetários (NUMERIC(15,2)).
pub const MONEY_SCALE: u32 = 2;

/// Arredonda para 2 casas (meio para longe do zero) e fixa a escala.
pub fn normalize(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

pub fn normalize_opt(value: Option<Decimal>) -> Option<Decimal> {
    value.map(normalize)
}

/// As checagens valem sobre o valor já arredondado, que é o que vai ser gravado.
pub fn ensure_not_negative(field: &str, value: Decimal) -> Result<(), AppError> {
    let value = normalize(value);
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!("O campo '{field}' não pode ser negativo.")));
    }
    Ok(())
}

pub fn ensure_positive(field: &str, value: Decimal) -> Result<(), AppError> {
    if normalize(value) <= Decimal::ZERO {
        return Err(AppError::validation(format!("O campo '{field}' deve ser maior que zero.")));
    }
    Ok(())
}
