//! Installment ("parcela") schedule computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Longest schedule the calculator will produce (30 years of monthly payments).
pub const MAX_INSTALLMENTS: i32 = 360;

/// One entry of an installment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Installment {
    /// Position in the schedule, starting at 1
    #[schema(example = 1)]
    pub sequence: u32,
    /// Amount due for this installment, unrounded
    #[schema(value_type = String, example = "100")]
    pub amount: Decimal,
}

/// Computes a flat installment schedule.
///
/// The rate factor multiplies the whole principal once and the product is
/// split evenly: every entry carries `(total * rate) / count`. Amounts are
/// not rounded to currency precision.
pub fn compute_schedule(
    total: Decimal,
    rate: Decimal,
    count: i32,
) -> Result<Vec<Installment>, DomainError> {
    if total < Decimal::ZERO {
        return Err(DomainError::NegativeArgument("total"));
    }
    if rate < Decimal::ZERO {
        return Err(DomainError::NegativeArgument("interest_rate"));
    }
    if count < 0 {
        return Err(DomainError::NegativeArgument("installments"));
    }
    if count == 0 {
        return Err(DomainError::DivisionByZero);
    }
    if count > MAX_INSTALLMENTS {
        return Err(DomainError::TooManyInstallments {
            max: MAX_INSTALLMENTS,
            got: count,
        });
    }

    let product = total
        .checked_mul(rate)
        .ok_or(DomainError::Overflow("total * interest_rate"))?;
    let amount = product
        .checked_div(Decimal::from(count))
        .ok_or(DomainError::DivisionByZero)?;

    Ok((1..=count as u32)
        .map(|sequence| Installment { sequence, amount })
        .collect())
}
