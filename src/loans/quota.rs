use super::domain::Frequency;

/// Annual interest rate applied to every computation, in percent. The legacy
/// service hard-coded this at the call site; kept as a named constant rather
/// than a request parameter until product decides otherwise.
pub const ANNUAL_RATE_PERCENT: f64 = 18.0;

/// Inputs the amortization formula cannot express.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum QuotaError {
    #[error("el plazo debe ser de al menos un mes, se recibió {0}")]
    InvalidTerm(i64),
    #[error("el monto debe ser positivo, se recibió {0}")]
    InvalidAmount(f64),
}

/// Periodic installment for a loan via the standard amortization formula.
///
/// `mensual` returns the monthly payment; `quincenal` returns half of it.
/// The result carries full float precision; two-decimal rounding happens at
/// presentation time only.
pub fn compute(
    amount: f64,
    annual_rate_percent: f64,
    term_months: i64,
    frequency: Frequency,
) -> Result<f64, QuotaError> {
    if term_months < 1 || term_months > i64::from(i32::MAX) {
        return Err(QuotaError::InvalidTerm(term_months));
    }
    if amount <= 0.0 {
        return Err(QuotaError::InvalidAmount(amount));
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let growth = (1.0 + monthly_rate).powi(term_months as i32);
    let monthly = amount * growth * monthly_rate / (growth - 1.0);
    if !monthly.is_finite() {
        return Err(QuotaError::InvalidTerm(term_months));
    }

    Ok(match frequency {
        Frequency::Mensual => monthly,
        Frequency::Quincenal => monthly / 2.0,
    })
}
