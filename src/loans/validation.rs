//! Per-field validation of the `POST /loan_cuota` payload.
//!
//! Every rule runs against the raw JSON value so a malformed field never masks
//! the others: all violations are collected into one map, keyed by the wire
//! field name, with Spanish messages. The whole pass is pure.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::domain::{Frequency, LoanApplication, Sector};

pub const AMOUNT_MIN: i64 = 100;
pub const AMOUNT_MAX: i64 = 2000;
pub const DEFAULT_PAY_TIME: i64 = 3;
pub const DEFAULT_FREQUENCY: Frequency = Frequency::Mensual;

/// Wire field name -> ordered, non-empty list of violation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn required(field: &str) -> String {
    format!("El campo {field} es obligatorio.")
}

fn must_be_string(field: &str) -> String {
    format!("El campo {field} debe ser una cadena de texto.")
}

fn must_be_integer(field: &str) -> String {
    format!("El campo {field} debe ser un número entero.")
}

fn push(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

/// Apply every rule to the raw payload and either hand back a fully-typed,
/// defaulted [`LoanApplication`] or the complete violation map.
///
/// A payload that is not a JSON object reports every required field as absent.
pub fn validate(payload: &Value) -> Result<LoanApplication, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = check_name(field(payload, "name"), &mut errors);
    let email = check_email(field(payload, "email"), &mut errors);
    let total_ingress = check_total_ingress(field(payload, "totalIngress"), &mut errors);
    let sector = check_sector(field(payload, "sector"), &mut errors);
    let work_years = check_work_years(field(payload, "workYears"), &mut errors);
    let amount = check_amount(field(payload, "amount"), &mut errors);
    let frequency = check_frequency(field(payload, "frecuency"), &mut errors);
    let pay_time = check_pay_time(field(payload, "payTime"), &mut errors);

    match (name, email, total_ingress, sector, work_years, amount, frequency, pay_time) {
        (
            Some(name),
            Some(email),
            Some(total_ingress),
            Some(sector),
            Some(work_years),
            Some(amount),
            Some(frequency),
            Some(pay_time),
        ) if errors.is_empty() => Ok(LoanApplication {
            name,
            email,
            total_ingress,
            sector,
            work_years,
            amount,
            frequency,
            pay_time,
        }),
        _ => Err(errors),
    }
}

/// JSON `null` counts the same as an absent field.
fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|value| !value.is_null())
}

fn check_name(value: Option<&Value>, errors: &mut FieldErrors) -> Option<String> {
    let Some(value) = value else {
        push(errors, "name", required("name"));
        return None;
    };
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        Some(_) => {
            push(errors, "name", required("name"));
            None
        }
        None => {
            push(errors, "name", must_be_string("name"));
            None
        }
    }
}

fn check_email(value: Option<&Value>, errors: &mut FieldErrors) -> Option<String> {
    let Some(value) = value else {
        push(errors, "email", required("email"));
        return None;
    };
    match value.as_str() {
        Some(text) if email_pattern().is_match(text) => Some(text.to_string()),
        Some(text) if text.is_empty() => {
            push(errors, "email", required("email"));
            None
        }
        Some(_) => {
            push(
                errors,
                "email",
                "El campo email debe ser una dirección de correo válida.".to_string(),
            );
            None
        }
        None => {
            push(errors, "email", must_be_string("email"));
            None
        }
    }
}

fn check_total_ingress(value: Option<&Value>, errors: &mut FieldErrors) -> Option<f64> {
    let Some(value) = value else {
        push(errors, "totalIngress", required("totalIngress"));
        return None;
    };
    match value.as_f64() {
        Some(number) => Some(number),
        None => {
            push(
                errors,
                "totalIngress",
                "El campo totalIngress debe ser numérico.".to_string(),
            );
            None
        }
    }
}

fn check_sector(value: Option<&Value>, errors: &mut FieldErrors) -> Option<Sector> {
    let Some(value) = value else {
        push(errors, "sector", required("sector"));
        return None;
    };
    match value.as_str() {
        // exact match, case-sensitive
        Some(text) => match Sector::parse(text) {
            Some(sector) => Some(sector),
            None => {
                push(
                    errors,
                    "sector",
                    "El campo sector debe ser publico o privado.".to_string(),
                );
                None
            }
        },
        None => {
            push(errors, "sector", must_be_string("sector"));
            None
        }
    }
}

fn check_work_years(value: Option<&Value>, errors: &mut FieldErrors) -> Option<i64> {
    let Some(value) = value else {
        push(errors, "workYears", required("workYears"));
        return None;
    };
    match value.as_i64() {
        Some(years) => Some(years),
        None => {
            push(errors, "workYears", must_be_integer("workYears"));
            None
        }
    }
}

fn check_amount(value: Option<&Value>, errors: &mut FieldErrors) -> Option<i64> {
    let Some(value) = value else {
        push(errors, "amount", required("amount"));
        return None;
    };
    let Some(amount) = value.as_i64() else {
        push(errors, "amount", must_be_integer("amount"));
        return None;
    };
    if amount < AMOUNT_MIN {
        push(
            errors,
            "amount",
            format!("El campo amount no debe ser menor que {AMOUNT_MIN}."),
        );
        return None;
    }
    if amount > AMOUNT_MAX {
        push(
            errors,
            "amount",
            format!("El campo amount no debe ser mayor que {AMOUNT_MAX}."),
        );
        return None;
    }
    Some(amount)
}

fn check_frequency(value: Option<&Value>, errors: &mut FieldErrors) -> Option<Frequency> {
    let Some(value) = value else {
        return Some(DEFAULT_FREQUENCY);
    };
    match value.as_str() {
        Some(text) => match Frequency::parse(text) {
            Some(frequency) => Some(frequency),
            None => {
                push(
                    errors,
                    "frecuency",
                    "El campo frecuency debe ser mensual o quincenal.".to_string(),
                );
                None
            }
        },
        None => {
            push(errors, "frecuency", must_be_string("frecuency"));
            None
        }
    }
}

fn check_pay_time(value: Option<&Value>, errors: &mut FieldErrors) -> Option<i64> {
    let Some(value) = value else {
        return Some(DEFAULT_PAY_TIME);
    };
    match value.as_i64() {
        Some(months) => Some(months),
        None => {
            push(errors, "payTime", must_be_integer("payTime"));
            None
        }
    }
}
