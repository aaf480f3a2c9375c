use serde::Serialize;
use std::fmt;

/// Payment frequency for a loan quota. The wire values are Spanish and
/// case-sensitive, matching the legacy API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Mensual,
    Quincenal,
}

impl Frequency {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mensual" => Some(Self::Mensual),
            "quincenal" => Some(Self::Quincenal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mensual => "mensual",
            Self::Quincenal => "quincenal",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment sector declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Publico,
    Privado,
}

impl Sector {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "publico" => Some(Self::Publico),
            "privado" => Some(Self::Privado),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publico => "publico",
            Self::Privado => "privado",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loan application that passed every validation rule, with the optional
/// fields already defaulted. Nothing outlives the request that carried it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplication {
    pub name: String,
    pub email: String,
    pub total_ingress: f64,
    pub sector: Sector,
    pub work_years: i64,
    pub amount: i64,
    pub frequency: Frequency,
    pub pay_time: i64,
}

/// Success body for `POST /loan_cuota`. Key spelling (`frecuency`, `paytime`)
/// is preserved from the legacy API so existing clients keep working.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaResponse {
    pub amount: String,
    pub text: String,
    pub frecuency: String,
    pub paytime: String,
}

impl QuotaResponse {
    pub fn build(application: &LoanApplication, quota: f64) -> Self {
        Self {
            amount: format!("${}.", application.amount),
            text: format!(
                "La cuota sería ${quota:.2} {} durante {} meses.",
                application.frequency, application.pay_time
            ),
            frecuency: application.frequency.as_str().to_string(),
            paytime: format!("{} meses.", application.pay_time),
        }
    }
}
