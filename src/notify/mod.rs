//! Outbound notification seam. The HTTP handler only depends on the
//! [`Notifier`] capability; the SMTP transport lives behind it.

mod smtp;

pub use smtp::{LogNotifier, SmtpNotifier};

use async_trait::async_trait;

use crate::loans::domain::LoanApplication;

pub const NOTIFICATION_SUBJECT: &str = "Solicitud de nuevo crédito";

/// A rendered notification ready to hand to a transport. Sender and
/// recipient are transport configuration, not message data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanNotification {
    pub subject: String,
    pub html_body: String,
}

/// Notification dispatch failure. Logged by the spawned task, never
/// surfaced to the HTTP caller.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("dirección de correo inválida: {0}")]
    Address(String),
    #[error("el mensaje no pudo construirse: {0}")]
    Message(String),
    #[error("fallo del transporte smtp: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: LoanNotification) -> Result<(), NotifyError>;
}

/// Render the applicant summary email for one validated application.
///
/// Built fresh per request as a local value; nothing is shared between
/// concurrent submissions.
pub fn notification_for(application: &LoanApplication, quota: f64) -> LoanNotification {
    let html_body = format!(
        "<h1>User Information</h1>\n\
         <ul>\n\
             <li>Name: {}</li>\n\
             <li>Email: {}</li>\n\
             <li>Total Ingress: {}</li>\n\
             <li>Sector: {}</li>\n\
             <li>Work Years: {}</li>\n\
             <li>Amount: {}</li>\n\
             <li>Frecuency: {}</li>\n\
             <li>Pay Time: {}</li>\n\
             <li>Loan Cuota: {quota:.2}</li>\n\
         </ul>",
        application.name,
        application.email,
        application.total_ingress,
        application.sector,
        application.work_years,
        application.amount,
        application.frequency,
        application.pay_time,
    );

    LoanNotification {
        subject: NOTIFICATION_SUBJECT.to_string(),
        html_body,
    }
}
