//! Loan application intake: validation rules, the amortization calculator,
//! and the HTTP endpoints that tie them together.

pub mod domain;
pub mod quota;
pub mod router;
pub mod validation;

pub use domain::{Frequency, LoanApplication, QuotaResponse, Sector};
pub use router::{loan_router, LoanState};
