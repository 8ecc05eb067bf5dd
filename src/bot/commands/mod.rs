//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Expense management commands
pub mod expense;

/// General utility commands
pub mod general;

/// Payment, settlement and installment commands
pub mod payment;

/// Balance, debt and notification reports
pub mod report;

// Export commands
pub use expense::*;
pub use general::*;
pub use payment::*;
pub use report::*;
