//! Unified error type for Expense Buddy.
//!
//! Validation errors are raised before any write is attempted and carry the
//! offending values so the bot layer can explain them. Everything else is a
//! backend or infrastructure failure.

use rust_decimal::Decimal;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable explanation
        message: String,
    },

    /// A value failed validation (empty title, unknown priority, ...)
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable explanation
        message: String,
    },

    /// Amount is zero, negative, or has sub-cent precision
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Installment count below one
    #[error("Invalid installment count: {count} (must be at least 1)")]
    InvalidInstallmentCount {
        /// The rejected count
        count: i64,
    },

    /// Downpayment larger than the expense total
    #[error("Downpayment {downpayment} exceeds total amount {total}")]
    DownpaymentExceedsTotal {
        /// Requested downpayment
        downpayment: Decimal,
        /// Expense total
        total: Decimal,
    },

    /// A reason text is shorter than the required minimum
    #[error("Reason must be at least {min} characters (got {actual})")]
    ReasonTooShort {
        /// Minimum number of characters
        min: usize,
        /// Characters supplied, after trimming
        actual: usize,
    },

    /// Expense missing or soft-deleted
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Expense identifier
        id: i64,
    },

    /// Installment missing or belongs to a soft-deleted expense
    #[error("Installment not found: {id}")]
    InstallmentNotFound {
        /// Installment identifier
        id: i64,
    },

    /// Contribution missing
    #[error("Contribution not found: {id}")]
    ContributionNotFound {
        /// Contribution identifier
        id: i64,
    },

    /// Category missing
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Category name or id
        name: String,
    },

    /// Member missing from the household
    #[error("Member not found: {id}")]
    MemberNotFound {
        /// Member identifier
        id: String,
    },

    /// Reopen attempted on an installment that is not paid
    #[error("Installment {id} cannot be reopened while {status}")]
    InstallmentNotPaid {
        /// Installment identifier
        id: i64,
        /// Current status
        status: String,
    },

    /// The household has no members to split between
    #[error("No members configured")]
    NoMembers,

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting failure while building a message
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Integer conversion failure
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Returns true for input problems the member can fix directly.
    ///
    /// Everything else (database, I/O, Discord) is surfaced as a retry prompt.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidInstallmentCount { .. }
                | Self::DownpaymentExceedsTotal { .. }
                | Self::ReasonTooShort { .. }
                | Self::ExpenseNotFound { .. }
                | Self::InstallmentNotFound { .. }
                | Self::ContributionNotFound { .. }
                | Self::CategoryNotFound { .. }
                | Self::MemberNotFound { .. }
                | Self::InstallmentNotPaid { .. }
                | Self::NoMembers
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
