//! Core business logic - framework-agnostic expense, installment and settlement operations.
//!
//! Write operations take a `DatabaseConnection` and run in a single database
//! transaction. Aggregations in [`settlement`] are pure functions over a loaded
//! [`settlement::Ledger`].

/// Audit log writes and queries
pub mod audit;
/// Contributions, refunds and bulk settlement
pub mod contribution;
/// Expense creation, soft delete and lifecycle status
pub mod expense;
/// Installment generation, status derivation, reopen and manual edit
pub mod installment;
/// Household members and categories
pub mod member;
/// Exact decimal helpers for cent-denominated columns
pub mod money;
/// Per-member notice dismissal
pub mod notification;
/// Text formatting for reports
pub mod report;
/// Balances, debts, pending views and grouped totals
pub mod settlement;
