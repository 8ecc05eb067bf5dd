//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.
//!
//! Monetary columns hold integer cents; `crate::core::money` converts them to
//! exact decimals.

pub mod audit_log;
pub mod category;
pub mod contribution;
pub mod expense;
pub mod installment;
pub mod member;
pub mod notification_view;
pub mod refund;

// Re-export specific types to avoid conflicts
pub use audit_log::{
    AuditAction, Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel,
};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use contribution::{
    Column as ContributionColumn, Entity as Contribution, Model as ContributionModel,
};
pub use expense::{
    Column as ExpenseColumn, Entity as Expense, ExpenseStatus, Model as ExpenseModel, Priority,
};
pub use installment::{
    Column as InstallmentColumn, Entity as Installment, InstallmentStatus,
    Model as InstallmentModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use notification_view::{
    Column as NotificationViewColumn, Entity as NotificationView, Model as NotificationViewModel,
    NotificationKind,
};
pub use refund::{Column as RefundColumn, Entity as Refund, Model as RefundModel};
