//! Data models for divvy entities.
//!
//! This module contains the structures used to represent bill-splitting
//! data as the backend sends it:
//!
//! - `User`: a group member's profile
//! - `Group`, `GroupMember`: expense-sharing groups
//! - `Transaction`, `SettleUpRequest`: expenses and settle-up payments
//! - `Category`, `Subcategory`: the expense category catalog
//! - `CalculateDebtResponse`, `DebtMember`: backend-computed debt netting

pub mod category;
pub mod debt;
pub mod group;
pub mod transaction;
pub mod user;

pub use category::{Category, Subcategory};
pub use debt::{CalculateDebtResponse, DebtMember};
pub use group::{Group, GroupMember};
pub use transaction::{SettleUpRequest, Transaction};
pub use user::User;
