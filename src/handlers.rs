pub mod billing;
pub mod catalog;
pub mod clients;
pub mod overdue;
pub mod reports;
