pub mod billing;
pub mod client;
pub mod report;
