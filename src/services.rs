pub mod billing_service;
pub mod client_service;
pub mod overdue_service;
pub mod report_service;

pub use billing_service::BillingService;
pub use client_service::ClientService;
pub use overdue_service::OverdueService;
pub use report_service::ReportService;
