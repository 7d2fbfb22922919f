pub mod billing_repo;
pub mod catalog_repo;
pub mod client_repo;

pub use billing_repo::BillingRepository;
pub use catalog_repo::CatalogRepository;
pub use client_repo::ClientRepository;
