// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{BillingRepository, CatalogRepository, ClientRepository},
    services::{BillingService, ClientService, OverdueService, ReportService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub client_service: ClientService,
    pub billing_service: BillingService,
    pub overdue_service: OverdueService,
    pub report_service: ReportService,
    // Catálogo é CRUD puro de configuração; o repositório basta
    pub catalog_repo: CatalogRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let client_repo = ClientRepository::new(db_pool.clone());
        let billing_repo = BillingRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());

        let client_service = ClientService::new(client_repo.clone());
        let billing_service = BillingService::new(billing_repo.clone(), client_repo.clone());
        let overdue_service = OverdueService::new(billing_repo.clone());
        let report_service = ReportService::new(billing_repo, client_repo);

        Ok(Self {
            db_pool,
            client_service,
            billing_service,
            overdue_service,
            report_service,
            catalog_repo,
        })
    }
}
