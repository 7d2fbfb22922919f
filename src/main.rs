//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Cadastro e gestão de clientes
    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        );

    // Catálogo de serviços pré-definidos
    let catalog_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_item).get(handlers::catalog::list_items),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::catalog::update_item)
                .delete(handlers::catalog::delete_item),
        );

    // Serviços e parcelamento
    let service_routes = Router::new()
        .route(
            "/",
            post(handlers::billing::create_service).get(handlers::billing::list_services),
        )
        .route("/plano", post(handlers::billing::preview_plan));

    let installment_routes =
        Router::new().route("/{id}/pay", post(handlers::billing::pay_installment));

    // Cobrança de atrasados
    let overdue_routes = Router::new()
        .route("/", get(handlers::overdue::list_overdue))
        .route("/sweep", post(handlers::overdue::sweep))
        .route("/reminders", post(handlers::overdue::prepare_reminders));

    // Relatórios e painel
    let report_routes = Router::new()
        .route("/", get(handlers::reports::get_report))
        .route("/dashboard", get(handlers::reports::get_dashboard));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clients", client_routes)
        .nest("/api/catalogo", catalog_routes)
        .nest("/api/services", service_routes)
        .nest("/api/installments", installment_routes)
        .nest("/api/overdue", overdue_routes)
        .nest("/api/reports", report_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
