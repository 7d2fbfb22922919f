// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Catálogo ---
        handlers::catalog::create_item,
        handlers::catalog::list_items,
        handlers::catalog::update_item,
        handlers::catalog::delete_item,

        // --- Serviços / Parcelas ---
        handlers::billing::create_service,
        handlers::billing::list_services,
        handlers::billing::preview_plan,
        handlers::billing::pay_installment,

        // --- Cobrança ---
        handlers::overdue::sweep,
        handlers::overdue::list_overdue,
        handlers::overdue::prepare_reminders,

        // --- Relatórios ---
        handlers::reports::get_report,
        handlers::reports::get_dashboard,
    ),
    components(
        schemas(
            models::client::Client,
            models::client::ClientView,
            models::billing::ServiceStatus,
            models::billing::InstallmentStatus,
            models::billing::PaymentMethod,
            models::billing::ServiceRecord,
            models::billing::Installment,
            models::billing::ServiceWithInstallments,
            models::billing::CatalogItem,
            models::billing::PlannedInstallment,
            models::billing::OverdueSeverity,
            models::billing::OverduePayment,
            models::billing::ReminderMessage,
            models::report::MonthlyRevenuePoint,
            models::report::ReportData,
            models::report::DashboardStats,
            handlers::clients::ClientPayload,
            handlers::catalog::CatalogItemPayload,
            handlers::billing::CreateServicePayload,
            handlers::billing::ServiceCreated,
            handlers::billing::PlanPreviewPayload,
            handlers::billing::PayInstallmentPayload,
            handlers::overdue::SweepResult,
            handlers::overdue::RemindersPayload,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro e gestão de clientes"),
        (name = "Catálogo", description = "Serviços pré-definidos"),
        (name = "Serviços", description = "Serviços, parcelamento e pagamentos"),
        (name = "Cobrança", description = "Parcelas vencidas e lembretes"),
        (name = "Relatórios", description = "Relatórios e painel")
    )
)]
pub struct ApiDoc;
