// src/handlers/billing.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_positive},
    config::AppState,
    models::billing::{
        Installment, PaymentMethod, PlannedInstallment, ServiceRecord, ServiceWithInstallments,
    },
};

// ---
// Payload: criação de serviço com parcelamento
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "O nome do serviço é obrigatório."))]
    #[schema(example = "Transferência de Veículo")]
    pub service_name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    #[schema(example = "Documentação")]
    pub service_category: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "1200.00")]
    pub total_amount: Decimal,

    #[validate(range(min = 1, max = 12, message = "O número de parcelas deve estar entre 1 e 12."))]
    #[schema(example = 3)]
    pub installments: u32,

    /// Plano já ajustado na tela (métodos ou datas editados). Se ausente,
    /// o plano padrão é gerado no servidor.
    pub plan: Option<Vec<PlannedInstallment>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreated {
    pub service: ServiceRecord,
    pub installments: Vec<Installment>,
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Serviços",
    request_body = CreateServicePayload,
    responses(
        (status = 201, description = "Serviço e parcelas criados (transação única)", body = ServiceCreated),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (service, installments) = app_state
        .billing_service
        .criar_servico(
            payload.client_id,
            &payload.service_name,
            &payload.service_category,
            payload.total_amount,
            payload.installments,
            payload.plan,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ServiceCreated {
            service,
            installments,
        }),
    ))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListServicesQuery {
    /// Restringe aos serviços de um cliente
    pub client_id: Option<Uuid>,
}

// GET /api/services?client_id=
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Serviços",
    params(ListServicesQuery),
    responses(
        (status = 200, description = "Serviços com cliente e parcelas", body = Vec<ServiceWithInstallments>)
    )
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    Query(query): Query<ListServicesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let servicos = app_state
        .billing_service
        .listar_servicos(query.client_id)
        .await?;

    Ok((StatusCode::OK, Json(servicos)))
}

// ---
// Payload: prévia do plano (calculadora)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreviewPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "100.00")]
    pub total_amount: Decimal,

    #[validate(range(min = 1, max = 12, message = "O número de parcelas deve estar entre 1 e 12."))]
    #[schema(example = 3)]
    pub installments: u32,
}

// POST /api/services/plano
#[utoipa::path(
    post,
    path = "/api/services/plano",
    tag = "Serviços",
    request_body = PlanPreviewPayload,
    responses(
        (status = 200, description = "Plano gerado, nada persistido", body = Vec<PlannedInstallment>),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn preview_plan(
    State(app_state): State<AppState>,
    Json(payload): Json<PlanPreviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let plano = app_state
        .billing_service
        .previa_plano(payload.total_amount, payload.installments)?;

    Ok((StatusCode::OK, Json(plano)))
}

// ---
// Payload: pagamento de parcela
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayInstallmentPayload {
    #[schema(example = "pix")]
    pub payment_method: PaymentMethod,
}

// POST /api/installments/{id}/pay
#[utoipa::path(
    post,
    path = "/api/installments/{id}/pay",
    tag = "Serviços",
    params(("id" = Uuid, Path, description = "ID da parcela")),
    request_body = PayInstallmentPayload,
    responses(
        (status = 200, description = "Parcela quitada", body = Installment),
        (status = 404, description = "Parcela não encontrada")
    )
)]
pub async fn pay_installment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayInstallmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let parcela = app_state
        .billing_service
        .marcar_paga(id, payload.payment_method)
        .await?;

    Ok((StatusCode::OK, Json(parcela)))
}
