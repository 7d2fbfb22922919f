// src/handlers/overdue.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::billing::{OverduePayment, ReminderMessage},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    /// Parcelas que passaram de `pending` para `overdue`
    #[schema(example = 4)]
    pub updated: u64,
}

// POST /api/overdue/sweep
#[utoipa::path(
    post,
    path = "/api/overdue/sweep",
    tag = "Cobrança",
    responses(
        (status = 200, description = "Varredura executada", body = SweepResult)
    )
)]
pub async fn sweep(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.overdue_service.varrer().await?;

    Ok((StatusCode::OK, Json(SweepResult { updated })))
}

// GET /api/overdue
//
// Roda a varredura antes de listar, como a tela de cobrança faz: a lista
// sempre reflete o estado do dia.
#[utoipa::path(
    get,
    path = "/api/overdue",
    tag = "Cobrança",
    responses(
        (status = 200, description = "Parcelas vencidas, por vencimento crescente", body = Vec<OverduePayment>)
    )
)]
pub async fn list_overdue(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.overdue_service.varrer().await?;
    let pagamentos = app_state.overdue_service.listar().await?;

    Ok((StatusCode::OK, Json(pagamentos)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemindersPayload {
    /// Parcelas vencidas selecionadas na tela
    pub installment_ids: Vec<Uuid>,

    /// Template customizado; sem ele, vale a mensagem padrão de cobrança
    pub message: Option<String>,
}

// POST /api/overdue/reminders
#[utoipa::path(
    post,
    path = "/api/overdue/reminders",
    tag = "Cobrança",
    request_body = RemindersPayload,
    responses(
        (status = 200, description = "Lembretes renderizados, um por parcela selecionada", body = Vec<ReminderMessage>),
        (status = 400, description = "Alguma parcela selecionada não está vencida ou não existe")
    )
)]
pub async fn prepare_reminders(
    State(app_state): State<AppState>,
    Json(payload): Json<RemindersPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lembretes = app_state
        .overdue_service
        .preparar_lembretes(&payload.installment_ids, payload.message.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(lembretes)))
}
