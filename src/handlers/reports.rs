// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::report::{DashboardStats, ReportData},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Início do período (inclusivo), AAAA-MM-DD
    pub start_date: NaiveDate,
    /// Fim do período (inclusivo), AAAA-MM-DD
    pub end_date: NaiveDate,
}

// GET /api/reports?start_date=&end_date=
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Resumo consolidado do período", body = ReportData)
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = app_state
        .report_service
        .relatorio(query.start_date, query.end_date)
        .await?;

    Ok((StatusCode::OK, Json(relatorio)))
}

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Números do painel inicial", body = DashboardStats)
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let painel = app_state.report_service.painel().await?;

    Ok((StatusCode::OK, Json(painel)))
}
