// src/handlers/catalog.rs
//
// Catálogo de serviços pré-definidos. CRUD puro, sem regra de negócio: o
// motor de cobrança recebe o item escolhido como entrada, não é dono do
// catálogo.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_positive},
    config::AppState,
    models::billing::CatalogItem,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Licenciamento Anual")]
    pub name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    #[schema(example = "Documentação")]
    pub category: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "350.00")]
    pub base_price: Decimal,
}

// POST /api/catalogo
#[utoipa::path(
    post,
    path = "/api/catalogo",
    tag = "Catálogo",
    request_body = CatalogItemPayload,
    responses(
        (status = 201, description = "Item criado", body = CatalogItem),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    Json(payload): Json<CatalogItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state
        .catalog_repo
        .create(&payload.name, &payload.category, payload.base_price)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/catalogo
#[utoipa::path(
    get,
    path = "/api/catalogo",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Itens do catálogo", body = Vec<CatalogItem>)
    )
)]
pub async fn list_items(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let itens = app_state.catalog_repo.get_all().await?;

    Ok((StatusCode::OK, Json(itens)))
}

// PUT /api/catalogo/{id}
#[utoipa::path(
    put,
    path = "/api/catalogo/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = CatalogItemPayload,
    responses(
        (status = 200, description = "Item atualizado", body = CatalogItem),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CatalogItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state
        .catalog_repo
        .update(id, &payload.name, &payload.category, payload.base_price)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/catalogo/{id}
#[utoipa::path(
    delete,
    path = "/api/catalogo/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
