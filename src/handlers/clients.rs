// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_cpf_field},
    config::AppState,
    models::client::ClientView,
    services::client_service::ClientInput,
};

// ---
// Payload: cadastro e edição de cliente
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 2, message = "O nome deve ter pelo menos 2 caracteres."))]
    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[validate(length(min = 7, message = "O RG deve ter pelo menos 7 caracteres."))]
    #[schema(example = "12.345.678-9")]
    pub rg: String,

    // Aceita com ou sem máscara; os dígitos verificadores são conferidos
    #[validate(custom(function = "validate_cpf_field"))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    #[validate(length(min = 10, message = "O telefone deve ser válido."))]
    #[schema(example = "(11) 98765-4321")]
    pub phone: String,

    #[validate(email(message = "O e-mail deve ser válido."))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 10, message = "O endereço deve ser completo."))]
    #[schema(example = "Rua das Flores, 123 - Centro, São Paulo/SP")]
    pub address: String,

    #[schema(example = "01310-100")]
    pub zip_code: Option<String>,
}

impl From<ClientPayload> for ClientInput {
    fn from(p: ClientPayload) -> Self {
        ClientInput {
            full_name: p.full_name,
            rg: p.rg,
            cpf: p.cpf,
            phone: p.phone,
            email: p.email,
            address: p.address,
            zip_code: p.zip_code,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListClientsQuery {
    /// Busca por nome, CPF, telefone ou e-mail
    pub q: Option<String>,
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = ClientView),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state.client_service.cadastrar(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(ClientView::from(client))))
}

// GET /api/clients?q=
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clientes",
    params(ListClientsQuery),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<ClientView>)
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.listar(query.q.as_deref()).await?;
    let views: Vec<ClientView> = clients.into_iter().map(ClientView::from).collect();

    Ok((StatusCode::OK, Json(views)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente encontrado", body = ClientView),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.buscar(id).await?;

    Ok((StatusCode::OK, Json(ClientView::from(client))))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = ClientView),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state
        .client_service
        .atualizar(id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(ClientView::from(client))))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente excluído (serviços e parcelas em cascata)"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.client_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
