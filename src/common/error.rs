use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("CPF já cadastrado")]
    CpfAlreadyExists,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Parcela não encontrada")]
    InstallmentNotFound,

    #[error("Parcela selecionada não está vencida")]
    InstallmentNotOverdue,

    #[error("Item do catálogo não encontrado")]
    CatalogItemNotFound,

    #[error("Valor do serviço deve ser positivo")]
    InvalidAmount,

    #[error("Número de parcelas deve estar entre 1 e 12")]
    InvalidInstallmentCount,

    #[error("Plano de parcelamento inconsistente: {0}")]
    InvalidPlan(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::CpfAlreadyExists => (StatusCode::CONFLICT, "Este CPF já está cadastrado."),
            AppError::ClientNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::InstallmentNotFound => (StatusCode::NOT_FOUND, "Parcela não encontrada."),
            AppError::InstallmentNotOverdue => (
                StatusCode::BAD_REQUEST,
                "Uma ou mais parcelas selecionadas não estão vencidas ou não existem.",
            ),
            AppError::CatalogItemNotFound => {
                (StatusCode::NOT_FOUND, "Item do catálogo não encontrado.")
            }
            AppError::InvalidAmount => {
                (StatusCode::BAD_REQUEST, "O valor do serviço deve ser positivo.")
            }
            AppError::InvalidInstallmentCount => {
                (StatusCode::BAD_REQUEST, "O número de parcelas deve estar entre 1 e 12.")
            }
            AppError::InvalidPlan(ref motivo) => {
                let body = Json(json!({
                    "error": "Plano de parcelamento inconsistente.",
                    "details": motivo,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
