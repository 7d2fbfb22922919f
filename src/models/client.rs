// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::format::{formatar_cep, formatar_cpf, formatar_rg, formatar_telefone};

/// Cliente do despachante. CPF, telefone e CEP são guardados apenas com
/// dígitos; a máscara é responsabilidade da camada de exibição.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[schema(example = "123456789")]
    pub rg: String,

    #[schema(example = "52998224725")]
    pub cpf: String,

    #[schema(example = "11987654321")]
    pub phone: String,

    #[schema(example = "maria@email.com")]
    pub email: String,

    #[schema(example = "Rua das Flores, 123 - Centro, São Paulo/SP")]
    pub address: String,

    #[schema(example = "01310100")]
    pub zip_code: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Cliente com os documentos já mascarados para a tela. O valor bruto segue
/// junto; a máscara nunca volta para o banco.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    #[serde(flatten)]
    pub client: Client,

    #[schema(example = "529.982.247-25")]
    pub cpf_formatado: String,

    #[schema(example = "12.345.678-9")]
    pub rg_formatado: String,

    #[schema(example = "(11) 98765-4321")]
    pub telefone_formatado: String,

    #[schema(example = "01310-100")]
    pub cep_formatado: Option<String>,
}

impl From<Client> for ClientView {
    fn from(client: Client) -> Self {
        Self {
            cpf_formatado: formatar_cpf(&client.cpf),
            rg_formatado: formatar_rg(&client.rg),
            telefone_formatado: formatar_telefone(&client.phone),
            cep_formatado: client.zip_code.as_deref().map(formatar_cep),
            client,
        }
    }
}
