// src/services/client_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, format::apenas_digitos},
    db::ClientRepository,
    models::client::Client,
};

/// Dados de cliente já validados, prontos para persistir.
#[derive(Debug, Clone)]
pub struct ClientInput {
    pub full_name: String,
    pub rg: String,
    pub cpf: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub zip_code: Option<String>,
}

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
    }

    /// Cadastra o cliente. Os documentos entram no banco sem máscara; a
    /// formatação é refeita na exibição.
    pub async fn cadastrar(&self, dados: ClientInput) -> Result<Client, AppError> {
        let dados = normalizar(dados);
        self.repo
            .create(
                &dados.full_name,
                &dados.rg,
                &dados.cpf,
                &dados.phone,
                &dados.email,
                &dados.address,
                dados.zip_code.as_deref(),
            )
            .await
    }

    pub async fn listar(&self, busca: Option<&str>) -> Result<Vec<Client>, AppError> {
        self.repo.get_all(busca).await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::ClientNotFound)
    }

    pub async fn atualizar(&self, id: Uuid, dados: ClientInput) -> Result<Client, AppError> {
        let dados = normalizar(dados);
        self.repo
            .update(
                id,
                &dados.full_name,
                &dados.rg,
                &dados.cpf,
                &dados.phone,
                &dados.email,
                &dados.address,
                dados.zip_code.as_deref(),
            )
            .await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(id).await
    }
}

// Remove máscara de CPF, RG, telefone e CEP antes de persistir.
fn normalizar(mut dados: ClientInput) -> ClientInput {
    dados.cpf = apenas_digitos(&dados.cpf);
    dados.rg = apenas_digitos(&dados.rg);
    dados.phone = apenas_digitos(&dados.phone);
    dados.zip_code = dados.zip_code.map(|z| apenas_digitos(&z));
    dados
}
