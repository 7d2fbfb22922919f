// src/db/client_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::client::Client};

// O repositório de clientes, responsável por todas as interações com a tabela 'clients'
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cria um novo cliente no banco de dados
    pub async fn create(
        &self,
        full_name: &str,
        rg: &str,
        cpf: &str,
        phone: &str,
        email: &str,
        address: &str,
        zip_code: Option<&str>,
    ) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (full_name, rg, cpf, phone, email, address, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(rg)
        .bind(cpf)
        .bind(phone)
        .bind(email)
        .bind(address)
        .bind(zip_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única (CPF) num erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CpfAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Lista todos os clientes, com busca opcional por nome, CPF, telefone ou e-mail
    pub async fn get_all(&self, busca: Option<&str>) -> Result<Vec<Client>, AppError> {
        let clients = match busca {
            Some(termo) => {
                let padrao = format!("%{}%", termo);
                sqlx::query_as::<_, Client>(
                    r#"
                    SELECT * FROM clients
                    WHERE full_name ILIKE $1 OR cpf ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(padrao)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(clients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn update(
        &self,
        id: Uuid,
        full_name: &str,
        rg: &str,
        cpf: &str,
        phone: &str,
        email: &str,
        address: &str,
        zip_code: Option<&str>,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET full_name = $2, rg = $3, cpf = $4, phone = $5,
                email = $6, address = $7, zip_code = $8, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(rg)
        .bind(cpf)
        .bind(phone)
        .bind(email)
        .bind(address)
        .bind(zip_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CpfAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })?;

        client.ok_or(AppError::ClientNotFound)
    }

    // A exclusão em cascata (serviços e parcelas) fica com o banco.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::ClientNotFound);
        }

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
