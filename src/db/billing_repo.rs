// src/db/billing_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        billing::{
            Installment, PaymentMethod, PlannedInstallment, ServiceRecord,
            ServiceWithInstallments,
        },
        client::Client,
    },
};

/// Linha achatada da consulta de parcelas vencidas (parcela + serviço + cliente).
#[derive(Debug, Clone, FromRow)]
pub struct OverdueRow {
    pub id: Uuid,
    pub installment_number: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub service_name: String,
    pub total_installments: i32,
    pub client_name: String,
    pub client_phone: String,
}

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SERVIÇOS + PARCELAS
    // =========================================================================

    /// Cria o serviço e todas as suas parcelas numa única transação: ou tudo
    /// entra, ou nada entra. Sem serviço órfão se a inserção de parcela falhar.
    pub async fn create_service_with_installments(
        &self,
        client_id: Uuid,
        service_name: &str,
        service_category: &str,
        total_amount: Decimal,
        plano: &[PlannedInstallment],
    ) -> Result<(ServiceRecord, Vec<Installment>), AppError> {
        let mut tx = self.pool.begin().await?;

        let service = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO services (client_id, service_name, service_category, total_amount, installments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(service_name)
        .bind(service_category)
        .bind(total_amount)
        .bind(plano.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        let mut parcelas = Vec::with_capacity(plano.len());
        for parcela in plano {
            let criada = sqlx::query_as::<_, Installment>(
                r#"
                INSERT INTO service_installments
                    (service_id, installment_number, amount, due_date, payment_method)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(service.id)
            .bind(parcela.installment_number)
            .bind(parcela.amount)
            .bind(parcela.due_date)
            .bind(parcela.payment_method)
            .fetch_one(&mut *tx)
            .await?;

            parcelas.push(criada);
        }

        tx.commit().await?;

        Ok((service, parcelas))
    }

    /// Leitura em lote: serviços (opcionalmente de um só cliente) com o
    /// cliente e as parcelas já anexados, do mais recente ao mais antigo.
    pub async fn get_services_detailed(
        &self,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ServiceWithInstallments>, AppError> {
        let services = match client_id {
            Some(cid) => {
                sqlx::query_as::<_, ServiceRecord>(
                    "SELECT * FROM services WHERE client_id = $1 ORDER BY created_at DESC",
                )
                .bind(cid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ServiceRecord>(
                    "SELECT * FROM services ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        self.anexar_detalhes(services).await
    }

    /// Os `limit` serviços mais recentes, já detalhados, para o painel.
    pub async fn get_recent_services(
        &self,
        limit: i64,
    ) -> Result<Vec<ServiceWithInstallments>, AppError> {
        let services = sqlx::query_as::<_, ServiceRecord>(
            "SELECT * FROM services ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.anexar_detalhes(services).await
    }

    /// Busca clientes e parcelas dos serviços em duas consultas `ANY` e monta
    /// o agregado em memória.
    async fn anexar_detalhes(
        &self,
        services: Vec<ServiceRecord>,
    ) -> Result<Vec<ServiceWithInstallments>, AppError> {
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let service_ids: Vec<Uuid> = services.iter().map(|s| s.id).collect();
        let client_ids: Vec<Uuid> = services.iter().map(|s| s.client_id).collect();

        let installments = sqlx::query_as::<_, Installment>(
            r#"
            SELECT * FROM service_installments
            WHERE service_id = ANY($1)
            ORDER BY installment_number ASC
            "#,
        )
        .bind(&service_ids)
        .fetch_all(&self.pool)
        .await?;

        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ANY($1)")
            .bind(&client_ids)
            .fetch_all(&self.pool)
            .await?;

        montar_detalhados(services, installments, clients)
    }

    // =========================================================================
    //  ESTADO DE PAGAMENTO
    // =========================================================================

    /// Marca a parcela como paga, registrando data e método. Chamar de novo
    /// sobrescreve a data do pagamento; o resultado final continua `paid`.
    /// O SET grava os mesmos campos de [`Installment::marcar_paga`].
    pub async fn mark_paid(
        &self,
        installment_id: Uuid,
        payment_method: PaymentMethod,
        paid_date: NaiveDate,
    ) -> Result<Installment, AppError> {
        let parcela = sqlx::query_as::<_, Installment>(
            r#"
            UPDATE service_installments
            SET status = 'paid', paid_date = $2, payment_method = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(installment_id)
        .bind(paid_date)
        .bind(payment_method)
        .fetch_optional(&self.pool)
        .await?;

        parcela.ok_or(AppError::InstallmentNotFound)
    }

    /// Varredura de atraso: toda parcela `pending` com vencimento anterior a
    /// `hoje` vira `overdue`. O filtro por status garante que parcela paga
    /// nunca é tocada. É o único ponto que atribui `overdue`, e o WHERE é o
    /// mesmo predicado de [`Installment::deve_virar_vencida`].
    pub async fn sweep_overdue(&self, hoje: NaiveDate) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE service_installments
            SET status = 'overdue'
            WHERE status = 'pending' AND due_date < $1
            "#,
        )
        .bind(hoje)
        .execute(&self.pool)
        .await?;

        Ok(resultado.rows_affected())
    }

    /// Parcelas vencidas com serviço e cliente, por vencimento crescente.
    pub async fn get_overdue_rows(&self) -> Result<Vec<OverdueRow>, AppError> {
        let linhas = sqlx::query_as::<_, OverdueRow>(
            r#"
            SELECT si.id, si.installment_number, si.amount, si.due_date,
                   s.service_name, s.installments AS total_installments,
                   c.full_name AS client_name, c.phone AS client_phone
            FROM service_installments si
            JOIN services s ON s.id = si.service_id
            JOIN clients c ON c.id = s.client_id
            WHERE si.status = 'overdue'
            ORDER BY si.due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(linhas)
    }

    // =========================================================================
    //  NÚMEROS DO PAINEL
    // =========================================================================

    /// Soma das parcelas pagas com `paid_date` dentro de [inicio, fim).
    pub async fn paid_sum_between(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let soma: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM service_installments
            WHERE status = 'paid' AND paid_date >= $1 AND paid_date < $2
            "#,
        )
        .bind(inicio)
        .bind(fim)
        .fetch_one(&self.pool)
        .await?;

        Ok(soma)
    }

    pub async fn count_pending(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM service_installments WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn count_overdue(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM service_installments WHERE status = 'overdue'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

/// Junta cada serviço ao seu cliente e às suas parcelas, preservando a ordem
/// dos serviços que veio do banco.
fn montar_detalhados(
    services: Vec<ServiceRecord>,
    installments: Vec<Installment>,
    clients: Vec<Client>,
) -> Result<Vec<ServiceWithInstallments>, AppError> {
    let mut por_servico: HashMap<Uuid, Vec<Installment>> = HashMap::new();
    for parcela in installments {
        por_servico.entry(parcela.service_id).or_default().push(parcela);
    }

    let clientes_por_id: HashMap<Uuid, Client> = clients.into_iter().map(|c| (c.id, c)).collect();

    let mut detalhados = Vec::with_capacity(services.len());
    for service in services {
        // A FK garante o cliente; se sumiu no meio do caminho, é erro mesmo.
        let client = clientes_por_id
            .get(&service.client_id)
            .cloned()
            .ok_or(AppError::ClientNotFound)?;
        let service_installments = por_servico.remove(&service.id).unwrap_or_default();

        detalhados.push(ServiceWithInstallments {
            service,
            client,
            service_installments,
        });
    }

    Ok(detalhados)
}
