// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::client::Client;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,    // Em andamento
    Completed, // Concluído
    Cancelled, // Cancelado
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "installment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending, // Aguardando pagamento
    Paid,    // Quitada
    Overdue, // Vencida (atribuído só pela varredura)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Debit,
    Credit,
    Cash,
}

impl PaymentMethod {
    /// Chave estável do método, a mesma do JSON e do banco.
    pub fn chave(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Cash => "cash",
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(example = "Transferência de Veículo")]
    pub service_name: String,

    #[schema(example = "Documentação")]
    pub service_category: String,

    #[schema(example = "1200.00")]
    pub total_amount: Decimal,

    #[schema(example = 3)]
    pub installments: i32,

    pub status: ServiceStatus,

    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: Uuid,
    pub service_id: Uuid,

    #[schema(example = 1)]
    pub installment_number: i32,

    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-04-29")]
    pub due_date: NaiveDate,

    #[schema(value_type = Option<String>, format = Date)]
    pub paid_date: Option<NaiveDate>,

    pub payment_method: PaymentMethod,
    pub status: InstallmentStatus,

    pub created_at: Option<DateTime<Utc>>,
}

impl Installment {
    /// Predicado da varredura de atraso: só parcela `pending` com vencimento
    /// já passado muda de status. Parcela paga nunca é tocada e `overdue` não
    /// é reatribuído. É este o teste que o UPDATE da varredura faz no banco.
    pub fn deve_virar_vencida(&self, hoje: NaiveDate) -> bool {
        self.status == InstallmentStatus::Pending && self.due_date < hoje
    }

    /// Transição de pagamento: de qualquer estado a parcela vai para `paid`.
    /// Repetir o pagamento só sobrescreve data e método; o estado final
    /// continua `paid`. O UPDATE de pagamento grava exatamente estes campos.
    pub fn marcar_paga(&mut self, metodo: PaymentMethod, data: NaiveDate) {
        self.status = InstallmentStatus::Paid;
        self.paid_date = Some(data);
        self.payment_method = metodo;
    }
}

/// Leitura em lote: serviço + cliente + parcelas, como a UI consome.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWithInstallments {
    #[serde(flatten)]
    pub service: ServiceRecord,
    pub client: Client,
    pub service_installments: Vec<Installment>,
}

/// Item do catálogo de serviços pré-definidos (configuração editável).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Uuid,

    #[schema(example = "Licenciamento Anual")]
    pub name: String,

    #[schema(example = "Documentação")]
    pub category: String,

    #[schema(example = "350.00")]
    pub base_price: Decimal,

    pub created_at: Option<DateTime<Utc>>,
}

/// Parcela planejada, ainda não persistida (prévia da calculadora).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannedInstallment {
    #[schema(example = 1)]
    pub installment_number: i32,

    #[schema(example = "33.33")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-04-29")]
    pub due_date: NaiveDate,

    pub payment_method: PaymentMethod,
}

/// Faixa de gravidade do atraso, só para exibição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OverdueSeverity {
    Low,    // até 3 dias
    Medium, // 4 a 7 dias
    High,   // mais de 7 dias
}

/// Projeção achatada de uma parcela vencida com serviço e cliente
/// (derivada, nunca armazenada).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverduePayment {
    pub id: Uuid,
    pub client_name: String,
    pub client_phone: String,
    pub service_name: String,
    pub amount: Decimal,

    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,

    #[schema(example = 5)]
    pub days_overdue: i64,

    #[schema(example = 2)]
    pub installment: i32,

    #[schema(example = 3)]
    pub total_installments: i32,

    pub severity: OverdueSeverity,
}

/// Lembrete de cobrança já renderizado. A montagem do link de WhatsApp e o
/// envio ficam com a camada de mensageria; daqui sai só o texto e o
/// telefone em dígitos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderMessage {
    pub installment_id: Uuid,
    pub client_name: String,

    #[schema(example = "11987654321")]
    pub phone: String,

    pub message: String,
}
