// src/models/report.rs

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::billing::ServiceWithInstallments;

/// Ponto da série de receita mensal (janela fixa de 6 meses, do mais
/// antigo ao mais recente).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenuePoint {
    #[schema(example = "mar/2026")]
    pub month: String,

    #[schema(example = "1250.00")]
    pub amount: Decimal,
}

/// Resumo consolidado do período filtrado. Ou o relatório sai inteiro, ou
/// não sai: nunca um parcial.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total_services: usize,

    /// Soma dos `total_amount` dos serviços filtrados. Pode divergir de
    /// pago + pendente + vencido quando a divisão das parcelas não fecha
    /// exatamente no total.
    #[schema(example = "3000.00")]
    pub total_revenue: Decimal,

    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub overdue_amount: Decimal,

    pub monthly_revenue: Vec<MonthlyRevenuePoint>,

    /// Contagem por categoria; categorias sem ocorrência ficam ausentes.
    pub services_by_category: BTreeMap<String, i64>,

    /// Contagem de métodos entre as parcelas pagas; idem, sem zeros.
    pub payment_methods: BTreeMap<String, i64>,
}

/// Números do painel inicial.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: i64,

    /// Receita paga dentro do mês corrente.
    pub monthly_revenue: Decimal,

    pub pending_installments: i64,
    pub overdue_installments: i64,

    /// Últimos serviços criados, com cliente e parcelas.
    pub recent_services: Vec<ServiceWithInstallments>,
}
