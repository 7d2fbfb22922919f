// src/services/report_service.rs

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::{
    common::error::AppError,
    db::{BillingRepository, ClientRepository},
    models::{
        billing::{InstallmentStatus, ServiceWithInstallments},
        report::{DashboardStats, MonthlyRevenuePoint, ReportData},
    },
};

// Quantos serviços recentes o painel mostra.
const LIMITE_SERVICOS_RECENTES: i64 = 5;

const MESES_ABREV: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Rótulo de mês no padrão do relatório: `ago/2026`.
fn rotulo_mes(ano: i32, mes: u32) -> String {
    format!("{}/{}", MESES_ABREV[(mes - 1) as usize], ano)
}

// Volta `n` meses a partir de (ano, mes), em aritmética de calendário.
fn retroceder_meses(ano: i32, mes: u32, n: u32) -> (i32, u32) {
    let total = ano * 12 + (mes as i32 - 1) - n as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Consolida os serviços do período em um relatório. Dobra pura sobre dados
/// já buscados: o filtro de data é inclusivo nas duas pontas e um serviço
/// fora do período some de TODOS os agregados, inclusive das contagens por
/// categoria.
pub fn resumir(
    servicos: &[ServiceWithInstallments],
    inicio: NaiveDate,
    fim: NaiveDate,
    hoje: NaiveDate,
) -> ReportData {
    let filtrados: Vec<&ServiceWithInstallments> = servicos
        .iter()
        .filter(|s| {
            s.service
                .created_at
                .map(|t| {
                    let data = t.date_naive();
                    data >= inicio && data <= fim
                })
                .unwrap_or(false)
        })
        .collect();

    // Receita total é a soma dos totais dos serviços, não das parcelas:
    // os dois números podem divergir quando a divisão não fecha exata.
    let total_revenue: Decimal = filtrados.iter().map(|s| s.service.total_amount).sum();

    let mut paid_amount = Decimal::ZERO;
    let mut pending_amount = Decimal::ZERO;
    let mut overdue_amount = Decimal::ZERO;

    // Janela fixa dos últimos 6 meses, do mais antigo ao mais recente
    let mut monthly: Vec<MonthlyRevenuePoint> = (0..6)
        .rev()
        .map(|n| {
            let (ano, mes) = retroceder_meses(hoje.year(), hoje.month(), n);
            MonthlyRevenuePoint {
                month: rotulo_mes(ano, mes),
                amount: Decimal::ZERO,
            }
        })
        .collect();

    let mut payment_methods: BTreeMap<String, i64> = BTreeMap::new();

    for servico in &filtrados {
        for parcela in &servico.service_installments {
            match parcela.status {
                InstallmentStatus::Paid => {
                    paid_amount += parcela.amount;
                    payment_methods
                        .entry(parcela.payment_method.chave().to_string())
                        .and_modify(|n| *n += 1)
                        .or_insert(1);

                    // Pagamento fora da janela de 6 meses fica de fora desta
                    // série, mas continua contado em paid_amount.
                    if let Some(paga_em) = parcela.paid_date {
                        let rotulo = rotulo_mes(paga_em.year(), paga_em.month());
                        if let Some(ponto) = monthly.iter_mut().find(|p| p.month == rotulo) {
                            ponto.amount += parcela.amount;
                        }
                    }
                }
                InstallmentStatus::Pending => pending_amount += parcela.amount,
                InstallmentStatus::Overdue => overdue_amount += parcela.amount,
            }
        }
    }

    let mut services_by_category: BTreeMap<String, i64> = BTreeMap::new();
    for servico in &filtrados {
        services_by_category
            .entry(servico.service.service_category.clone())
            .and_modify(|n| *n += 1)
            .or_insert(1);
    }

    ReportData {
        total_services: filtrados.len(),
        total_revenue,
        paid_amount,
        pending_amount,
        overdue_amount,
        monthly_revenue: monthly,
        services_by_category,
        payment_methods,
    }
}

#[derive(Clone)]
pub struct ReportService {
    billing: BillingRepository,
    clients: ClientRepository,
}

impl ReportService {
    pub fn new(billing: BillingRepository, clients: ClientRepository) -> Self {
        Self { billing, clients }
    }

    /// Relatório do período. Se a busca falhar, nenhum parcial é produzido:
    /// o erro sobe direto para o chamador.
    pub async fn relatorio(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<ReportData, AppError> {
        let servicos = self.billing.get_services_detailed(None).await?;
        Ok(resumir(&servicos, inicio, fim, Utc::now().date_naive()))
    }

    /// Números do painel inicial: clientes, receita do mês corrente,
    /// contagens de parcelas pendentes e vencidas e os últimos serviços.
    pub async fn painel(&self) -> Result<DashboardStats, AppError> {
        let hoje = Utc::now().date_naive();
        let inicio_mes = hoje.with_day(1).unwrap_or(hoje);
        let (ano_prox, mes_prox) = if hoje.month() == 12 {
            (hoje.year() + 1, 1)
        } else {
            (hoje.year(), hoje.month() + 1)
        };
        let inicio_proximo = NaiveDate::from_ymd_opt(ano_prox, mes_prox, 1).unwrap_or(hoje);

        let total_clients = self.clients.count().await?;
        let monthly_revenue = self
            .billing
            .paid_sum_between(inicio_mes, inicio_proximo)
            .await?;
        let pending_installments = self.billing.count_pending().await?;
        let overdue_installments = self.billing.count_overdue().await?;
        let recent_services = self
            .billing
            .get_recent_services(LIMITE_SERVICOS_RECENTES)
            .await?;

        Ok(DashboardStats {
            total_clients,
            monthly_revenue,
            pending_installments,
            overdue_installments,
            recent_services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::billing::{
        Installment, PaymentMethod, ServiceRecord, ServiceStatus,
    };
    use crate::models::client::Client;
    use chrono::{DateTime, TimeZone};
    use uuid::Uuid;

    fn cliente() -> Client {
        Client {
            id: Uuid::new_v4(),
            full_name: "Maria da Silva".to_string(),
            rg: "123456789".to_string(),
            cpf: "52998224725".to_string(),
            phone: "11987654321".to_string(),
            email: "maria@email.com".to_string(),
            address: "Rua das Flores, 123".to_string(),
            zip_code: Some("01310100".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    fn criado_em(ano: i32, mes: u32, dia: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(ano, mes, dia, 12, 0, 0).unwrap()
    }

    fn servico(
        categoria: &str,
        total: i64,
        criado: DateTime<Utc>,
        parcelas: Vec<Installment>,
    ) -> ServiceWithInstallments {
        let id = Uuid::new_v4();
        ServiceWithInstallments {
            service: ServiceRecord {
                id,
                client_id: Uuid::new_v4(),
                service_name: "Serviço".to_string(),
                service_category: categoria.to_string(),
                total_amount: Decimal::from(total),
                installments: parcelas.len() as i32,
                status: ServiceStatus::Active,
                created_at: Some(criado),
            },
            client: cliente(),
            service_installments: parcelas,
        }
    }

    fn parcela(
        numero: i32,
        valor: i64,
        status: InstallmentStatus,
        paga_em: Option<NaiveDate>,
        metodo: PaymentMethod,
    ) -> Installment {
        Installment {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            installment_number: numero,
            amount: Decimal::from(valor),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            paid_date: paga_em,
            payment_method: metodo,
            status,
            created_at: None,
        }
    }

    fn hoje() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    #[test]
    fn dois_servicos_pendentes_somam_no_lugar_certo() {
        let servicos = vec![
            servico(
                "Documentação",
                1000,
                criado_em(2026, 8, 10),
                vec![
                    parcela(1, 500, InstallmentStatus::Pending, None, PaymentMethod::Pix),
                    parcela(2, 500, InstallmentStatus::Pending, None, PaymentMethod::Pix),
                ],
            ),
            servico(
                "Licenciamento",
                2000,
                criado_em(2026, 8, 20),
                vec![parcela(1, 2000, InstallmentStatus::Pending, None, PaymentMethod::Pix)],
            ),
        ];

        let inicio = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let relatorio = resumir(&servicos, inicio, fim, hoje());

        assert_eq!(relatorio.total_services, 2);
        assert_eq!(relatorio.total_revenue, Decimal::from(3000));
        assert_eq!(relatorio.pending_amount, Decimal::from(3000));
        assert_eq!(relatorio.paid_amount, Decimal::ZERO);
        assert_eq!(relatorio.overdue_amount, Decimal::ZERO);
        // Nenhuma parcela paga: nenhum método aparece (sem zeros)
        assert!(relatorio.payment_methods.is_empty());
    }

    #[test]
    fn servico_fora_do_periodo_some_de_todos_os_agregados() {
        let servicos = vec![
            servico(
                "Documentação",
                1000,
                criado_em(2026, 8, 10),
                vec![parcela(1, 1000, InstallmentStatus::Pending, None, PaymentMethod::Pix)],
            ),
            servico(
                "Vistoria",
                500,
                criado_em(2026, 6, 1), // fora do filtro
                vec![parcela(1, 500, InstallmentStatus::Paid, Some(hoje()), PaymentMethod::Cash)],
            ),
        ];

        let inicio = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let relatorio = resumir(&servicos, inicio, fim, hoje());

        assert_eq!(relatorio.total_services, 1);
        assert_eq!(relatorio.total_revenue, Decimal::from(1000));
        assert_eq!(relatorio.paid_amount, Decimal::ZERO);
        assert!(!relatorio.services_by_category.contains_key("Vistoria"));
        assert!(relatorio.payment_methods.is_empty());
    }

    #[test]
    fn filtro_de_data_e_inclusivo_nas_duas_pontas() {
        let servicos = vec![
            servico("A", 100, criado_em(2026, 8, 1), vec![]),
            servico("B", 100, criado_em(2026, 8, 31), vec![]),
        ];

        let inicio = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let relatorio = resumir(&servicos, inicio, fim, hoje());

        assert_eq!(relatorio.total_services, 2);
    }

    #[test]
    fn receita_mensal_cobre_seis_meses_do_mais_antigo_ao_mais_recente() {
        let relatorio = resumir(&[], hoje(), hoje(), hoje());

        let meses: Vec<&str> = relatorio
            .monthly_revenue
            .iter()
            .map(|p| p.month.as_str())
            .collect();
        assert_eq!(
            meses,
            vec!["mar/2026", "abr/2026", "mai/2026", "jun/2026", "jul/2026", "ago/2026"]
        );
        // A virada de ano também funciona
        let (ano, mes) = retroceder_meses(2026, 2, 5);
        assert_eq!((ano, mes), (2025, 9));
    }

    #[test]
    fn pagamento_fora_da_janela_fica_fora_da_serie_mas_conta_no_total_pago() {
        let antigo = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap(); // > 6 meses atrás
        let recente = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let servicos = vec![servico(
            "Documentação",
            300,
            criado_em(2026, 8, 1),
            vec![
                parcela(1, 100, InstallmentStatus::Paid, Some(antigo), PaymentMethod::Pix),
                parcela(2, 200, InstallmentStatus::Paid, Some(recente), PaymentMethod::Credit),
            ],
        )];

        let inicio = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let relatorio = resumir(&servicos, inicio, fim, hoje());

        assert_eq!(relatorio.paid_amount, Decimal::from(300));
        let agosto = relatorio
            .monthly_revenue
            .iter()
            .find(|p| p.month == "ago/2026")
            .unwrap();
        assert_eq!(agosto.amount, Decimal::from(200));
        let soma_janela: Decimal = relatorio.monthly_revenue.iter().map(|p| p.amount).sum();
        assert_eq!(soma_janela, Decimal::from(200));
        // Os dois métodos aparecem na contagem
        assert_eq!(relatorio.payment_methods.get("pix"), Some(&1));
        assert_eq!(relatorio.payment_methods.get("credit"), Some(&1));
    }

    #[test]
    fn contagem_por_categoria_so_tem_categorias_presentes() {
        let servicos = vec![
            servico("Documentação", 100, criado_em(2026, 8, 5), vec![]),
            servico("Documentação", 100, criado_em(2026, 8, 6), vec![]),
            servico("Vistoria", 100, criado_em(2026, 8, 7), vec![]),
        ];

        let inicio = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let relatorio = resumir(&servicos, inicio, fim, hoje());

        assert_eq!(relatorio.services_by_category.get("Documentação"), Some(&2));
        assert_eq!(relatorio.services_by_category.get("Vistoria"), Some(&1));
        assert_eq!(relatorio.services_by_category.len(), 2);
    }
}
