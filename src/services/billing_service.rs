// src/services/billing_service.rs

use anyhow::anyhow;
use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BillingRepository, ClientRepository},
    models::billing::{
        Installment, PaymentMethod, PlannedInstallment, ServiceRecord, ServiceWithInstallments,
    },
};

pub const MIN_PARCELAS: u32 = 1;
pub const MAX_PARCELAS: u32 = 12;

/// Gera o plano de parcelamento: `parcelas` parcelas iguais de
/// `total / parcelas`, vencendo a 1, 2, ... meses-calendário a partir de
/// `base` (com ajuste para fim de mês), todas `pending` e com o método
/// informado (PIX por padrão na criação).
///
/// O valor de cada parcela é a divisão arredondada para centavos, o mesmo
/// grão do NUMERIC(12,2) em que ela é gravada. A última parcela NÃO absorve
/// a sobra do arredondamento, então a soma das parcelas pode diferir do
/// total quando a divisão não é exata (100 em 3x dá 3 parcelas de 33,33).
pub fn gerar_plano(
    total: Decimal,
    parcelas: u32,
    base: NaiveDate,
    metodo: PaymentMethod,
) -> Result<Vec<PlannedInstallment>, AppError> {
    if total <= Decimal::ZERO {
        return Err(AppError::InvalidAmount);
    }
    if !(MIN_PARCELAS..=MAX_PARCELAS).contains(&parcelas) {
        return Err(AppError::InvalidInstallmentCount);
    }

    let valor_parcela = (total / Decimal::from(parcelas)).round_dp(2);

    let mut plano = Vec::with_capacity(parcelas as usize);
    for i in 1..=parcelas {
        let vencimento = base
            .checked_add_months(Months::new(i))
            .ok_or_else(|| AppError::InternalServerError(anyhow!("data fora do intervalo")))?;

        plano.push(PlannedInstallment {
            installment_number: i as i32,
            amount: valor_parcela,
            due_date: vencimento,
            payment_method: metodo,
        });
    }

    Ok(plano)
}

#[derive(Clone)]
pub struct BillingService {
    repo: BillingRepository,
    clients: ClientRepository,
}

impl BillingService {
    pub fn new(repo: BillingRepository, clients: ClientRepository) -> Self {
        Self { repo, clients }
    }

    /// Prévia do plano para a calculadora: nada é persistido.
    pub fn previa_plano(
        &self,
        total: Decimal,
        parcelas: u32,
    ) -> Result<Vec<PlannedInstallment>, AppError> {
        gerar_plano(total, parcelas, Utc::now().date_naive(), PaymentMethod::Pix)
    }

    /// Cria o serviço com suas parcelas. O chamador pode mandar o plano já
    /// editado (métodos ou datas ajustados na tela); senão, geramos o padrão.
    /// A escrita é transacional no repositório.
    pub async fn criar_servico(
        &self,
        client_id: Uuid,
        service_name: &str,
        service_category: &str,
        total_amount: Decimal,
        parcelas: u32,
        plano_editado: Option<Vec<PlannedInstallment>>,
    ) -> Result<(ServiceRecord, Vec<Installment>), AppError> {
        // Valida tudo antes de qualquer escrita
        self.clients
            .find_by_id(client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let plano = match plano_editado {
            Some(plano) => {
                validar_plano_editado(&plano, parcelas, total_amount)?;
                plano
            }
            None => gerar_plano(
                total_amount,
                parcelas,
                Utc::now().date_naive(),
                PaymentMethod::Pix,
            )?,
        };

        let (service, installments) = self
            .repo
            .create_service_with_installments(
                client_id,
                service_name,
                service_category,
                total_amount,
                &plano,
            )
            .await?;

        tracing::info!(
            "Serviço '{}' criado com {} parcela(s) para o cliente {}",
            service.service_name,
            installments.len(),
            client_id
        );

        Ok((service, installments))
    }

    pub async fn listar_servicos(
        &self,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ServiceWithInstallments>, AppError> {
        self.repo.get_services_detailed(client_id).await
    }

    /// Registra o pagamento de uma parcela (pending ou overdue -> paid).
    pub async fn marcar_paga(
        &self,
        installment_id: Uuid,
        payment_method: PaymentMethod,
    ) -> Result<Installment, AppError> {
        self.repo
            .mark_paid(installment_id, payment_method, Utc::now().date_naive())
            .await
    }
}

fn validar_plano_editado(
    plano: &[PlannedInstallment],
    parcelas: u32,
    total: Decimal,
) -> Result<(), AppError> {
    if total <= Decimal::ZERO {
        return Err(AppError::InvalidAmount);
    }
    if !(MIN_PARCELAS..=MAX_PARCELAS).contains(&parcelas) {
        return Err(AppError::InvalidInstallmentCount);
    }
    if plano.len() != parcelas as usize {
        return Err(AppError::InvalidPlan(format!(
            "o plano tem {} parcela(s), mas o serviço declara {}",
            plano.len(),
            parcelas
        )));
    }
    for (i, parcela) in plano.iter().enumerate() {
        if parcela.installment_number != (i + 1) as i32 {
            return Err(AppError::InvalidPlan(
                "numeração das parcelas deve ser 1..N, contígua".to_string(),
            ));
        }
        if parcela.amount < Decimal::ZERO {
            return Err(AppError::InvalidPlan(format!(
                "parcela {} com valor negativo",
                parcela.installment_number
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn plano_tem_n_parcelas_com_numeracao_contigua() {
        let plano = gerar_plano(Decimal::from(1200), 4, base(), PaymentMethod::Pix).unwrap();

        assert_eq!(plano.len(), 4);
        for (i, parcela) in plano.iter().enumerate() {
            assert_eq!(parcela.installment_number, (i + 1) as i32);
            assert_eq!(parcela.amount, Decimal::from(300));
            assert_eq!(parcela.payment_method, PaymentMethod::Pix);
        }
    }

    #[test]
    fn vencimentos_avancam_um_mes_por_parcela() {
        let plano = gerar_plano(Decimal::from(600), 3, base(), PaymentMethod::Pix).unwrap();

        assert_eq!(plano[0].due_date, NaiveDate::from_ymd_opt(2026, 4, 15).unwrap());
        assert_eq!(plano[1].due_date, NaiveDate::from_ymd_opt(2026, 5, 15).unwrap());
        assert_eq!(plano[2].due_date, NaiveDate::from_ymd_opt(2026, 6, 15).unwrap());
    }

    #[test]
    fn fim_de_mes_e_ajustado_para_o_ultimo_dia_valido() {
        // 31/jan + 1 mês não existe; o chrono ajusta para 28/fev.
        let base = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let plano = gerar_plano(Decimal::from(300), 3, base, PaymentMethod::Pix).unwrap();

        assert_eq!(plano[0].due_date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(plano[1].due_date, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert_eq!(plano[2].due_date, NaiveDate::from_ymd_opt(2026, 4, 30).unwrap());
    }

    #[test]
    fn divisao_inexata_nao_e_reconciliada() {
        // Comportamento documentado: 100 / 3 gera três parcelas iguais de
        // 33,33 somando 99,99; a última NÃO absorve o centavo que falta.
        let plano = gerar_plano(Decimal::from(100), 3, base(), PaymentMethod::Pix).unwrap();

        let soma: Decimal = plano.iter().map(|p| p.amount).sum();
        assert_eq!(soma, Decimal::new(9999, 2));
        assert_ne!(soma, Decimal::from(100));
        // Todas as parcelas têm exatamente o mesmo valor, já em centavos
        assert!(plano.iter().all(|p| p.amount == Decimal::new(3333, 2)));
    }

    #[test]
    fn valor_da_parcela_ja_sai_arredondado_para_centavos() {
        // A prévia entrega o mesmo número que a persistência devolve depois
        // de gravar em NUMERIC(12,2): nada de dízima na resposta.
        let plano = gerar_plano(Decimal::new(25000, 2), 7, base(), PaymentMethod::Pix).unwrap();

        assert_eq!(plano[0].amount, Decimal::new(3571, 2)); // 250,00 / 7
        assert!(plano.iter().all(|p| p.amount.scale() <= 2));
    }

    #[test]
    fn recusa_total_nao_positivo() {
        assert!(matches!(
            gerar_plano(Decimal::ZERO, 3, base(), PaymentMethod::Pix),
            Err(AppError::InvalidAmount)
        ));
        assert!(matches!(
            gerar_plano(Decimal::from(-50), 3, base(), PaymentMethod::Pix),
            Err(AppError::InvalidAmount)
        ));
    }

    #[test]
    fn recusa_numero_de_parcelas_fora_do_intervalo() {
        assert!(matches!(
            gerar_plano(Decimal::from(100), 0, base(), PaymentMethod::Pix),
            Err(AppError::InvalidInstallmentCount)
        ));
        assert!(matches!(
            gerar_plano(Decimal::from(100), 13, base(), PaymentMethod::Pix),
            Err(AppError::InvalidInstallmentCount)
        ));
        assert!(gerar_plano(Decimal::from(100), 12, base(), PaymentMethod::Pix).is_ok());
    }

    #[test]
    fn plano_editado_precisa_bater_com_a_contagem_declarada() {
        let plano = gerar_plano(Decimal::from(300), 3, base(), PaymentMethod::Pix).unwrap();

        assert!(validar_plano_editado(&plano, 3, Decimal::from(300)).is_ok());
        assert!(matches!(
            validar_plano_editado(&plano, 4, Decimal::from(300)),
            Err(AppError::InvalidPlan(_))
        ));
    }

    #[test]
    fn plano_editado_com_numeracao_furada_e_recusado() {
        let mut plano = gerar_plano(Decimal::from(300), 3, base(), PaymentMethod::Pix).unwrap();
        plano[1].installment_number = 5;

        assert!(matches!(
            validar_plano_editado(&plano, 3, Decimal::from(300)),
            Err(AppError::InvalidPlan(_))
        ));
    }
}
