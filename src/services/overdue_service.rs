// src/services/overdue_service.rs

use chrono::{NaiveDate, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        format::{formatar_data_br, formatar_moeda},
    },
    db::{billing_repo::OverdueRow, BillingRepository},
    models::billing::{OverduePayment, OverdueSeverity, ReminderMessage},
};

/// Mensagem padrão de cobrança. Os tokens entre chaves são substituídos por
/// valores da parcela; token desconhecido fica como está (fallback
/// silencioso, comportamento herdado do produto).
pub const MENSAGEM_PADRAO: &str = "🚨 *COBRANÇA - SAN LÉO SOLUÇÕES EM TRÂNSITO* 🚨

Olá, {CLIENTE}!

Identificamos que o pagamento referente ao serviço de *{SERVICO}* está em atraso há *{DIAS_ATRASO} dias*.

📋 *Detalhes:*
• Parcela: {PARCELA}/{TOTAL_PARCELAS}
• Valor: {VALOR}
• Vencimento: {DATA_VENCIMENTO}

💳 *Para regularizar:*
PIX: sanleo@pagamentos.com
Chave: 11.222.333/0001-44

⚠️ *Importante:* Após o pagamento, envie o comprovante para confirmarmos a quitação.

Dúvidas? Entre em contato conosco!
📞 (11) 3333-4444

_SanLéo - Soluções em Trânsito_";

// Pausa entre lembretes do envio em lote, para não disparar o
// anti-spam do canal de mensagens.
const INTERVALO_ENTRE_LEMBRETES: Duration = Duration::from_millis(1000);

/// Dias corridos de atraso (piso em dias inteiros).
pub fn dias_de_atraso(vencimento: NaiveDate, hoje: NaiveDate) -> i64 {
    (hoje - vencimento).num_days()
}

/// Faixas de gravidade para exibição: até 3 dias, 4 a 7, mais de 7.
pub fn classificar_gravidade(dias: i64) -> OverdueSeverity {
    if dias <= 3 {
        OverdueSeverity::Low
    } else if dias <= 7 {
        OverdueSeverity::Medium
    } else {
        OverdueSeverity::High
    }
}

/// Substituição literal dos tokens no template, só na primeira ocorrência
/// de cada um. Tokens não reconhecidos (e repetições) permanecem intactos;
/// nenhum erro é levantado.
pub fn renderizar_mensagem(template: &str, pagamento: &OverduePayment) -> String {
    template
        .replacen("{CLIENTE}", &pagamento.client_name, 1)
        .replacen("{SERVICO}", &pagamento.service_name, 1)
        .replacen("{DIAS_ATRASO}", &pagamento.days_overdue.to_string(), 1)
        .replacen("{PARCELA}", &pagamento.installment.to_string(), 1)
        .replacen("{TOTAL_PARCELAS}", &pagamento.total_installments.to_string(), 1)
        .replacen("{VALOR}", &formatar_moeda(pagamento.amount), 1)
        .replacen("{DATA_VENCIMENTO}", &formatar_data_br(pagamento.due_date), 1)
}

/// Restringe a lista aos pagamentos selecionados, mantendo a ordem por
/// vencimento. Id que não corresponde a nenhuma parcela vencida derruba o
/// lote inteiro: seleção furada é erro do chamador, não um pulo silencioso.
fn selecionar(
    pagamentos: Vec<OverduePayment>,
    selecionadas: &[Uuid],
) -> Result<Vec<OverduePayment>, AppError> {
    if let Some(id) = selecionadas
        .iter()
        .find(|id| !pagamentos.iter().any(|p| p.id == **id))
    {
        tracing::warn!("Lembrete recusado: parcela {} não está vencida", id);
        return Err(AppError::InstallmentNotOverdue);
    }

    Ok(pagamentos
        .into_iter()
        .filter(|p| selecionadas.contains(&p.id))
        .collect())
}

fn projetar(linha: OverdueRow, hoje: NaiveDate) -> OverduePayment {
    let dias = dias_de_atraso(linha.due_date, hoje);
    OverduePayment {
        id: linha.id,
        client_name: linha.client_name,
        client_phone: linha.client_phone,
        service_name: linha.service_name,
        amount: linha.amount,
        due_date: linha.due_date,
        days_overdue: dias,
        installment: linha.installment_number,
        total_installments: linha.total_installments,
        severity: classificar_gravidade(dias),
    }
}

#[derive(Clone)]
pub struct OverdueService {
    repo: BillingRepository,
}

impl OverdueService {
    pub fn new(repo: BillingRepository) -> Self {
        Self { repo }
    }

    /// Varredura em lote: parcelas `pending` vencidas viram `overdue`.
    /// Entre varreduras o status pode ficar defasado; quem precisa do dado
    /// fresco chama a varredura antes de consultar.
    pub async fn varrer(&self) -> Result<u64, AppError> {
        let alteradas = self.repo.sweep_overdue(Utc::now().date_naive()).await?;
        if alteradas > 0 {
            tracing::info!("Varredura de atraso: {} parcela(s) marcadas como vencidas", alteradas);
        }
        Ok(alteradas)
    }

    /// Parcelas vencidas com cliente e serviço, por vencimento crescente.
    pub async fn listar(&self) -> Result<Vec<OverduePayment>, AppError> {
        let hoje = Utc::now().date_naive();
        let linhas = self.repo.get_overdue_rows().await?;
        Ok(linhas.into_iter().map(|l| projetar(l, hoje)).collect())
    }

    /// Prepara os lembretes das parcelas selecionadas, um a um, com uma
    /// pausa fixa entre eles. Sem cancelamento no meio: uma vez iniciada, a
    /// sequência vai até o fim.
    pub async fn preparar_lembretes(
        &self,
        selecionadas: &[Uuid],
        template: Option<&str>,
    ) -> Result<Vec<ReminderMessage>, AppError> {
        let template = template.unwrap_or(MENSAGEM_PADRAO);
        let pagamentos = selecionar(self.listar().await?, selecionadas)?;

        let mut lembretes = Vec::new();
        for pagamento in &pagamentos {
            if !lembretes.is_empty() {
                tokio::time::sleep(INTERVALO_ENTRE_LEMBRETES).await;
            }

            let mensagem = renderizar_mensagem(template, pagamento);
            tracing::info!(
                "Lembrete de cobrança preparado para {} (parcela {}/{}, {} dia(s) de atraso)",
                pagamento.client_name,
                pagamento.installment,
                pagamento.total_installments,
                pagamento.days_overdue
            );

            lembretes.push(ReminderMessage {
                installment_id: pagamento.id,
                client_name: pagamento.client_name.clone(),
                phone: pagamento.client_phone.clone(),
                message: mensagem,
            });
        }

        Ok(lembretes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn pagamento_exemplo(dias: i64) -> OverduePayment {
        let hoje = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let vencimento = hoje - chrono::Duration::days(dias);
        OverduePayment {
            id: Uuid::new_v4(),
            client_name: "Maria da Silva".to_string(),
            client_phone: "11987654321".to_string(),
            service_name: "Transferência de Veículo".to_string(),
            amount: Decimal::new(40000, 2),
            due_date: vencimento,
            days_overdue: dias_de_atraso(vencimento, hoje),
            installment: 2,
            total_installments: 3,
            severity: classificar_gravidade(dias),
        }
    }

    #[test]
    fn dias_de_atraso_conta_dias_inteiros() {
        let hoje = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        for n in [1i64, 5, 30] {
            let vencimento = hoje - chrono::Duration::days(n);
            assert_eq!(dias_de_atraso(vencimento, hoje), n);
        }
        assert_eq!(dias_de_atraso(hoje, hoje), 0);
    }

    #[test]
    fn gravidade_muda_exatamente_em_3_e_7_dias() {
        assert_eq!(classificar_gravidade(1), OverdueSeverity::Low);
        assert_eq!(classificar_gravidade(3), OverdueSeverity::Low);
        assert_eq!(classificar_gravidade(4), OverdueSeverity::Medium);
        assert_eq!(classificar_gravidade(7), OverdueSeverity::Medium);
        assert_eq!(classificar_gravidade(8), OverdueSeverity::High);
    }

    #[test]
    fn mensagem_substitui_todos_os_tokens() {
        let pagamento = pagamento_exemplo(5);
        let mensagem = renderizar_mensagem(MENSAGEM_PADRAO, &pagamento);

        assert!(mensagem.contains("Olá, Maria da Silva!"));
        assert!(mensagem.contains("*Transferência de Veículo*"));
        assert!(mensagem.contains("há *5 dias*"));
        assert!(mensagem.contains("Parcela: 2/3"));
        assert!(mensagem.contains("Valor: R$ 400,00"));
        assert!(!mensagem.contains('{'), "nenhum token pode sobrar: {mensagem}");
    }

    #[test]
    fn token_desconhecido_fica_intacto() {
        let pagamento = pagamento_exemplo(2);
        let mensagem = renderizar_mensagem("Oi {CLIENTE}, código {PROTOCOLO}", &pagamento);

        assert_eq!(mensagem, "Oi Maria da Silva, código {PROTOCOLO}");
    }

    #[test]
    fn token_repetido_so_substitui_a_primeira_ocorrencia() {
        let pagamento = pagamento_exemplo(2);
        let mensagem = renderizar_mensagem("Oi {CLIENTE}! Até mais, {CLIENTE}.", &pagamento);

        assert_eq!(mensagem, "Oi Maria da Silva! Até mais, {CLIENTE}.");
    }

    #[test]
    fn selecao_mantem_a_ordem_e_descarta_os_nao_selecionados() {
        let a = pagamento_exemplo(10);
        let b = pagamento_exemplo(5);
        let c = pagamento_exemplo(1);
        let ids = vec![a.id, c.id];

        let escolhidos = selecionar(vec![a.clone(), b, c.clone()], &ids).unwrap();

        assert_eq!(escolhidos.len(), 2);
        assert_eq!(escolhidos[0].id, a.id);
        assert_eq!(escolhidos[1].id, c.id);
    }

    #[test]
    fn selecao_com_id_desconhecido_e_recusada_por_inteiro() {
        let a = pagamento_exemplo(10);
        let ids = vec![a.id, Uuid::new_v4()];

        let resultado = selecionar(vec![a], &ids);

        assert!(matches!(resultado, Err(AppError::InstallmentNotOverdue)));
    }

    #[test]
    fn data_de_vencimento_sai_no_formato_brasileiro() {
        let pagamento = pagamento_exemplo(10);
        let mensagem = renderizar_mensagem("Venceu em {DATA_VENCIMENTO}", &pagamento);

        assert_eq!(mensagem, "Venceu em 19/08/2026");
    }
}
