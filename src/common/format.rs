// src/common/format.rs
//
// Máscaras de exibição (CPF, RG, telefone, CEP, moeda). Todas são puras e
// toleram entrada parcial: primeiro reduzimos aos dígitos, depois aplicamos
// a máscara de novo. Reaplicar sobre um valor já formatado dá o mesmo
// resultado. A formatação é só para exibição: o banco guarda o valor bruto.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Reduz a entrada aos dígitos; base de todas as máscaras e da normalização
/// antes de persistir.
pub fn apenas_digitos(valor: &str) -> String {
    valor.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `000.000.000-00`, truncado além de 11 dígitos.
pub fn formatar_cpf(valor: &str) -> String {
    let d = apenas_digitos(valor);
    let d = &d[..d.len().min(11)];

    let mut saida = String::with_capacity(14);
    for (i, c) in d.chars().enumerate() {
        match i {
            3 | 6 => saida.push('.'),
            9 => saida.push('-'),
            _ => {}
        }
        saida.push(c);
    }
    saida
}

/// `00.000.000-0` (grupos de 2-3-3-1 dígitos).
pub fn formatar_rg(valor: &str) -> String {
    let d = apenas_digitos(valor);
    let d = &d[..d.len().min(9)];

    let mut saida = String::with_capacity(12);
    for (i, c) in d.chars().enumerate() {
        match i {
            2 | 5 => saida.push('.'),
            8 => saida.push('-'),
            _ => {}
        }
        saida.push(c);
    }
    saida
}

/// `(00) 0000-0000`; com o 11º dígito presente, vira o formato de celular
/// `(00) 00000-0000`.
pub fn formatar_telefone(valor: &str) -> String {
    let d = apenas_digitos(valor);
    let d = &d[..d.len().min(11)];

    // Posição do hífen depende de ser fixo (10 dígitos) ou celular (11).
    let corte = if d.len() == 11 { 7 } else { 6 };

    let mut saida = String::with_capacity(16);
    for (i, c) in d.chars().enumerate() {
        if i == 0 {
            saida.push('(');
        }
        if i == 2 {
            saida.push_str(") ");
        }
        if i == corte {
            saida.push('-');
        }
        saida.push(c);
    }
    saida
}

/// `00000-000`.
pub fn formatar_cep(valor: &str) -> String {
    let d = apenas_digitos(valor);
    let d = &d[..d.len().min(8)];

    let mut saida = String::with_capacity(9);
    for (i, c) in d.chars().enumerate() {
        if i == 5 {
            saida.push('-');
        }
        saida.push(c);
    }
    saida
}

/// Formata um valor monetário em BRL no padrão pt-BR: `R$ 1.234,56`.
pub fn formatar_moeda(valor: Decimal) -> String {
    let arredondado = valor.round_dp(2);
    let negativo = arredondado.is_sign_negative();
    let absoluto = arredondado.abs();

    // Separa parte inteira e centavos sobre o texto já com 2 casas.
    let texto = format!("{:.2}", absoluto);
    let (inteiro, centavos) = texto.split_once('.').unwrap_or((texto.as_str(), "00"));

    // Agrupamento de milhar com ponto.
    let mut agrupado = String::with_capacity(inteiro.len() + inteiro.len() / 3);
    for (i, c) in inteiro.chars().enumerate() {
        if i > 0 && (inteiro.len() - i) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(c);
    }

    if negativo {
        format!("-R$ {},{}", agrupado, centavos)
    } else {
        format!("R$ {},{}", agrupado, centavos)
    }
}

/// `dd/mm/aaaa`.
pub fn formatar_data_br(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_completo_e_parcial() {
        assert_eq!(formatar_cpf("52998224725"), "529.982.247-25");
        assert_eq!(formatar_cpf("529"), "529");
        assert_eq!(formatar_cpf("5299"), "529.9");
        assert_eq!(formatar_cpf("529982247"), "529.982.247");
        // Truncado além de 11 dígitos
        assert_eq!(formatar_cpf("52998224725999"), "529.982.247-25");
    }

    #[test]
    fn cpf_reformatar_e_idempotente() {
        let uma_vez = formatar_cpf("52998224725");
        assert_eq!(formatar_cpf(&uma_vez), uma_vez);
    }

    #[test]
    fn rg_grupos_2_3_3_1() {
        assert_eq!(formatar_rg("123456789"), "12.345.678-9");
        assert_eq!(formatar_rg("12345"), "12.345");
        assert_eq!(formatar_rg(&formatar_rg("123456789")), "12.345.678-9");
    }

    #[test]
    fn telefone_fixo_e_celular() {
        assert_eq!(formatar_telefone("1133334444"), "(11) 3333-4444");
        // O 11º dígito desloca o hífen para o formato de celular
        assert_eq!(formatar_telefone("11987654321"), "(11) 98765-4321");
        assert_eq!(formatar_telefone("11"), "(11");
        assert_eq!(formatar_telefone("119876"), "(11) 9876");
        assert_eq!(
            formatar_telefone(&formatar_telefone("11987654321")),
            "(11) 98765-4321"
        );
    }

    #[test]
    fn cep_basico() {
        assert_eq!(formatar_cep("01310100"), "01310-100");
        assert_eq!(formatar_cep("01310"), "01310");
        assert_eq!(formatar_cep(&formatar_cep("01310100")), "01310-100");
    }

    #[test]
    fn moeda_pt_br() {
        assert_eq!(formatar_moeda(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(formatar_moeda(Decimal::from(1000)), "R$ 1.000,00");
        assert_eq!(formatar_moeda(Decimal::new(50, 1)), "R$ 5,00");
        assert_eq!(formatar_moeda(Decimal::from(1234567)), "R$ 1.234.567,00");
        assert_eq!(formatar_moeda(Decimal::new(-9950, 2)), "-R$ 99,50");
    }

    #[test]
    fn moeda_arredonda_para_duas_casas() {
        // 33.333... vira 33,33 na exibição; o valor armazenado não muda.
        let v: Decimal = "33.333333333333333333".parse().unwrap();
        assert_eq!(formatar_moeda(v), "R$ 33,33");
    }

    #[test]
    fn data_br() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(formatar_data_br(d), "09/03/2026");
    }
}
