// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Valida um CPF pelos dois dígitos verificadores.
///
/// A entrada é normalizada removendo tudo que não for dígito, então aceita
/// tanto "123.456.789-09" quanto "12345678909". Sequências triviais com os
/// 11 dígitos iguais ("00000000000" etc.) são rejeitadas.
pub fn validar_cpf(cpf: &str) -> bool {
    let digitos: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digitos.len() != 11 {
        return false;
    }
    if digitos.iter().all(|&d| d == digitos[0]) {
        return false;
    }

    // Primeiro dígito verificador: pesos de 10 a 2 sobre os 9 primeiros.
    let soma: u32 = digitos[..9]
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (10 - i as u32))
        .sum();
    let mut resto = 11 - (soma % 11);
    if resto >= 10 {
        resto = 0;
    }
    if resto != digitos[9] {
        return false;
    }

    // Segundo dígito verificador: pesos de 11 a 2 sobre os 10 primeiros.
    let soma: u32 = digitos[..10]
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (11 - i as u32))
        .sum();
    let mut resto = 11 - (soma % 11);
    if resto >= 10 {
        resto = 0;
    }

    resto == digitos[10]
}

// ---
// Funções customizadas para o `validator` (mesmo padrão dos payloads)
// ---

pub fn validate_cpf_field(cpf: &str) -> Result<(), ValidationError> {
    if validar_cpf(cpf) {
        Ok(())
    } else {
        let mut err = ValidationError::new("cpf");
        err.message = Some("CPF inválido.".into());
        Err(err)
    }
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor deve ser positivo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // CPFs com dígitos verificadores corretos (gerados pela própria regra)
    const CPFS_VALIDOS: &[&str] = &["52998224725", "11144477735", "12345678909"];

    #[test]
    fn aceita_cpfs_com_digitos_verificadores_corretos() {
        for cpf in CPFS_VALIDOS {
            assert!(validar_cpf(cpf), "deveria aceitar {cpf}");
        }
    }

    #[test]
    fn aceita_cpf_mascarado() {
        assert!(validar_cpf("529.982.247-25"));
    }

    #[test]
    fn rejeita_tamanho_diferente_de_onze() {
        assert!(!validar_cpf(""));
        assert!(!validar_cpf("5299822472"));
        assert!(!validar_cpf("529982247255"));
    }

    #[test]
    fn rejeita_sequencias_de_digitos_iguais() {
        for d in 0..=9 {
            let cpf: String = std::iter::repeat(char::from_digit(d, 10).unwrap())
                .take(11)
                .collect();
            assert!(!validar_cpf(&cpf), "deveria rejeitar {cpf}");
        }
    }

    #[test]
    fn rejeita_mutacao_de_um_digito() {
        // Qualquer alteração de um único dígito invalida os verificadores.
        let original = "52998224725";
        for pos in 0..11 {
            let atual = original.as_bytes()[pos] - b'0';
            let trocado = (atual + 1) % 10;
            let mut mutado = original.as_bytes().to_vec();
            mutado[pos] = b'0' + trocado;
            let mutado = String::from_utf8(mutado).unwrap();
            assert!(!validar_cpf(&mutado), "deveria rejeitar {mutado}");
        }
    }

    #[test]
    fn rejeita_entrada_nao_numerica() {
        assert!(!validar_cpf("abcdefghijk"));
    }

    #[test]
    fn validate_positive_rejeita_zero_e_negativo() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::from(-10)).is_err());
        assert!(validate_positive(&Decimal::from(150)).is_ok());
    }
}
